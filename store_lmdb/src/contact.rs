//! LMDB implementation of ContactStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use village_store::contact::{ContactRequest, ContactShare, ContactStore};
use village_store::StoreError;
use village_types::RequestId;

use crate::codec::{all_records, get_record, put_record};
use crate::LmdbError;

pub struct LmdbContactStore {
    pub(crate) env: Arc<Env>,
    pub(crate) requests_db: Database<Bytes, Bytes>,
    pub(crate) shares_db: Database<Bytes, Bytes>,
}

impl ContactStore for LmdbContactStore {
    fn put_request(&self, request: &ContactRequest) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        put_record(&self.requests_db, &mut wtxn, request.id.as_str().as_bytes(), request)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_request(&self, id: &RequestId) -> Result<Option<ContactRequest>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(get_record(&self.requests_db, &rtxn, id.as_str().as_bytes())?)
    }

    fn iter_requests(&self) -> Result<Vec<ContactRequest>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(all_records(&self.requests_db, &rtxn)?)
    }

    fn put_share(&self, share: &ContactShare) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        put_record(&self.shares_db, &mut wtxn, share.id.as_str().as_bytes(), share)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn iter_shares(&self) -> Result<Vec<ContactShare>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(all_records(&self.shares_db, &rtxn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{LmdbEnvironment, DEFAULT_MAX_DBS};
    use village_store::RequestStatus;
    use village_types::{AccountId, ListingId, ShareId, Timestamp};

    fn request(id: &str, from: &str, to: &str, created: u64) -> ContactRequest {
        ContactRequest {
            id: RequestId::new(id),
            listing_id: ListingId::new("l1"),
            from_user_id: AccountId::new(from),
            to_user_id: AccountId::new(to),
            message: "Hi".into(),
            sender_phone: "555".into(),
            status: RequestStatus::Pending,
            created_at: Timestamp::new(created),
        }
    }

    #[test]
    fn requests_roundtrip_and_pending_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAX_DBS, 16 * 1024 * 1024).unwrap();
        let store = env.contact_store();

        store.put_request(&request("r1", "guest", "host", 1)).unwrap();
        store.put_request(&request("r2", "other", "host", 2)).unwrap();

        let for_host = store.requests_for_host(&AccountId::new("host")).unwrap();
        assert_eq!(for_host.len(), 2);
        assert_eq!(for_host[0].id, RequestId::new("r2"));

        let pending = store
            .pending_request(&AccountId::new("guest"), &ListingId::new("l1"))
            .unwrap();
        assert_eq!(pending.map(|r| r.id), Some(RequestId::new("r1")));

        let mut approved = request("r1", "guest", "host", 1);
        approved.status = RequestStatus::Approved;
        store.put_request(&approved).unwrap();
        assert!(store
            .pending_request(&AccountId::new("guest"), &ListingId::new("l1"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn shares_visible_to_both_sides() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAX_DBS, 16 * 1024 * 1024).unwrap();
        let store = env.contact_store();

        store
            .put_share(&ContactShare {
                id: ShareId::new("s1"),
                listing_id: ListingId::new("l1"),
                host_id: AccountId::new("host"),
                guest_id: AccountId::new("guest"),
                host_phone: "111".into(),
                guest_phone: "222".into(),
                shared_at: Timestamp::new(5),
            })
            .unwrap();

        assert_eq!(store.shares_for_user(&AccountId::new("host")).unwrap().len(), 1);
        assert_eq!(store.shares_for_user(&AccountId::new("guest")).unwrap().len(), 1);
        assert!(store.shares_for_user(&AccountId::new("x")).unwrap().is_empty());
    }
}
