//! LMDB implementation of ListingStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use village_store::listing::{Listing, ListingStore};
use village_store::StoreError;
use village_types::ListingId;

use crate::codec::{all_records, get_record, put_record};
use crate::LmdbError;

pub struct LmdbListingStore {
    pub(crate) env: Arc<Env>,
    pub(crate) listings_db: Database<Bytes, Bytes>,
}

impl ListingStore for LmdbListingStore {
    fn put_listing(&self, listing: &Listing) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        put_record(&self.listings_db, &mut wtxn, listing.id.as_str().as_bytes(), listing)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_listing(&self, id: &ListingId) -> Result<Option<Listing>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(get_record(&self.listings_db, &rtxn, id.as_str().as_bytes())?)
    }

    fn iter_listings(&self) -> Result<Vec<Listing>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(all_records(&self.listings_db, &rtxn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{LmdbEnvironment, DEFAULT_MAX_DBS};
    use chrono::NaiveDate;
    use village_store::ListingStatus;
    use village_types::{AccountId, Timestamp};

    fn listing(id: &str, host: &str, created: u64, status: ListingStatus) -> Listing {
        Listing {
            id: ListingId::new(id),
            host_id: AccountId::new(host),
            title: "Room near venue".into(),
            description: "Quiet room".into(),
            address: "1 Market St".into(),
            price_per_night: 80,
            max_guests: 2,
            available_spots: 2,
            amenities: vec!["wifi".into()],
            house_rules: None,
            available_from: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            available_until: NaiveDate::from_ymd_opt(2025, 6, 18).unwrap(),
            status,
            created_at: Timestamp::new(created),
            updated_at: Timestamp::new(created),
        }
    }

    #[test]
    fn put_get_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAX_DBS, 16 * 1024 * 1024).unwrap();
        let store = env.listing_store();

        let mut l = listing("l1", "h1", 10, ListingStatus::Active);
        store.put_listing(&l).unwrap();
        assert_eq!(store.get_listing(&l.id).unwrap(), Some(l.clone()));

        l.status = ListingStatus::Deleted;
        store.put_listing(&l).unwrap();
        assert_eq!(
            store.get_listing(&l.id).unwrap().map(|x| x.status),
            Some(ListingStatus::Deleted)
        );
        assert_eq!(store.iter_listings().unwrap().len(), 1);
    }

    #[test]
    fn status_filter_orders_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAX_DBS, 16 * 1024 * 1024).unwrap();
        let store = env.listing_store();

        store.put_listing(&listing("a", "h1", 10, ListingStatus::Active)).unwrap();
        store.put_listing(&listing("b", "h2", 30, ListingStatus::Active)).unwrap();
        store.put_listing(&listing("c", "h1", 20, ListingStatus::Deleted)).unwrap();

        let active: Vec<_> = store
            .listings_by_status(ListingStatus::Active)
            .unwrap()
            .into_iter()
            .map(|l| l.id.to_string())
            .collect();
        assert_eq!(active, vec!["b", "a"]);

        let mine = store.listings_by_host(&AccountId::new("h1")).unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].id, ListingId::new("c"));
    }
}
