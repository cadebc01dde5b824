//! Nullable store: thread-safe in-memory storage for testing.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use village_store::account::{AccountRecord, AccountStore};
use village_store::city::{ApprovedCity, CityStore, CitySubmission};
use village_store::contact::{ContactRequest, ContactShare, ContactStore};
use village_store::group::{DateGroup, DateParticipant, FlightGroup, FlightParticipant, GroupStore};
use village_store::listing::{Listing, ListingStore};
use village_store::{StoreError, UniqueKey};
use village_types::{
    AccessCode, AccountId, CityId, Email, GroupId, ListingId, RequestId, ShareId, SubmissionId,
    Timestamp,
};

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<AccountId, AccountRecord>,
    listings: BTreeMap<ListingId, Listing>,
    requests: BTreeMap<RequestId, ContactRequest>,
    shares: BTreeMap<ShareId, ContactShare>,
    flight_groups: BTreeMap<GroupId, FlightGroup>,
    flight_members: BTreeMap<(GroupId, AccountId), FlightParticipant>,
    date_groups: BTreeMap<GroupId, DateGroup>,
    date_members: BTreeMap<(GroupId, AccountId), DateParticipant>,
    cities: BTreeMap<CityId, ApprovedCity>,
    submissions: BTreeMap<SubmissionId, CitySubmission>,
}

/// An in-memory implementation of every store trait.
///
/// All tables sit behind one lock, so each conditional insert is atomic just
/// like the LMDB backend's single write transaction. Thread-safe for use with
/// tokio's multi-threaded runtime.
pub struct NullStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
    account_inserts: AtomicUsize,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            unavailable: AtomicBool::new(false),
            account_inserts: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent call fail with a backend error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `AccountStore::insert` calls, successful or not.
    pub fn account_insert_calls(&self) -> usize {
        self.account_inserts.load(Ordering::SeqCst)
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("null store unavailable".to_string()));
        }
        Ok(self.tables.lock().unwrap())
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore for NullStore {
    fn find_by_id(&self, id: &AccountId) -> Result<Option<AccountRecord>, StoreError> {
        Ok(self.tables()?.accounts.get(id).cloned())
    }

    fn find_by_email(&self, email: &Email) -> Result<Option<AccountRecord>, StoreError> {
        Ok(self
            .tables()?
            .accounts
            .values()
            .find(|a| &a.email == email)
            .cloned())
    }

    fn find_by_identity_url(&self, url: &str) -> Result<Option<AccountRecord>, StoreError> {
        Ok(self
            .tables()?
            .accounts
            .values()
            .find(|a| a.identity_url == url)
            .cloned())
    }

    fn find_by_access_code(
        &self,
        code: &AccessCode,
    ) -> Result<Option<AccountRecord>, StoreError> {
        Ok(self
            .tables()?
            .accounts
            .values()
            .find(|a| &a.access_code == code)
            .cloned())
    }

    fn insert(&self, record: &AccountRecord) -> Result<AccountRecord, StoreError> {
        self.account_inserts.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables()?;
        for existing in tables.accounts.values() {
            let clash = if existing.email == record.email {
                Some((UniqueKey::Email, record.email.to_string()))
            } else if existing.identity_url == record.identity_url {
                Some((UniqueKey::IdentityUrl, record.identity_url.clone()))
            } else if existing.access_code == record.access_code {
                Some((UniqueKey::AccessCode, record.access_code.to_string()))
            } else {
                None
            };
            if let Some((key, value)) = clash {
                return Err(StoreError::Duplicate { key, value });
            }
        }
        tables.accounts.insert(record.id.clone(), record.clone());
        Ok(record.clone())
    }

    fn set_phone(
        &self,
        id: &AccountId,
        phone: &str,
        now: Timestamp,
    ) -> Result<AccountRecord, StoreError> {
        let mut tables = self.tables()?;
        let record = tables
            .accounts
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("account {id}")))?;
        record.phone = Some(phone.to_string());
        record.updated_at = now;
        Ok(record.clone())
    }

    fn account_count(&self) -> Result<u64, StoreError> {
        Ok(self.tables()?.accounts.len() as u64)
    }
}

impl ListingStore for NullStore {
    fn put_listing(&self, listing: &Listing) -> Result<(), StoreError> {
        self.tables()?
            .listings
            .insert(listing.id.clone(), listing.clone());
        Ok(())
    }

    fn get_listing(&self, id: &ListingId) -> Result<Option<Listing>, StoreError> {
        Ok(self.tables()?.listings.get(id).cloned())
    }

    fn iter_listings(&self) -> Result<Vec<Listing>, StoreError> {
        Ok(self.tables()?.listings.values().cloned().collect())
    }
}

impl ContactStore for NullStore {
    fn put_request(&self, request: &ContactRequest) -> Result<(), StoreError> {
        self.tables()?
            .requests
            .insert(request.id.clone(), request.clone());
        Ok(())
    }

    fn get_request(&self, id: &RequestId) -> Result<Option<ContactRequest>, StoreError> {
        Ok(self.tables()?.requests.get(id).cloned())
    }

    fn iter_requests(&self) -> Result<Vec<ContactRequest>, StoreError> {
        Ok(self.tables()?.requests.values().cloned().collect())
    }

    fn put_share(&self, share: &ContactShare) -> Result<(), StoreError> {
        self.tables()?.shares.insert(share.id.clone(), share.clone());
        Ok(())
    }

    fn iter_shares(&self) -> Result<Vec<ContactShare>, StoreError> {
        Ok(self.tables()?.shares.values().cloned().collect())
    }
}

impl GroupStore for NullStore {
    fn insert_flight_group(&self, group: &FlightGroup) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if tables
            .flight_groups
            .values()
            .any(|g| g.departure_city == group.departure_city)
        {
            return Err(StoreError::Duplicate {
                key: UniqueKey::DepartureCity,
                value: group.departure_city.clone(),
            });
        }
        tables.flight_groups.insert(group.id.clone(), group.clone());
        Ok(())
    }

    fn get_flight_group(&self, id: &GroupId) -> Result<Option<FlightGroup>, StoreError> {
        Ok(self.tables()?.flight_groups.get(id).cloned())
    }

    fn find_flight_group_by_city(&self, city: &str) -> Result<Option<FlightGroup>, StoreError> {
        Ok(self
            .tables()?
            .flight_groups
            .values()
            .find(|g| g.departure_city == city)
            .cloned())
    }

    fn iter_flight_groups(&self) -> Result<Vec<FlightGroup>, StoreError> {
        Ok(self.tables()?.flight_groups.values().cloned().collect())
    }

    fn insert_flight_participant(
        &self,
        participant: &FlightParticipant,
    ) -> Result<(), StoreError> {
        let key = (participant.group_id.clone(), participant.user_id.clone());
        let mut tables = self.tables()?;
        if tables.flight_members.contains_key(&key) {
            return Err(StoreError::Duplicate {
                key: UniqueKey::Membership,
                value: format!("{}/{}", key.0, key.1),
            });
        }
        tables.flight_members.insert(key, participant.clone());
        Ok(())
    }

    fn delete_flight_participant(
        &self,
        group: &GroupId,
        user: &AccountId,
    ) -> Result<bool, StoreError> {
        Ok(self
            .tables()?
            .flight_members
            .remove(&(group.clone(), user.clone()))
            .is_some())
    }

    fn flight_participants(&self, group: &GroupId) -> Result<Vec<FlightParticipant>, StoreError> {
        Ok(self
            .tables()?
            .flight_members
            .values()
            .filter(|p| &p.group_id == group)
            .cloned()
            .collect())
    }

    fn iter_flight_participants(&self) -> Result<Vec<FlightParticipant>, StoreError> {
        Ok(self.tables()?.flight_members.values().cloned().collect())
    }

    fn insert_date_group(&self, group: &DateGroup) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if tables
            .date_groups
            .values()
            .any(|g| g.start_date == group.start_date && g.end_date == group.end_date)
        {
            return Err(StoreError::Duplicate {
                key: UniqueKey::DateRange,
                value: format!("{}|{}", group.start_date, group.end_date),
            });
        }
        tables.date_groups.insert(group.id.clone(), group.clone());
        Ok(())
    }

    fn get_date_group(&self, id: &GroupId) -> Result<Option<DateGroup>, StoreError> {
        Ok(self.tables()?.date_groups.get(id).cloned())
    }

    fn find_date_group(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<DateGroup>, StoreError> {
        Ok(self
            .tables()?
            .date_groups
            .values()
            .find(|g| g.start_date == start && g.end_date == end)
            .cloned())
    }

    fn iter_date_groups(&self) -> Result<Vec<DateGroup>, StoreError> {
        Ok(self.tables()?.date_groups.values().cloned().collect())
    }

    fn insert_date_participant(&self, participant: &DateParticipant) -> Result<(), StoreError> {
        let key = (participant.group_id.clone(), participant.user_id.clone());
        let mut tables = self.tables()?;
        if tables.date_members.contains_key(&key) {
            return Err(StoreError::Duplicate {
                key: UniqueKey::Membership,
                value: format!("{}/{}", key.0, key.1),
            });
        }
        tables.date_members.insert(key, participant.clone());
        Ok(())
    }

    fn delete_date_participant(
        &self,
        group: &GroupId,
        user: &AccountId,
    ) -> Result<bool, StoreError> {
        Ok(self
            .tables()?
            .date_members
            .remove(&(group.clone(), user.clone()))
            .is_some())
    }

    fn date_participants(&self, group: &GroupId) -> Result<Vec<DateParticipant>, StoreError> {
        Ok(self
            .tables()?
            .date_members
            .values()
            .filter(|p| &p.group_id == group)
            .cloned()
            .collect())
    }

    fn iter_date_participants(&self) -> Result<Vec<DateParticipant>, StoreError> {
        Ok(self.tables()?.date_members.values().cloned().collect())
    }
}

impl CityStore for NullStore {
    fn insert_city(&self, city: &ApprovedCity) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if tables.cities.values().any(|c| c.city_name == city.city_name) {
            return Err(StoreError::Duplicate {
                key: UniqueKey::CityName,
                value: city.city_name.clone(),
            });
        }
        tables.cities.insert(city.id.clone(), city.clone());
        Ok(())
    }

    fn find_city_by_name(&self, name: &str) -> Result<Option<ApprovedCity>, StoreError> {
        Ok(self
            .tables()?
            .cities
            .values()
            .find(|c| c.city_name == name)
            .cloned())
    }

    fn iter_cities(&self) -> Result<Vec<ApprovedCity>, StoreError> {
        Ok(self.tables()?.cities.values().cloned().collect())
    }

    fn put_submission(&self, submission: &CitySubmission) -> Result<(), StoreError> {
        self.tables()?
            .submissions
            .insert(submission.id.clone(), submission.clone());
        Ok(())
    }

    fn iter_submissions(&self) -> Result<Vec<CitySubmission>, StoreError> {
        Ok(self.tables()?.submissions.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(email: &str, url: &str, code: &str) -> AccountRecord {
        AccountRecord::new_verified(
            Email::new(email),
            url,
            AccessCode::new(code),
            Timestamp::new(1),
        )
    }

    #[test]
    fn conditional_insert_names_violated_key() {
        let store = NullStore::new();
        store.insert(&account("a@x.io", "u1", "C1")).unwrap();

        let cases = [
            (account("A@X.IO", "u2", "C2"), UniqueKey::Email),
            (account("b@x.io", "u1", "C2"), UniqueKey::IdentityUrl),
            (account("b@x.io", "u2", "C1"), UniqueKey::AccessCode),
        ];
        for (record, key) in cases {
            assert_eq!(store.insert(&record).unwrap_err().duplicate_key(), Some(key));
        }
        assert_eq!(store.account_count().unwrap(), 1);
        assert_eq!(store.account_insert_calls(), 4);
    }

    #[test]
    fn identity_lookup_is_case_sensitive() {
        let store = NullStore::new();
        store.insert(&account("a@x.io", "https://l/in/Ann", "C1")).unwrap();
        assert!(store.find_by_identity_url("https://l/in/Ann").unwrap().is_some());
        assert!(store.find_by_identity_url("https://l/in/ann").unwrap().is_none());
    }

    #[test]
    fn unavailable_store_fails_every_call() {
        let store = NullStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            store.find_by_email(&Email::new("a@x.io")),
            Err(StoreError::Backend(_))
        ));
        store.set_unavailable(false);
        assert!(store.find_by_email(&Email::new("a@x.io")).unwrap().is_none());
    }
}
