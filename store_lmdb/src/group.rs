//! LMDB implementation of GroupStore.
//!
//! Groups are keyed by id, with a uniqueness index per group kind: departure
//! city for flight groups, `start|end` for date groups. Membership rows are
//! keyed by `group_id ++ 0x00 ++ user_id`, which both enforces one row per
//! user and group and lets a prefix scan list a group's members.

use std::sync::Arc;

use chrono::NaiveDate;
use heed::types::Bytes;
use heed::{Database, Env};

use village_store::group::{DateGroup, DateParticipant, FlightGroup, FlightParticipant, GroupStore};
use village_store::{StoreError, UniqueKey};
use village_types::{AccountId, GroupId};

use crate::codec::{
    all_records, composite_key, get_record, prefixed_records, put_record, scan_prefix,
};
use crate::LmdbError;

pub struct LmdbGroupStore {
    pub(crate) env: Arc<Env>,
    pub(crate) flight_groups_db: Database<Bytes, Bytes>,
    pub(crate) flight_city_db: Database<Bytes, Bytes>,
    pub(crate) flight_participants_db: Database<Bytes, Bytes>,
    pub(crate) date_groups_db: Database<Bytes, Bytes>,
    pub(crate) date_range_db: Database<Bytes, Bytes>,
    pub(crate) date_participants_db: Database<Bytes, Bytes>,
}

fn date_range_key(start: NaiveDate, end: NaiveDate) -> String {
    format!("{start}|{end}")
}

impl LmdbGroupStore {
    /// Insert `record` under `id` unless `unique` already maps to a group.
    fn insert_indexed<T: serde::Serialize>(
        &self,
        groups_db: &Database<Bytes, Bytes>,
        index_db: &Database<Bytes, Bytes>,
        id: &GroupId,
        unique: &str,
        key: UniqueKey,
        record: &T,
    ) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if index_db
            .get(&wtxn, unique.as_bytes())
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate {
                key,
                value: unique.to_string(),
            });
        }
        put_record(groups_db, &mut wtxn, id.as_str().as_bytes(), record)?;
        index_db
            .put(&mut wtxn, unique.as_bytes(), id.as_str().as_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn find_indexed<T: serde::de::DeserializeOwned>(
        &self,
        groups_db: &Database<Bytes, Bytes>,
        index_db: &Database<Bytes, Bytes>,
        unique: &str,
    ) -> Result<Option<T>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match index_db.get(&rtxn, unique.as_bytes()).map_err(LmdbError::from)? {
            Some(id) => Ok(get_record(groups_db, &rtxn, id)?),
            None => Ok(None),
        }
    }

    fn insert_member<T: serde::Serialize>(
        &self,
        db: &Database<Bytes, Bytes>,
        group: &GroupId,
        user: &AccountId,
        record: &T,
    ) -> Result<(), StoreError> {
        let key = composite_key(group.as_str(), user.as_str());
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if db.get(&wtxn, &key).map_err(LmdbError::from)?.is_some() {
            return Err(StoreError::Duplicate {
                key: UniqueKey::Membership,
                value: format!("{group}/{user}"),
            });
        }
        put_record(db, &mut wtxn, &key, record)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete_member(
        &self,
        db: &Database<Bytes, Bytes>,
        group: &GroupId,
        user: &AccountId,
    ) -> Result<bool, StoreError> {
        let key = composite_key(group.as_str(), user.as_str());
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let deleted = db.delete(&mut wtxn, &key).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(deleted)
    }

    fn members<T: serde::de::DeserializeOwned>(
        &self,
        db: &Database<Bytes, Bytes>,
        group: &GroupId,
    ) -> Result<Vec<T>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(prefixed_records(db, &rtxn, &scan_prefix(group.as_str()))?)
    }

    fn get<T: serde::de::DeserializeOwned>(
        &self,
        db: &Database<Bytes, Bytes>,
        id: &GroupId,
    ) -> Result<Option<T>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(get_record(db, &rtxn, id.as_str().as_bytes())?)
    }

    fn all<T: serde::de::DeserializeOwned>(
        &self,
        db: &Database<Bytes, Bytes>,
    ) -> Result<Vec<T>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(all_records(db, &rtxn)?)
    }
}

impl GroupStore for LmdbGroupStore {
    fn insert_flight_group(&self, group: &FlightGroup) -> Result<(), StoreError> {
        self.insert_indexed(
            &self.flight_groups_db,
            &self.flight_city_db,
            &group.id,
            &group.departure_city,
            UniqueKey::DepartureCity,
            group,
        )
    }

    fn get_flight_group(&self, id: &GroupId) -> Result<Option<FlightGroup>, StoreError> {
        self.get(&self.flight_groups_db, id)
    }

    fn find_flight_group_by_city(&self, city: &str) -> Result<Option<FlightGroup>, StoreError> {
        self.find_indexed(&self.flight_groups_db, &self.flight_city_db, city)
    }

    fn iter_flight_groups(&self) -> Result<Vec<FlightGroup>, StoreError> {
        self.all(&self.flight_groups_db)
    }

    fn insert_flight_participant(
        &self,
        participant: &FlightParticipant,
    ) -> Result<(), StoreError> {
        self.insert_member(
            &self.flight_participants_db,
            &participant.group_id,
            &participant.user_id,
            participant,
        )
    }

    fn delete_flight_participant(
        &self,
        group: &GroupId,
        user: &AccountId,
    ) -> Result<bool, StoreError> {
        self.delete_member(&self.flight_participants_db, group, user)
    }

    fn flight_participants(&self, group: &GroupId) -> Result<Vec<FlightParticipant>, StoreError> {
        self.members(&self.flight_participants_db, group)
    }

    fn iter_flight_participants(&self) -> Result<Vec<FlightParticipant>, StoreError> {
        self.all(&self.flight_participants_db)
    }

    fn insert_date_group(&self, group: &DateGroup) -> Result<(), StoreError> {
        self.insert_indexed(
            &self.date_groups_db,
            &self.date_range_db,
            &group.id,
            &date_range_key(group.start_date, group.end_date),
            UniqueKey::DateRange,
            group,
        )
    }

    fn get_date_group(&self, id: &GroupId) -> Result<Option<DateGroup>, StoreError> {
        self.get(&self.date_groups_db, id)
    }

    fn find_date_group(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<DateGroup>, StoreError> {
        self.find_indexed(
            &self.date_groups_db,
            &self.date_range_db,
            &date_range_key(start, end),
        )
    }

    fn iter_date_groups(&self) -> Result<Vec<DateGroup>, StoreError> {
        self.all(&self.date_groups_db)
    }

    fn insert_date_participant(&self, participant: &DateParticipant) -> Result<(), StoreError> {
        self.insert_member(
            &self.date_participants_db,
            &participant.group_id,
            &participant.user_id,
            participant,
        )
    }

    fn delete_date_participant(
        &self,
        group: &GroupId,
        user: &AccountId,
    ) -> Result<bool, StoreError> {
        self.delete_member(&self.date_participants_db, group, user)
    }

    fn date_participants(&self, group: &GroupId) -> Result<Vec<DateParticipant>, StoreError> {
        self.members(&self.date_participants_db, group)
    }

    fn iter_date_participants(&self) -> Result<Vec<DateParticipant>, StoreError> {
        self.all(&self.date_participants_db)
    }
}
