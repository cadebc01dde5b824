//! LMDB implementation of CityStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use village_store::city::{ApprovedCity, CityStore, CitySubmission};
use village_store::{StoreError, UniqueKey};

use crate::codec::{all_records, get_record, put_record};
use crate::LmdbError;

pub struct LmdbCityStore {
    pub(crate) env: Arc<Env>,
    pub(crate) cities_db: Database<Bytes, Bytes>,
    pub(crate) city_name_db: Database<Bytes, Bytes>,
    pub(crate) submissions_db: Database<Bytes, Bytes>,
}

impl CityStore for LmdbCityStore {
    fn insert_city(&self, city: &ApprovedCity) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let name = city.city_name.as_bytes();
        if self
            .city_name_db
            .get(&wtxn, name)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate {
                key: UniqueKey::CityName,
                value: city.city_name.clone(),
            });
        }
        let id = city.id.as_str().as_bytes();
        put_record(&self.cities_db, &mut wtxn, id, city)?;
        self.city_name_db
            .put(&mut wtxn, name, id)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn find_city_by_name(&self, name: &str) -> Result<Option<ApprovedCity>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .city_name_db
            .get(&rtxn, name.as_bytes())
            .map_err(LmdbError::from)?
        {
            Some(id) => Ok(get_record(&self.cities_db, &rtxn, id)?),
            None => Ok(None),
        }
    }

    fn iter_cities(&self) -> Result<Vec<ApprovedCity>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(all_records(&self.cities_db, &rtxn)?)
    }

    fn put_submission(&self, submission: &CitySubmission) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        put_record(
            &self.submissions_db,
            &mut wtxn,
            submission.id.as_str().as_bytes(),
            submission,
        )?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn iter_submissions(&self) -> Result<Vec<CitySubmission>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(all_records(&self.submissions_db, &rtxn)?)
    }
}
