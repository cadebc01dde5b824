//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::account::LmdbAccountStore;
use crate::city::LmdbCityStore;
use crate::contact::LmdbContactStore;
use crate::group::LmdbGroupStore;
use crate::listing::LmdbListingStore;
use crate::migration::Migrator;
use crate::LmdbError;

/// Number of named databases opened below, plus headroom for migrations.
pub const DEFAULT_MAX_DBS: u32 = 24;

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    pub(crate) env: Arc<Env>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
    // accounts
    pub(crate) accounts_db: Database<Bytes, Bytes>,
    pub(crate) account_email_db: Database<Bytes, Bytes>,
    pub(crate) account_identity_db: Database<Bytes, Bytes>,
    pub(crate) account_code_db: Database<Bytes, Bytes>,
    // listings + contacts
    pub(crate) listings_db: Database<Bytes, Bytes>,
    pub(crate) requests_db: Database<Bytes, Bytes>,
    pub(crate) shares_db: Database<Bytes, Bytes>,
    // groups
    pub(crate) flight_groups_db: Database<Bytes, Bytes>,
    pub(crate) flight_city_db: Database<Bytes, Bytes>,
    pub(crate) flight_participants_db: Database<Bytes, Bytes>,
    pub(crate) date_groups_db: Database<Bytes, Bytes>,
    pub(crate) date_range_db: Database<Bytes, Bytes>,
    pub(crate) date_participants_db: Database<Bytes, Bytes>,
    // cities
    pub(crate) cities_db: Database<Bytes, Bytes>,
    pub(crate) city_name_db: Database<Bytes, Bytes>,
    pub(crate) submissions_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path and bring its
    /// schema up to date.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per process for this path and
        // never memory-mapped by another open in the same process.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let mut create = |name: &str| -> Result<Database<Bytes, Bytes>, LmdbError> {
            Ok(env.create_database::<Bytes, Bytes>(&mut wtxn, Some(name))?)
        };

        let meta_db = create("meta")?;
        let accounts_db = create("accounts")?;
        let account_email_db = create("account_email")?;
        let account_identity_db = create("account_identity")?;
        let account_code_db = create("account_code")?;
        let listings_db = create("listings")?;
        let requests_db = create("contact_requests")?;
        let shares_db = create("contact_shares")?;
        let flight_groups_db = create("flight_groups")?;
        let flight_city_db = create("flight_city")?;
        let flight_participants_db = create("flight_participants")?;
        let date_groups_db = create("date_groups")?;
        let date_range_db = create("date_range")?;
        let date_participants_db = create("date_participants")?;
        let cities_db = create("approved_cities")?;
        let city_name_db = create("city_name")?;
        let submissions_db = create("city_submissions")?;
        wtxn.commit()?;

        tracing::info!(path = %path.display(), map_size, "opened LMDB environment");

        let environment = Self {
            env: Arc::new(env),
            meta_db,
            accounts_db,
            account_email_db,
            account_identity_db,
            account_code_db,
            listings_db,
            requests_db,
            shares_db,
            flight_groups_db,
            flight_city_db,
            flight_participants_db,
            date_groups_db,
            date_range_db,
            date_participants_db,
            cities_db,
            city_name_db,
            submissions_db,
        };

        Migrator::run(&environment)?;
        Ok(environment)
    }

    pub fn account_store(&self) -> LmdbAccountStore {
        LmdbAccountStore {
            env: Arc::clone(&self.env),
            accounts_db: self.accounts_db,
            email_db: self.account_email_db,
            identity_db: self.account_identity_db,
            code_db: self.account_code_db,
        }
    }

    pub fn listing_store(&self) -> LmdbListingStore {
        LmdbListingStore {
            env: Arc::clone(&self.env),
            listings_db: self.listings_db,
        }
    }

    pub fn contact_store(&self) -> LmdbContactStore {
        LmdbContactStore {
            env: Arc::clone(&self.env),
            requests_db: self.requests_db,
            shares_db: self.shares_db,
        }
    }

    pub fn group_store(&self) -> LmdbGroupStore {
        LmdbGroupStore {
            env: Arc::clone(&self.env),
            flight_groups_db: self.flight_groups_db,
            flight_city_db: self.flight_city_db,
            flight_participants_db: self.flight_participants_db,
            date_groups_db: self.date_groups_db,
            date_range_db: self.date_range_db,
            date_participants_db: self.date_participants_db,
        }
    }

    pub fn city_store(&self) -> LmdbCityStore {
        LmdbCityStore {
            env: Arc::clone(&self.env),
            cities_db: self.cities_db,
            city_name_db: self.city_name_db,
            submissions_db: self.submissions_db,
        }
    }

    /// Stored schema version; 0 for a fresh database.
    pub fn schema_version(&self) -> Result<u32, LmdbError> {
        let rtxn = self.env.read_txn()?;
        match self.meta_db.get(&rtxn, SCHEMA_VERSION_KEY)? {
            Some(bytes) => {
                let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                    LmdbError::Serialization(
                        "schema_version has unexpected byte length".to_string(),
                    )
                })?;
                Ok(u32::from_le_bytes(arr))
            }
            None => Ok(0),
        }
    }

    pub(crate) fn set_schema_version(&self, version: u32) -> Result<(), LmdbError> {
        let mut wtxn = self.env.write_txn()?;
        self.meta_db
            .put(&mut wtxn, SCHEMA_VERSION_KEY, &version.to_le_bytes())?;
        wtxn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::CURRENT_SCHEMA_VERSION;

    #[test]
    fn open_creates_directory_and_stamps_schema() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("db");
        let env = LmdbEnvironment::open(&path, DEFAULT_MAX_DBS, 16 * 1024 * 1024)
            .expect("open env");
        assert!(path.exists());
        assert_eq!(env.schema_version().unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn reopen_keeps_schema_version() {
        let dir = tempfile::tempdir().expect("temp dir");
        {
            let _env = LmdbEnvironment::open(dir.path(), DEFAULT_MAX_DBS, 16 * 1024 * 1024)
                .expect("open env");
        }
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAX_DBS, 16 * 1024 * 1024)
            .expect("reopen env");
        assert_eq!(env.schema_version().unwrap(), CURRENT_SCHEMA_VERSION);
    }
}
