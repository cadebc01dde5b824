//! LMDB implementation of AccountStore.
//!
//! Records live in `accounts` keyed by id. Three index databases map the
//! canonical email, the identity URL and the access code to that id.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, RoTxn};

use village_store::account::{AccountRecord, AccountStore};
use village_store::{StoreError, UniqueKey};
use village_types::{AccessCode, AccountId, Email, Timestamp};

use crate::codec::{get_record, put_record};
use crate::LmdbError;

pub struct LmdbAccountStore {
    pub(crate) env: Arc<Env>,
    pub(crate) accounts_db: Database<Bytes, Bytes>,
    pub(crate) email_db: Database<Bytes, Bytes>,
    pub(crate) identity_db: Database<Bytes, Bytes>,
    pub(crate) code_db: Database<Bytes, Bytes>,
}

impl LmdbAccountStore {
    fn lookup_via(
        &self,
        index: &Database<Bytes, Bytes>,
        key: &[u8],
    ) -> Result<Option<AccountRecord>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        self.resolve_index(&rtxn, index, key)
    }

    fn resolve_index(
        &self,
        txn: &RoTxn,
        index: &Database<Bytes, Bytes>,
        key: &[u8],
    ) -> Result<Option<AccountRecord>, LmdbError> {
        match index.get(txn, key)? {
            Some(id) => get_record(&self.accounts_db, txn, id),
            None => Ok(None),
        }
    }
}

impl AccountStore for LmdbAccountStore {
    fn find_by_id(&self, id: &AccountId) -> Result<Option<AccountRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(get_record(&self.accounts_db, &rtxn, id.as_str().as_bytes())?)
    }

    fn find_by_email(&self, email: &Email) -> Result<Option<AccountRecord>, StoreError> {
        Ok(self.lookup_via(&self.email_db, email.as_str().as_bytes())?)
    }

    fn find_by_identity_url(&self, url: &str) -> Result<Option<AccountRecord>, StoreError> {
        Ok(self.lookup_via(&self.identity_db, url.as_bytes())?)
    }

    fn find_by_access_code(
        &self,
        code: &AccessCode,
    ) -> Result<Option<AccountRecord>, StoreError> {
        Ok(self.lookup_via(&self.code_db, code.as_str().as_bytes())?)
    }

    fn insert(&self, record: &AccountRecord) -> Result<AccountRecord, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        let id = record.id.as_str().as_bytes();
        let checks = [
            (UniqueKey::Email, &self.email_db, record.email.as_str()),
            (UniqueKey::IdentityUrl, &self.identity_db, record.identity_url.as_str()),
            (UniqueKey::AccessCode, &self.code_db, record.access_code.as_str()),
        ];
        for (key, db, value) in &checks {
            if db.get(&wtxn, value.as_bytes()).map_err(LmdbError::from)?.is_some() {
                // Dropping the txn aborts it; nothing was written.
                return Err(StoreError::Duplicate {
                    key: *key,
                    value: value.to_string(),
                });
            }
        }
        if self.accounts_db.get(&wtxn, id).map_err(LmdbError::from)?.is_some() {
            return Err(StoreError::Backend(format!(
                "account id {} already present",
                record.id
            )));
        }

        put_record(&self.accounts_db, &mut wtxn, id, record)?;
        for (_, db, value) in &checks {
            db.put(&mut wtxn, value.as_bytes(), id)
                .map_err(LmdbError::from)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;

        tracing::debug!(account = %record.id, "account inserted");
        Ok(record.clone())
    }

    fn set_phone(
        &self,
        id: &AccountId,
        phone: &str,
        now: Timestamp,
    ) -> Result<AccountRecord, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let mut record: AccountRecord = get_record(&self.accounts_db, &wtxn, id.as_str().as_bytes())?
            .ok_or_else(|| StoreError::NotFound(format!("account {id}")))?;
        record.phone = Some(phone.to_string());
        record.updated_at = now;
        put_record(&self.accounts_db, &mut wtxn, id.as_str().as_bytes(), &record)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(record)
    }

    fn account_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.accounts_db.len(&rtxn).map_err(LmdbError::from)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{LmdbEnvironment, DEFAULT_MAX_DBS};

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAX_DBS, 16 * 1024 * 1024)
            .expect("open env");
        (dir, env)
    }

    fn record(email: &str, url: &str, code: &str) -> AccountRecord {
        AccountRecord::new_verified(
            Email::new(email),
            url,
            AccessCode::new(code),
            Timestamp::new(1_000),
        )
    }

    #[test]
    fn insert_then_find_by_every_key() {
        let (_dir, env) = temp_env();
        let store = env.account_store();
        let rec = record("Ann@Example.com", "https://linkedin.com/in/Ann", "YC25-AAAAAA");
        store.insert(&rec).unwrap();

        assert_eq!(store.find_by_id(&rec.id).unwrap(), Some(rec.clone()));
        assert_eq!(
            store.find_by_email(&Email::new("ANN@example.COM")).unwrap(),
            Some(rec.clone())
        );
        assert_eq!(
            store.find_by_identity_url("https://linkedin.com/in/Ann").unwrap(),
            Some(rec.clone())
        );
        assert_eq!(
            store.find_by_access_code(&AccessCode::new("YC25-AAAAAA")).unwrap(),
            Some(rec)
        );
        assert_eq!(store.account_count().unwrap(), 1);
    }

    #[test]
    fn identity_url_lookup_is_case_sensitive() {
        let (_dir, env) = temp_env();
        let store = env.account_store();
        store
            .insert(&record("a@x.io", "https://linkedin.com/in/Ann", "YC25-AAAAAA"))
            .unwrap();
        assert!(store
            .find_by_identity_url("https://linkedin.com/in/ann")
            .unwrap()
            .is_none());
    }

    #[test]
    fn duplicate_email_rejected_without_partial_write() {
        let (_dir, env) = temp_env();
        let store = env.account_store();
        store
            .insert(&record("a@x.io", "https://linkedin.com/in/a", "YC25-AAAAAA"))
            .unwrap();
        let err = store
            .insert(&record("A@X.IO", "https://linkedin.com/in/b", "YC25-BBBBBB"))
            .unwrap_err();
        assert_eq!(err.duplicate_key(), Some(UniqueKey::Email));
        assert!(store
            .find_by_access_code(&AccessCode::new("YC25-BBBBBB"))
            .unwrap()
            .is_none());
        assert_eq!(store.account_count().unwrap(), 1);
    }

    #[test]
    fn duplicate_access_code_rejected() {
        let (_dir, env) = temp_env();
        let store = env.account_store();
        store
            .insert(&record("a@x.io", "https://linkedin.com/in/a", "YC25-AAAAAA"))
            .unwrap();
        let err = store
            .insert(&record("b@x.io", "https://linkedin.com/in/b", "YC25-AAAAAA"))
            .unwrap_err();
        assert_eq!(err.duplicate_key(), Some(UniqueKey::AccessCode));
    }

    #[test]
    fn set_phone_updates_record() {
        let (_dir, env) = temp_env();
        let store = env.account_store();
        let rec = record("a@x.io", "https://linkedin.com/in/a", "YC25-AAAAAA");
        store.insert(&rec).unwrap();
        let updated = store
            .set_phone(&rec.id, "+1 555 0100", Timestamp::new(2_000))
            .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("+1 555 0100"));
        assert_eq!(updated.updated_at, Timestamp::new(2_000));
        assert_eq!(store.find_by_id(&rec.id).unwrap(), Some(updated));
    }

    #[test]
    fn set_phone_on_missing_account_is_not_found() {
        let (_dir, env) = temp_env();
        let store = env.account_store();
        let err = store
            .set_phone(&AccountId::new("nope"), "1", Timestamp::new(1))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
