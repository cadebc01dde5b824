//! Record encoding and the small read/write helpers shared by every store.

use heed::types::Bytes;
use heed::{Database, RoTxn, RwTxn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::LmdbError;

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, LmdbError> {
    Ok(bincode::serialize(value)?)
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, LmdbError> {
    Ok(bincode::deserialize(bytes)?)
}

/// Fetch and decode the record stored under `key`.
pub(crate) fn get_record<T: DeserializeOwned>(
    db: &Database<Bytes, Bytes>,
    txn: &RoTxn,
    key: &[u8],
) -> Result<Option<T>, LmdbError> {
    match db.get(txn, key)? {
        Some(bytes) => Ok(Some(decode(bytes)?)),
        None => Ok(None),
    }
}

pub(crate) fn put_record<T: Serialize>(
    db: &Database<Bytes, Bytes>,
    txn: &mut RwTxn,
    key: &[u8],
    value: &T,
) -> Result<(), LmdbError> {
    let bytes = encode(value)?;
    db.put(txn, key, &bytes)?;
    Ok(())
}

/// Decode every value in `db`.
pub(crate) fn all_records<T: DeserializeOwned>(
    db: &Database<Bytes, Bytes>,
    txn: &RoTxn,
) -> Result<Vec<T>, LmdbError> {
    let mut out = Vec::new();
    for entry in db.iter(txn)? {
        let (_key, val) = entry?;
        out.push(decode(val)?);
    }
    Ok(out)
}

/// Decode every value whose key starts with `prefix`.
pub(crate) fn prefixed_records<T: DeserializeOwned>(
    db: &Database<Bytes, Bytes>,
    txn: &RoTxn,
    prefix: &[u8],
) -> Result<Vec<T>, LmdbError> {
    let mut out = Vec::new();
    for entry in db.prefix_iter(txn, prefix)? {
        let (_key, val) = entry?;
        out.push(decode(val)?);
    }
    Ok(out)
}

/// Build composite key `left ++ 0x00 ++ right`.
///
/// Ids never contain NUL, so the separator keeps `("ab", "c")` and
/// `("a", "bc")` apart and makes `left ++ 0x00` a safe scan prefix.
pub(crate) fn composite_key(left: &str, right: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(left.len() + right.len() + 1);
    key.extend_from_slice(left.as_bytes());
    key.push(0);
    key.extend_from_slice(right.as_bytes());
    key
}

pub(crate) fn scan_prefix(left: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(left.len() + 1);
    key.extend_from_slice(left.as_bytes());
    key.push(0);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_keys_do_not_collide() {
        assert_ne!(composite_key("ab", "c"), composite_key("a", "bc"));
    }

    #[test]
    fn composite_key_starts_with_scan_prefix() {
        assert!(composite_key("group", "user").starts_with(&scan_prefix("group")));
        assert!(!composite_key("group2", "user").starts_with(&scan_prefix("group")));
    }
}
