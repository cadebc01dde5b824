//! Case-insensitive email address.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An email address stored in its canonical (trimmed, lowercase) form.
///
/// Account uniqueness on email is case-insensitive, so the canonical form is
/// the only representation that ever reaches a store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Email {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<Email> for String {
    fn from(e: Email) -> Self {
        e.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_form_is_lowercase_and_trimmed() {
        assert_eq!(Email::new("  Jane.Doe@Example.COM ").as_str(), "jane.doe@example.com");
    }

    #[test]
    fn deserializing_canonicalises() {
        let e: Email = serde_json::from_str("\"A@B.IO\"").unwrap();
        assert_eq!(e, Email::new("a@b.io"));
    }
}
