//! Access code newtype.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The permanent bearer credential minted when an attendee passes verification.
///
/// Comparison is exact (case-sensitive); the value is whatever the generator
/// produced, e.g. `YC25-K7PQ2M`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessCode(String);

impl AccessCode {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A log-safe rendering that keeps only the first two characters after the
    /// prefix separator.
    pub fn masked(&self) -> String {
        match self.0.split_once('-') {
            Some((prefix, rest)) => {
                let shown: String = rest.chars().take(2).collect();
                let hidden = rest.chars().count().saturating_sub(2);
                format!("{prefix}-{shown}{}", "*".repeat(hidden))
            }
            None => "*".repeat(self.0.chars().count()),
        }
    }
}

// Never print the full credential through `{:?}`.
impl fmt::Debug for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessCode").field(&self.masked()).finish()
    }
}

impl fmt::Display for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for AccessCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masked_hides_tail() {
        assert_eq!(AccessCode::new("YC25-ABC234").masked(), "YC25-AB****");
    }

    #[test]
    fn masked_without_separator_hides_everything() {
        assert_eq!(AccessCode::new("abc").masked(), "***");
    }

    #[test]
    fn debug_does_not_leak() {
        let dbg = format!("{:?}", AccessCode::new("YC25-ABC234"));
        assert!(!dbg.contains("C234"));
    }
}
