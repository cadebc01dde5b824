use thiserror::Error;

/// The uniqueness constraint that an insert violated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniqueKey {
    Email,
    IdentityUrl,
    AccessCode,
    DepartureCity,
    DateRange,
    Membership,
    CityName,
}

impl UniqueKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueKey::Email => "email",
            UniqueKey::IdentityUrl => "identity_url",
            UniqueKey::AccessCode => "access_code",
            UniqueKey::DepartureCity => "departure_city",
            UniqueKey::DateRange => "date_range",
            UniqueKey::Membership => "membership",
            UniqueKey::CityName => "city_name",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("duplicate {}: {value}", .key.as_str())]
    Duplicate { key: UniqueKey, value: String },

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// The violated constraint, when this is a uniqueness failure.
    pub fn duplicate_key(&self) -> Option<UniqueKey> {
        match self {
            StoreError::Duplicate { key, .. } => Some(*key),
            _ => None,
        }
    }
}
