//! City directory storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use village_types::{AccountId, CityId, SubmissionId, Timestamp};

/// A city available in the departure-city picker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovedCity {
    pub id: CityId,
    pub city_name: String,
    pub country: String,
    pub region: Option<String>,
    /// Lower tiers sort first.
    pub tier: u8,
    pub usage_count: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

/// A user-proposed city awaiting moderation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySubmission {
    pub id: SubmissionId,
    pub city_name: String,
    pub country: String,
    pub region: Option<String>,
    pub submitted_by: AccountId,
    pub status: SubmissionStatus,
    pub created_at: Timestamp,
}

pub trait CityStore {
    /// Insert an approved city; `Duplicate(CityName)` if the name is taken.
    fn insert_city(&self, city: &ApprovedCity) -> Result<(), StoreError>;

    fn find_city_by_name(&self, name: &str) -> Result<Option<ApprovedCity>, StoreError>;

    fn iter_cities(&self) -> Result<Vec<ApprovedCity>, StoreError>;

    fn put_submission(&self, submission: &CitySubmission) -> Result<(), StoreError>;

    fn iter_submissions(&self) -> Result<Vec<CitySubmission>, StoreError>;

    /// The pending submission for `name` (exact match), if any.
    fn pending_submission(&self, name: &str) -> Result<Option<CitySubmission>, StoreError> {
        Ok(self
            .iter_submissions()?
            .into_iter()
            .find(|s| s.city_name == name && s.status == SubmissionStatus::Pending))
    }
}
