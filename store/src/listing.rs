//! Accommodation listing storage trait.

use crate::StoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use village_types::{AccountId, ListingId, Timestamp};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Inactive,
    Full,
    /// Soft-deleted by its host; still readable by id.
    Deleted,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub host_id: AccountId,
    pub title: String,
    pub description: String,
    pub address: String,
    pub price_per_night: u32,
    pub max_guests: u32,
    pub available_spots: u32,
    pub amenities: Vec<String>,
    pub house_rules: Option<String>,
    pub available_from: NaiveDate,
    pub available_until: NaiveDate,
    pub status: ListingStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Sort newest first, ties broken by id so the order is deterministic.
pub fn newest_first(listings: &mut [Listing]) {
    listings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
}

pub trait ListingStore {
    /// Insert or overwrite a listing.
    fn put_listing(&self, listing: &Listing) -> Result<(), StoreError>;

    fn get_listing(&self, id: &ListingId) -> Result<Option<Listing>, StoreError>;

    fn iter_listings(&self) -> Result<Vec<Listing>, StoreError>;

    /// Listings with the given status, newest first.
    fn listings_by_status(&self, status: ListingStatus) -> Result<Vec<Listing>, StoreError> {
        let mut out: Vec<Listing> = self
            .iter_listings()?
            .into_iter()
            .filter(|l| l.status == status)
            .collect();
        newest_first(&mut out);
        Ok(out)
    }

    /// All listings owned by `host`, newest first.
    fn listings_by_host(&self, host: &AccountId) -> Result<Vec<Listing>, StoreError> {
        let mut out: Vec<Listing> = self
            .iter_listings()?
            .into_iter()
            .filter(|l| &l.host_id == host)
            .collect();
        newest_first(&mut out);
        Ok(out)
    }
}
