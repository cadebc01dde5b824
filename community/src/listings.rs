//! Accommodation listings.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use village_store::account::AccountStore;
use village_store::listing::{Listing, ListingStatus, ListingStore};
use village_types::{AccountId, ListingId, Timestamp};

use crate::error::CommunityError;

/// A host's new listing as submitted.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub address: String,
    pub price_per_night: u32,
    pub max_guests: u32,
    pub available_spots: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub house_rules: Option<String>,
    pub available_from: NaiveDate,
    pub available_until: NaiveDate,
    /// Saved on the host's account so it can be shared on approval.
    #[serde(default)]
    pub host_phone: String,
}

impl ListingDraft {
    fn validate(&self) -> Result<(), CommunityError> {
        if self.title.trim().is_empty() {
            return Err(CommunityError::rejected("Title is required"));
        }
        if self.description.trim().is_empty() {
            return Err(CommunityError::rejected("Description is required"));
        }
        if self.address.trim().is_empty() {
            return Err(CommunityError::rejected("Address is required"));
        }
        if self.max_guests == 0 {
            return Err(CommunityError::rejected("Listing must host at least one guest"));
        }
        if self.available_spots > self.max_guests {
            return Err(CommunityError::rejected(
                "Available spots cannot exceed maximum guests",
            ));
        }
        if self.available_until < self.available_from {
            return Err(CommunityError::rejected(
                "Available until must be on or after available from",
            ));
        }
        Ok(())
    }
}

pub struct ListingService {
    listings: Arc<dyn ListingStore + Send + Sync>,
    accounts: Arc<dyn AccountStore + Send + Sync>,
}

impl ListingService {
    pub fn new(
        listings: Arc<dyn ListingStore + Send + Sync>,
        accounts: Arc<dyn AccountStore + Send + Sync>,
    ) -> Self {
        Self { listings, accounts }
    }

    pub fn create(
        &self,
        host: &AccountId,
        draft: ListingDraft,
        now: Timestamp,
    ) -> Result<Listing, CommunityError> {
        draft.validate()?;

        let phone = draft.host_phone.trim();
        if !phone.is_empty() {
            self.accounts.set_phone(host, phone, now)?;
        }

        let listing = Listing {
            id: ListingId::generate(),
            host_id: host.clone(),
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            address: draft.address.trim().to_string(),
            price_per_night: draft.price_per_night,
            max_guests: draft.max_guests,
            available_spots: draft.available_spots,
            amenities: draft.amenities,
            house_rules: crate::profile::non_blank(draft.house_rules),
            available_from: draft.available_from,
            available_until: draft.available_until,
            status: ListingStatus::Active,
            created_at: now,
            updated_at: now,
        };
        self.listings.put_listing(&listing)?;
        tracing::info!(listing = %listing.id, host = %host, "listing created");
        Ok(listing)
    }

    /// Active listings, newest first.
    pub fn list_active(&self) -> Result<Vec<Listing>, CommunityError> {
        Ok(self.listings.listings_by_status(ListingStatus::Active)?)
    }

    /// A listing by id, whatever its status.
    pub fn get(&self, id: &ListingId) -> Result<Listing, CommunityError> {
        self.listings
            .get_listing(id)?
            .ok_or_else(|| CommunityError::not_found("Accommodation not found"))
    }

    pub fn by_host(&self, host: &AccountId) -> Result<Vec<Listing>, CommunityError> {
        Ok(self.listings.listings_by_host(host)?)
    }

    /// Soft delete; only the owning host may do it.
    pub fn delete(
        &self,
        host: &AccountId,
        id: &ListingId,
        now: Timestamp,
    ) -> Result<(), CommunityError> {
        let mut listing = match self.listings.get_listing(id)? {
            Some(l) if &l.host_id == host => l,
            _ => {
                return Err(CommunityError::rejected(
                    "Failed to delete listing or unauthorized",
                ))
            }
        };
        listing.status = ListingStatus::Deleted;
        listing.updated_at = now;
        self.listings.put_listing(&listing)?;
        tracing::info!(listing = %id, host = %host, "listing deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use village_nullables::NullStore;
    use village_store::account::AccountRecord;
    use village_types::{AccessCode, Email};

    fn setup() -> (Arc<NullStore>, ListingService, AccountId) {
        let store = Arc::new(NullStore::new());
        let host = store
            .insert(&AccountRecord::new_verified(
                Email::new("host@example.com"),
                "https://linkedin.com/in/host",
                AccessCode::new("YC25-HHHHHH"),
                Timestamp::new(1),
            ))
            .unwrap();
        let service = ListingService::new(store.clone(), store.clone());
        (store, service, host.id)
    }

    fn draft() -> ListingDraft {
        ListingDraft {
            title: " Room near venue ".into(),
            description: "Quiet".into(),
            address: "1 Market St".into(),
            price_per_night: 80,
            max_guests: 2,
            available_spots: 1,
            amenities: vec!["wifi".into()],
            house_rules: Some("  ".into()),
            available_from: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            available_until: NaiveDate::from_ymd_opt(2025, 6, 18).unwrap(),
            host_phone: "+1 555 0100".into(),
        }
    }

    #[test]
    fn create_stores_active_listing_and_host_phone() {
        let (store, service, host) = setup();
        let listing = service.create(&host, draft(), Timestamp::new(10)).unwrap();
        assert_eq!(listing.status, ListingStatus::Active);
        assert_eq!(listing.title, "Room near venue");
        assert_eq!(listing.house_rules, None);
        assert_eq!(service.get(&listing.id).unwrap(), listing);

        let account = store.find_by_id(&host).unwrap().unwrap();
        assert_eq!(account.phone.as_deref(), Some("+1 555 0100"));
    }

    #[test]
    fn invalid_drafts_rejected() {
        let (_store, service, host) = setup();
        let mut d = draft();
        d.available_spots = 3;
        assert!(matches!(
            service.create(&host, d, Timestamp::new(1)),
            Err(CommunityError::Rejected(_))
        ));

        let mut d = draft();
        d.available_until = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(service.create(&host, d, Timestamp::new(1)).is_err());

        let mut d = draft();
        d.title = "   ".into();
        assert!(service.create(&host, d, Timestamp::new(1)).is_err());
        assert!(service.list_active().unwrap().is_empty());
    }

    #[test]
    fn list_active_is_newest_first_and_hides_deleted() {
        let (_store, service, host) = setup();
        let a = service.create(&host, draft(), Timestamp::new(10)).unwrap();
        let b = service.create(&host, draft(), Timestamp::new(20)).unwrap();
        let c = service.create(&host, draft(), Timestamp::new(30)).unwrap();
        service.delete(&host, &b.id, Timestamp::new(40)).unwrap();

        let ids: Vec<ListingId> = service.list_active().unwrap().into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![c.id.clone(), a.id.clone()]);

        // Soft-deleted listings stay readable by id and by host.
        assert_eq!(service.get(&b.id).unwrap().status, ListingStatus::Deleted);
        assert_eq!(service.by_host(&host).unwrap().len(), 3);
    }

    #[test]
    fn only_owner_can_delete() {
        let (_store, service, host) = setup();
        let listing = service.create(&host, draft(), Timestamp::new(10)).unwrap();
        let err = service
            .delete(&AccountId::new("intruder"), &listing.id, Timestamp::new(11))
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to delete listing or unauthorized");
        assert!(service
            .delete(&host, &ListingId::new("missing"), Timestamp::new(11))
            .is_err());
        assert_eq!(service.get(&listing.id).unwrap().status, ListingStatus::Active);
    }

    #[test]
    fn unknown_listing_is_not_found() {
        let (_store, service, _host) = setup();
        assert!(matches!(
            service.get(&ListingId::new("nope")),
            Err(CommunityError::NotFound(_))
        ));
    }
}
