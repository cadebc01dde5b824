//! Contact request and contact share storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use village_types::{AccountId, ListingId, RequestId, ShareId, Timestamp};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

/// A guest asking a host to exchange phone numbers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub id: RequestId,
    pub listing_id: ListingId,
    pub from_user_id: AccountId,
    pub to_user_id: AccountId,
    pub message: String,
    pub sender_phone: String,
    pub status: RequestStatus,
    pub created_at: Timestamp,
}

/// An approved exchange of phone numbers between host and guest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactShare {
    pub id: ShareId,
    pub listing_id: ListingId,
    pub host_id: AccountId,
    pub guest_id: AccountId,
    pub host_phone: String,
    pub guest_phone: String,
    pub shared_at: Timestamp,
}

pub trait ContactStore {
    /// Insert or overwrite a request.
    fn put_request(&self, request: &ContactRequest) -> Result<(), StoreError>;

    fn get_request(&self, id: &RequestId) -> Result<Option<ContactRequest>, StoreError>;

    fn iter_requests(&self) -> Result<Vec<ContactRequest>, StoreError>;

    fn put_share(&self, share: &ContactShare) -> Result<(), StoreError>;

    fn iter_shares(&self) -> Result<Vec<ContactShare>, StoreError>;

    /// Requests addressed to `host`, newest first.
    fn requests_for_host(&self, host: &AccountId) -> Result<Vec<ContactRequest>, StoreError> {
        let mut out: Vec<ContactRequest> = self
            .iter_requests()?
            .into_iter()
            .filter(|r| &r.to_user_id == host)
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }

    /// The pending request `from` already has open on `listing`, if any.
    fn pending_request(
        &self,
        from: &AccountId,
        listing: &ListingId,
    ) -> Result<Option<ContactRequest>, StoreError> {
        Ok(self.iter_requests()?.into_iter().find(|r| {
            &r.from_user_id == from
                && &r.listing_id == listing
                && r.status == RequestStatus::Pending
        }))
    }

    /// Shares where `user` is either side, newest first.
    fn shares_for_user(&self, user: &AccountId) -> Result<Vec<ContactShare>, StoreError> {
        let mut out: Vec<ContactShare> = self
            .iter_shares()?
            .into_iter()
            .filter(|s| &s.host_id == user || &s.guest_id == user)
            .collect();
        out.sort_by(|a, b| b.shared_at.cmp(&a.shared_at).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }
}
