//! Contact requests and phone-number shares between hosts and guests.

use std::sync::Arc;

use serde::Serialize;
use village_store::account::AccountStore;
use village_store::contact::{ContactRequest, ContactShare, ContactStore, RequestStatus};
use village_store::listing::ListingStore;
use village_types::{AccountId, ListingId, RequestId, ShareId, Timestamp};

use crate::error::CommunityError;
use crate::profile::{lookup_profile, PublicProfile};

/// Placeholder stored when an approving host has no phone on file.
pub const PHONE_NOT_PROVIDED: &str = "Not provided";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestAction {
    Approve,
    Reject,
}

impl RequestAction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "approve" => Some(RequestAction::Approve),
            "reject" => Some(RequestAction::Reject),
            _ => None,
        }
    }

    fn resulting_status(self) -> RequestStatus {
        match self {
            RequestAction::Approve => RequestStatus::Approved,
            RequestAction::Reject => RequestStatus::Rejected,
        }
    }
}

/// A request as the host sees it: joined with the listing and requester.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostRequestView {
    #[serde(flatten)]
    pub request: ContactRequest,
    pub listing_title: Option<String>,
    pub listing_address: Option<String>,
    pub requester: Option<PublicProfile>,
}

/// A share as either party sees it.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareView {
    #[serde(flatten)]
    pub share: ContactShare,
    pub listing_title: Option<String>,
    pub listing_address: Option<String>,
    pub is_current_user_host: bool,
    pub other_person: Option<PublicProfile>,
}

pub struct ContactService {
    contacts: Arc<dyn ContactStore + Send + Sync>,
    listings: Arc<dyn ListingStore + Send + Sync>,
    accounts: Arc<dyn AccountStore + Send + Sync>,
}

impl ContactService {
    pub fn new(
        contacts: Arc<dyn ContactStore + Send + Sync>,
        listings: Arc<dyn ListingStore + Send + Sync>,
        accounts: Arc<dyn AccountStore + Send + Sync>,
    ) -> Self {
        Self {
            contacts,
            listings,
            accounts,
        }
    }

    /// Ask the host of `listing_id` to exchange numbers.
    pub fn request_contact(
        &self,
        user: &AccountId,
        listing_id: &ListingId,
        message: &str,
        phone: &str,
        now: Timestamp,
    ) -> Result<ContactRequest, CommunityError> {
        let listing = self
            .listings
            .get_listing(listing_id)?
            .ok_or_else(|| CommunityError::not_found("Accommodation not found"))?;

        if &listing.host_id == user {
            return Err(CommunityError::rejected(
                "You cannot request contact for your own listing",
            ));
        }
        if self.contacts.pending_request(user, listing_id)?.is_some() {
            return Err(CommunityError::rejected(
                "You already have a pending request for this accommodation",
            ));
        }

        let request = ContactRequest {
            id: RequestId::generate(),
            listing_id: listing_id.clone(),
            from_user_id: user.clone(),
            to_user_id: listing.host_id,
            message: message.to_string(),
            sender_phone: phone.to_string(),
            status: RequestStatus::Pending,
            created_at: now,
        };
        self.contacts.put_request(&request)?;
        tracing::info!(request = %request.id, listing = %listing_id, "contact request created");
        Ok(request)
    }

    /// Requests addressed to `host`, newest first.
    pub fn requests_for_host(
        &self,
        host: &AccountId,
    ) -> Result<Vec<HostRequestView>, CommunityError> {
        self.contacts
            .requests_for_host(host)?
            .into_iter()
            .map(|request| {
                let listing = self.listings.get_listing(&request.listing_id)?;
                let requester = lookup_profile(&*self.accounts, &request.from_user_id)?;
                Ok(HostRequestView {
                    listing_title: listing.as_ref().map(|l| l.title.clone()),
                    listing_address: listing.map(|l| l.address),
                    requester,
                    request,
                })
            })
            .collect()
    }

    /// Approve or reject a request addressed to `host`.
    ///
    /// Approval also records a share carrying both phone numbers. The
    /// request's new status stands even if writing the share fails.
    pub fn act_on_request(
        &self,
        host: &AccountId,
        request_id: &RequestId,
        action: RequestAction,
        now: Timestamp,
    ) -> Result<RequestStatus, CommunityError> {
        let mut request = match self.contacts.get_request(request_id)? {
            Some(r) if &r.to_user_id == host => r,
            _ => return Err(CommunityError::not_found("Contact request not found")),
        };

        request.status = action.resulting_status();
        self.contacts.put_request(&request)?;

        if action == RequestAction::Approve {
            if let Err(e) = self.record_share(host, &request, now) {
                tracing::error!(request = %request_id, error = %e,
                    "failed to create contact share, but request was approved");
            }
        }

        tracing::info!(request = %request_id, status = ?request.status, "contact request updated");
        Ok(request.status)
    }

    fn record_share(
        &self,
        host: &AccountId,
        request: &ContactRequest,
        now: Timestamp,
    ) -> Result<(), CommunityError> {
        let host_phone = self
            .accounts
            .find_by_id(host)?
            .and_then(|a| a.phone)
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| PHONE_NOT_PROVIDED.to_string());
        let share = ContactShare {
            id: ShareId::generate(),
            listing_id: request.listing_id.clone(),
            host_id: host.clone(),
            guest_id: request.from_user_id.clone(),
            host_phone,
            guest_phone: request.sender_phone.clone(),
            shared_at: now,
        };
        self.contacts.put_share(&share)?;
        Ok(())
    }

    /// Shares where `user` is either party, newest first.
    pub fn shares_for_user(&self, user: &AccountId) -> Result<Vec<ShareView>, CommunityError> {
        self.contacts
            .shares_for_user(user)?
            .into_iter()
            .map(|share| {
                let is_host = &share.host_id == user;
                let other = if is_host { &share.guest_id } else { &share.host_id };
                let other_person = lookup_profile(&*self.accounts, other)?;
                let listing = self.listings.get_listing(&share.listing_id)?;
                Ok(ShareView {
                    listing_title: listing.as_ref().map(|l| l.title.clone()),
                    listing_address: listing.map(|l| l.address),
                    is_current_user_host: is_host,
                    other_person,
                    share,
                })
            })
            .collect()
    }
}
