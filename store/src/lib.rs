//! Abstract storage traits for the village service.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.
//!
//! Uniqueness rules (one account per email, one flight group per city, one
//! membership per user and group, ...) are enforced by the backend at insert
//! time. Callers may pre-check for a friendlier message, but the insert is the
//! only authoritative check.

pub mod account;
pub mod city;
pub mod contact;
pub mod error;
pub mod group;
pub mod listing;

pub use account::{AccountRecord, AccountStore};
pub use city::{ApprovedCity, CityStore, CitySubmission, SubmissionStatus};
pub use contact::{ContactRequest, ContactShare, ContactStore, RequestStatus};
pub use error::{StoreError, UniqueKey};
pub use group::{
    DateGroup, DateParticipant, FlightGroup, FlightParticipant, GroupStore, Visibility,
};
pub use listing::{Listing, ListingStatus, ListingStore};
