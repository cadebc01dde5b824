//! Fundamental types for the village service.
//!
//! This crate defines the small value types shared across every other crate in
//! the workspace: typed record ids, timestamps, normalised emails and access codes.

pub mod code;
pub mod email;
pub mod id;
pub mod time;

pub use code::AccessCode;
pub use email::Email;
pub use id::{
    AccountId, CityId, GroupId, ListingId, ParticipantId, RequestId, ShareId, SubmissionId,
};
pub use time::{Clock, SystemClock, Timestamp};
