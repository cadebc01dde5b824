//! Community features for verified attendees.
//!
//! Everything here is persistence with ownership checks: accommodation
//! listings, host/guest phone exchange, flight-buddy and date groups, and the
//! city directory behind the departure-city picker. Each service is a thin
//! struct over the store traits it needs; the caller supplies the resolved
//! account id and the current time.

pub mod cities;
pub mod contacts;
pub mod error;
pub mod groups;
pub mod listings;
pub mod profile;

pub use cities::{CitySeed, CityService};
pub use contacts::{ContactService, HostRequestView, RequestAction, ShareView};
pub use error::CommunityError;
pub use groups::{
    DateGroupView, DateJoin, DateMemberView, DateMembership, FlightGroupView, FlightJoin,
    FlightMemberView, FlightMembership, GroupService, Participations,
};
pub use listings::{ListingDraft, ListingService};
pub use profile::{ContactCard, PublicProfile};
