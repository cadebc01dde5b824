//! Flight-buddy and date group storage trait.

use crate::StoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use village_types::{AccountId, GroupId, ParticipantId, Timestamp};

/// Which contact fields a participant agreed to show to other members.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    pub show_phone: bool,
    pub show_email: bool,
    pub show_linkedin: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightGroup {
    pub id: GroupId,
    /// Unique across flight groups (exact match).
    pub departure_city: String,
    pub creator_id: AccountId,
    pub created_at: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightParticipant {
    pub id: ParticipantId,
    pub group_id: GroupId,
    pub user_id: AccountId,
    pub flight_date: Option<NaiveDate>,
    pub flight_time: Option<String>,
    pub airline: Option<String>,
    pub notes: Option<String>,
    pub phone: String,
    pub visibility: Visibility,
    pub created_at: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateGroup {
    pub id: GroupId,
    /// `(start_date, end_date)` is unique across date groups.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub creator_id: AccountId,
    pub created_at: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateParticipant {
    pub id: ParticipantId,
    pub group_id: GroupId,
    pub user_id: AccountId,
    pub notes: Option<String>,
    pub phone: String,
    pub visibility: Visibility,
    pub created_at: Timestamp,
}

/// Trait for storing coordination groups and their memberships.
///
/// Membership rows are keyed by `(group_id, user_id)`, so a user can appear in
/// a group at most once.
pub trait GroupStore {
    // ── Flight groups ───────────────────────────────────────────────────

    /// Insert a new flight group; `Duplicate(DepartureCity)` if one exists for the city.
    fn insert_flight_group(&self, group: &FlightGroup) -> Result<(), StoreError>;

    fn get_flight_group(&self, id: &GroupId) -> Result<Option<FlightGroup>, StoreError>;

    fn find_flight_group_by_city(&self, city: &str) -> Result<Option<FlightGroup>, StoreError>;

    fn iter_flight_groups(&self) -> Result<Vec<FlightGroup>, StoreError>;

    /// Insert a membership; `Duplicate(Membership)` if the user is already in the group.
    fn insert_flight_participant(&self, participant: &FlightParticipant)
        -> Result<(), StoreError>;

    /// Remove a membership. Returns whether a row was deleted.
    fn delete_flight_participant(
        &self,
        group: &GroupId,
        user: &AccountId,
    ) -> Result<bool, StoreError>;

    fn flight_participants(&self, group: &GroupId) -> Result<Vec<FlightParticipant>, StoreError>;

    fn iter_flight_participants(&self) -> Result<Vec<FlightParticipant>, StoreError>;

    // ── Date groups ─────────────────────────────────────────────────────

    /// Insert a new date group; `Duplicate(DateRange)` if the exact range exists.
    fn insert_date_group(&self, group: &DateGroup) -> Result<(), StoreError>;

    fn get_date_group(&self, id: &GroupId) -> Result<Option<DateGroup>, StoreError>;

    fn find_date_group(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<DateGroup>, StoreError>;

    fn iter_date_groups(&self) -> Result<Vec<DateGroup>, StoreError>;

    fn insert_date_participant(&self, participant: &DateParticipant) -> Result<(), StoreError>;

    fn delete_date_participant(
        &self,
        group: &GroupId,
        user: &AccountId,
    ) -> Result<bool, StoreError>;

    fn date_participants(&self, group: &GroupId) -> Result<Vec<DateParticipant>, StoreError>;

    fn iter_date_participants(&self) -> Result<Vec<DateParticipant>, StoreError>;
}
