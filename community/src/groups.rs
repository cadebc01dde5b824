//! Flight-buddy groups (one per departure city) and date groups (one per
//! arrival/departure date pair).
//!
//! Members choose which contact fields other attendees may see; the views
//! built here pass every member through [`ContactCard`] so unrevealed fields
//! never leave the service.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use village_store::account::AccountStore;
use village_store::group::{
    DateGroup, DateParticipant, FlightGroup, FlightParticipant, GroupStore, Visibility,
};
use village_store::{StoreError, UniqueKey};
use village_types::{AccountId, GroupId, ParticipantId, Timestamp};

use crate::error::CommunityError;
use crate::profile::{lookup_profile, non_blank, ContactCard, PublicProfile};

const NOT_A_MEMBER: &str = "User is not a member of this group";
const ALREADY_A_MEMBER: &str = "You are already a member of this group";

/// Details a member supplies when joining a flight group.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct FlightJoin {
    /// `YYYY-MM-DD`; blank means unknown.
    pub flight_date: Option<String>,
    pub flight_time: Option<String>,
    pub airline: Option<String>,
    pub notes: Option<String>,
    pub phone: String,
    pub show_phone: bool,
    pub show_email: bool,
    pub show_linkedin: bool,
}

/// Details a member supplies when joining a date group.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DateJoin {
    pub notes: Option<String>,
    pub phone: String,
    pub show_phone: bool,
    pub show_email: bool,
    pub show_linkedin: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct FlightMemberView {
    pub user_id: AccountId,
    pub flight_date: Option<NaiveDate>,
    pub flight_time: Option<String>,
    pub airline: Option<String>,
    pub notes: Option<String>,
    pub contact: ContactCard,
    pub joined_at: Timestamp,
}

#[derive(Clone, Debug, Serialize)]
pub struct FlightGroupView {
    #[serde(flatten)]
    pub group: FlightGroup,
    pub creator: Option<PublicProfile>,
    pub participants: Vec<FlightMemberView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DateMemberView {
    pub user_id: AccountId,
    pub notes: Option<String>,
    pub contact: ContactCard,
    pub joined_at: Timestamp,
}

#[derive(Clone, Debug, Serialize)]
pub struct DateGroupView {
    #[serde(flatten)]
    pub group: DateGroup,
    pub creator: Option<PublicProfile>,
    pub participants: Vec<DateMemberView>,
}

/// One of the caller's own flight memberships.
#[derive(Clone, Debug, Serialize)]
pub struct FlightMembership {
    #[serde(flatten)]
    pub participant: FlightParticipant,
    pub departure_city: Option<String>,
}

/// One of the caller's own date memberships.
#[derive(Clone, Debug, Serialize)]
pub struct DateMembership {
    #[serde(flatten)]
    pub participant: DateParticipant,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Participations {
    pub flights: Vec<FlightMembership>,
    pub dates: Vec<DateMembership>,
}

pub struct GroupService {
    groups: Arc<dyn GroupStore + Send + Sync>,
    accounts: Arc<dyn AccountStore + Send + Sync>,
}

impl GroupService {
    pub fn new(
        groups: Arc<dyn GroupStore + Send + Sync>,
        accounts: Arc<dyn AccountStore + Send + Sync>,
    ) -> Self {
        Self { groups, accounts }
    }

    // ---- flight groups ----

    pub fn create_flight_group(
        &self,
        user: &AccountId,
        departure_city: &str,
        now: Timestamp,
    ) -> Result<FlightGroup, CommunityError> {
        let city = departure_city.trim();
        if city.is_empty() {
            return Err(CommunityError::rejected("Departure city is required"));
        }
        let exists = || {
            CommunityError::rejected(format!(
                "A flight group for {city} already exists. You can join the existing group instead."
            ))
        };
        if self.groups.find_flight_group_by_city(city)?.is_some() {
            return Err(exists());
        }

        let group = FlightGroup {
            id: GroupId::generate(),
            departure_city: city.to_string(),
            creator_id: user.clone(),
            created_at: now,
        };
        match self.groups.insert_flight_group(&group) {
            Ok(()) => {}
            Err(e) if e.duplicate_key() == Some(UniqueKey::DepartureCity) => return Err(exists()),
            Err(e) => return Err(e.into()),
        }
        tracing::info!(group = %group.id, city = %city, creator = %user, "flight group created");
        Ok(group)
    }

    /// Every flight group, ordered by departure city.
    pub fn list_flight_groups(&self) -> Result<Vec<FlightGroupView>, CommunityError> {
        let mut groups = self.groups.iter_flight_groups()?;
        groups.sort_by(|a, b| a.departure_city.cmp(&b.departure_city));

        groups
            .into_iter()
            .map(|group| {
                let mut members = self.groups.flight_participants(&group.id)?;
                members.sort_by_key(|p| p.created_at);
                let participants = members
                    .into_iter()
                    .map(|p| {
                        let contact = self.contact_card(p.visibility, &p.phone, &p.user_id)?;
                        Ok(FlightMemberView {
                            user_id: p.user_id,
                            flight_date: p.flight_date,
                            flight_time: p.flight_time,
                            airline: p.airline,
                            notes: p.notes,
                            contact,
                            joined_at: p.created_at,
                        })
                    })
                    .collect::<Result<Vec<_>, CommunityError>>()?;
                Ok(FlightGroupView {
                    creator: lookup_profile(&*self.accounts, &group.creator_id)?,
                    group,
                    participants,
                })
            })
            .collect()
    }

    pub fn join_flight_group(
        &self,
        user: &AccountId,
        group_id: &GroupId,
        details: FlightJoin,
        now: Timestamp,
    ) -> Result<FlightParticipant, CommunityError> {
        if self.groups.get_flight_group(group_id)?.is_none() {
            return Err(CommunityError::not_found("Flight group not found"));
        }
        let flight_date = match non_blank(details.flight_date) {
            Some(raw) => Some(
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .map_err(|_| CommunityError::rejected("Invalid flight date"))?,
            ),
            None => None,
        };

        let participant = FlightParticipant {
            id: ParticipantId::generate(),
            group_id: group_id.clone(),
            user_id: user.clone(),
            flight_date,
            flight_time: non_blank(details.flight_time),
            airline: non_blank(details.airline),
            notes: non_blank(details.notes),
            phone: details.phone.trim().to_string(),
            visibility: Visibility {
                show_phone: details.show_phone,
                show_email: details.show_email,
                show_linkedin: details.show_linkedin,
            },
            created_at: now,
        };
        self.groups
            .insert_flight_participant(&participant)
            .map_err(membership_error)?;
        tracing::info!(group = %group_id, user = %user, "joined flight group");
        Ok(participant)
    }

    pub fn leave_flight_group(
        &self,
        user: &AccountId,
        group_id: &GroupId,
    ) -> Result<(), CommunityError> {
        if !self.groups.delete_flight_participant(group_id, user)? {
            return Err(CommunityError::rejected(NOT_A_MEMBER));
        }
        tracing::info!(group = %group_id, user = %user, "left flight group");
        Ok(())
    }

    // ---- date groups ----

    pub fn create_date_group(
        &self,
        user: &AccountId,
        start: NaiveDate,
        end: NaiveDate,
        now: Timestamp,
    ) -> Result<DateGroup, CommunityError> {
        if end < start {
            return Err(CommunityError::rejected(
                "End date must be on or after start date",
            ));
        }
        let exists = || {
            CommunityError::rejected(format!(
                "A date group for {start} to {end} already exists. You can join the existing group instead."
            ))
        };
        if self.groups.find_date_group(start, end)?.is_some() {
            return Err(exists());
        }

        let group = DateGroup {
            id: GroupId::generate(),
            start_date: start,
            end_date: end,
            creator_id: user.clone(),
            created_at: now,
        };
        match self.groups.insert_date_group(&group) {
            Ok(()) => {}
            Err(e) if e.duplicate_key() == Some(UniqueKey::DateRange) => return Err(exists()),
            Err(e) => return Err(e.into()),
        }
        tracing::info!(group = %group.id, %start, %end, creator = %user, "date group created");
        Ok(group)
    }

    /// Every date group, ordered by start date.
    pub fn list_date_groups(&self) -> Result<Vec<DateGroupView>, CommunityError> {
        let mut groups = self.groups.iter_date_groups()?;
        groups.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| a.end_date.cmp(&b.end_date))
        });

        groups
            .into_iter()
            .map(|group| {
                let mut members = self.groups.date_participants(&group.id)?;
                members.sort_by_key(|p| p.created_at);
                let participants = members
                    .into_iter()
                    .map(|p| {
                        let contact = self.contact_card(p.visibility, &p.phone, &p.user_id)?;
                        Ok(DateMemberView {
                            user_id: p.user_id,
                            notes: p.notes,
                            contact,
                            joined_at: p.created_at,
                        })
                    })
                    .collect::<Result<Vec<_>, CommunityError>>()?;
                Ok(DateGroupView {
                    creator: lookup_profile(&*self.accounts, &group.creator_id)?,
                    group,
                    participants,
                })
            })
            .collect()
    }

    pub fn join_date_group(
        &self,
        user: &AccountId,
        group_id: &GroupId,
        details: DateJoin,
        now: Timestamp,
    ) -> Result<DateParticipant, CommunityError> {
        if self.groups.get_date_group(group_id)?.is_none() {
            return Err(CommunityError::not_found("Date group not found"));
        }

        let participant = DateParticipant {
            id: ParticipantId::generate(),
            group_id: group_id.clone(),
            user_id: user.clone(),
            notes: non_blank(details.notes),
            phone: details.phone.trim().to_string(),
            visibility: Visibility {
                show_phone: details.show_phone,
                show_email: details.show_email,
                show_linkedin: details.show_linkedin,
            },
            created_at: now,
        };
        self.groups
            .insert_date_participant(&participant)
            .map_err(membership_error)?;
        tracing::info!(group = %group_id, user = %user, "joined date group");
        Ok(participant)
    }

    pub fn leave_date_group(
        &self,
        user: &AccountId,
        group_id: &GroupId,
    ) -> Result<(), CommunityError> {
        if !self.groups.delete_date_participant(group_id, user)? {
            return Err(CommunityError::rejected(NOT_A_MEMBER));
        }
        tracing::info!(group = %group_id, user = %user, "left date group");
        Ok(())
    }

    /// The caller's own memberships, with enough group detail to label them.
    pub fn participations(&self, user: &AccountId) -> Result<Participations, CommunityError> {
        let flights = self
            .groups
            .iter_flight_participants()?
            .into_iter()
            .filter(|p| &p.user_id == user)
            .map(|participant| {
                let group = self.groups.get_flight_group(&participant.group_id)?;
                Ok(FlightMembership {
                    departure_city: group.map(|g| g.departure_city),
                    participant,
                })
            })
            .collect::<Result<Vec<_>, CommunityError>>()?;

        let dates = self
            .groups
            .iter_date_participants()?
            .into_iter()
            .filter(|p| &p.user_id == user)
            .map(|participant| {
                let group = self.groups.get_date_group(&participant.group_id)?;
                Ok(DateMembership {
                    start_date: group.as_ref().map(|g| g.start_date),
                    end_date: group.map(|g| g.end_date),
                    participant,
                })
            })
            .collect::<Result<Vec<_>, CommunityError>>()?;

        Ok(Participations { flights, dates })
    }

    fn contact_card(
        &self,
        visibility: Visibility,
        phone: &str,
        user: &AccountId,
    ) -> Result<ContactCard, CommunityError> {
        let account = if visibility.show_email || visibility.show_linkedin {
            self.accounts.find_by_id(user)?
        } else {
            None
        };
        Ok(ContactCard::new(visibility, phone, account.as_ref()))
    }
}

fn membership_error(e: StoreError) -> CommunityError {
    match e.duplicate_key() {
        Some(UniqueKey::Membership) => CommunityError::rejected(ALREADY_A_MEMBER),
        _ => e.into(),
    }
}
