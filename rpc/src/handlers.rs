//! RPC request handlers.
//!
//! Verification, session, recovery and accommodation payloads use camelCase
//! keys; group and city payloads use snake_case, as the web client sends them.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};
use village_community::{
    DateGroupView, DateJoin, FlightGroupView, FlightJoin, HostRequestView, ListingDraft,
    Participations, RequestAction, ShareView,
};
use village_mail::RecoveryStatus;
use village_store::city::{ApprovedCity, CitySubmission};
use village_store::contact::{ContactRequest, RequestStatus};
use village_store::group::{DateGroup, DateParticipant, FlightGroup, FlightParticipant};
use village_store::listing::Listing;
use village_types::{AccountId, GroupId, ListingId, RequestId};
use village_verification::{RiskLevel, SessionError, Submission, VerificationOutcome};

use crate::auth::CurrentUser;
use crate::error::RpcError;
use crate::server::RpcState;

type AppState = State<Arc<RpcState>>;
type RpcResult<T> = Result<Json<T>, RpcError>;

const RECOVERY_MESSAGE: &str = "If an account exists with this email, we've sent the access code.";
const CITY_SUBMITTED_MESSAGE: &str =
    "City submitted for approval! It will be reviewed and added within 24-48 hours.";

/// Run store writes on the blocking pool. LMDB admits one writer at a time,
/// so a waiting write must not hold an async worker.
async fn blocking<T, F>(state: &Arc<RpcState>, f: F) -> Result<T, RpcError>
where
    F: FnOnce(&RpcState) -> Result<T, RpcError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state)).await?
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn not_found() -> RpcError {
    RpcError::NotFound("Not found".to_string())
}

// ── Verification ─────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    pub question: &'static str,
    pub score: u32,
    pub max_score: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub score: u32,
    pub passed: bool,
    pub reasoning: String,
    pub access_code: Option<String>,
    pub risk_level: RiskLevel,
    pub breakdown: Vec<BreakdownEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl From<&VerificationOutcome> for VerifyResponse {
    fn from(outcome: &VerificationOutcome) -> Self {
        Self {
            score: outcome.total_score,
            passed: outcome.passed,
            reasoning: outcome.reasoning(),
            access_code: outcome.access_code.as_ref().map(|c| c.as_str().to_string()),
            risk_level: outcome.risk_level,
            breakdown: outcome
                .breakdown
                .iter()
                .map(|s| BreakdownEntry {
                    question: s.question.label(),
                    score: s.awarded,
                    max_score: s.max_points,
                })
                .collect(),
            error: outcome.rejection.map(|r| r.error_message()),
        }
    }
}

pub async fn verify_attendee(
    State(state): AppState,
    Json(submission): Json<Submission>,
) -> RpcResult<VerifyResponse> {
    if let Err(e) = submission.validate() {
        debug!(field = e.field, "verification form rejected");
        return Err(e.into());
    }
    let outcome = blocking(&state, move |s| Ok(s.engine.verify(&submission, s.now())?)).await?;
    Ok(Json(VerifyResponse::from(&outcome)))
}

// ── Session ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub access_code: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: AccountId,
    pub email: String,
    pub linkedin_url: String,
    pub verified: bool,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserView,
}

pub async fn login(
    State(state): AppState,
    Json(req): Json<LoginRequest>,
) -> RpcResult<LoginResponse> {
    if req.access_code.trim().is_empty() {
        return Err(RpcError::invalid("Access code is required"));
    }
    let account = state.sessions.resolve(&req.access_code).map_err(|e| match e {
        SessionError::Store(e) => RpcError::from(e),
        _ => RpcError::Unauthorized(
            "Invalid access code. Please check your code and try again.".to_string(),
        ),
    })?;
    info!(email = %account.email, identity_url = %account.identity_url, "successful login");

    Ok(Json(LoginResponse {
        success: true,
        user: UserView {
            id: account.id,
            email: account.email.to_string(),
            linkedin_url: account.identity_url,
            verified: account.verified,
        },
    }))
}

#[derive(Deserialize)]
pub struct RecoverRequest {
    #[serde(default)]
    pub email: String,
}

pub async fn recover_code(
    State(state): AppState,
    Json(req): Json<RecoverRequest>,
) -> RpcResult<Value> {
    // Both outcomes answer alike so the response does not reveal whether
    // the account exists.
    let status: RecoveryStatus = state.recovery.recover(&req.email).await?;
    debug!(?status, "code recovery handled");
    Ok(Json(json!({ "success": true, "message": RECOVERY_MESSAGE })))
}

// ── Accommodations ───────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ListingsResponse {
    pub listings: Vec<Listing>,
}

pub async fn list_accommodations(State(state): AppState) -> RpcResult<ListingsResponse> {
    Ok(Json(ListingsResponse {
        listings: state.listings.list_active()?,
    }))
}

pub async fn get_accommodation(
    State(state): AppState,
    Path(id): Path<String>,
) -> RpcResult<Value> {
    let listing = state.listings.get(&ListingId::new(id))?;
    Ok(Json(json!({ "accommodation": listing })))
}

pub async fn host_accommodations(
    State(state): AppState,
    CurrentUser(user): CurrentUser,
) -> RpcResult<ListingsResponse> {
    Ok(Json(ListingsResponse {
        listings: state.listings.by_host(&user.id)?,
    }))
}

pub async fn create_accommodation(
    State(state): AppState,
    CurrentUser(user): CurrentUser,
    Json(draft): Json<ListingDraft>,
) -> RpcResult<Value> {
    let listing = blocking(&state, move |s| {
        Ok(s.listings.create(&user.id, draft, s.now())?)
    })
    .await?;
    Ok(Json(json!({ "success": true, "listing": listing })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteListingRequest {
    #[serde(default)]
    pub listing_id: String,
}

pub async fn delete_accommodation(
    State(state): AppState,
    CurrentUser(user): CurrentUser,
    Json(req): Json<DeleteListingRequest>,
) -> RpcResult<Value> {
    if req.listing_id.is_empty() {
        return Err(RpcError::invalid("Listing ID is required"));
    }
    let listing_id = ListingId::new(req.listing_id);
    blocking(&state, move |s| Ok(s.listings.delete(&user.id, &listing_id, s.now())?)).await?;
    Ok(Json(json!({ "success": true, "message": "Listing deleted successfully" })))
}

// ── Contact exchange ─────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactRequestBody {
    pub accommodation_id: String,
    pub message: String,
    pub phone: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequestResponse {
    pub success: bool,
    pub contact_request: ContactRequest,
}

pub async fn request_contact(
    State(state): AppState,
    CurrentUser(user): CurrentUser,
    Json(req): Json<ContactRequestBody>,
) -> RpcResult<ContactRequestResponse> {
    let contact_request = blocking(&state, move |s| {
        Ok(s.contacts.request_contact(
            &user.id,
            &ListingId::new(req.accommodation_id),
            &req.message,
            &req.phone,
            s.now(),
        )?)
    })
    .await?;
    Ok(Json(ContactRequestResponse {
        success: true,
        contact_request,
    }))
}

#[derive(Serialize)]
pub struct HostRequestsResponse {
    pub requests: Vec<HostRequestView>,
}

pub async fn host_contact_requests(
    State(state): AppState,
    CurrentUser(user): CurrentUser,
) -> RpcResult<HostRequestsResponse> {
    Ok(Json(HostRequestsResponse {
        requests: state.contacts.requests_for_host(&user.id)?,
    }))
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestActionBody {
    pub request_id: String,
    pub action: String,
}

#[derive(Serialize)]
pub struct RequestActionResponse {
    pub success: bool,
    pub action: String,
    pub status: RequestStatus,
}

pub async fn act_on_contact_request(
    State(state): AppState,
    CurrentUser(user): CurrentUser,
    Json(req): Json<RequestActionBody>,
) -> RpcResult<RequestActionResponse> {
    let action =
        RequestAction::parse(&req.action).ok_or_else(|| RpcError::invalid("Invalid action"))?;
    let request_id = RequestId::new(req.request_id);
    let status = blocking(&state, move |s| {
        Ok(s.contacts.act_on_request(&user.id, &request_id, action, s.now())?)
    })
    .await?;
    Ok(Json(RequestActionResponse {
        success: true,
        action: req.action,
        status,
    }))
}

#[derive(Serialize)]
pub struct SharesResponse {
    pub shares: Vec<ShareView>,
}

pub async fn contact_shares(
    State(state): AppState,
    CurrentUser(user): CurrentUser,
) -> RpcResult<SharesResponse> {
    Ok(Json(SharesResponse {
        shares: state.contacts.shares_for_user(&user.id)?,
    }))
}

// ── Groups ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct GroupsResponse<T> {
    pub groups: Vec<T>,
}

#[derive(Serialize)]
pub struct GroupCreated<T> {
    pub success: bool,
    pub group: T,
}

#[derive(Serialize)]
pub struct Joined<T> {
    pub success: bool,
    pub participant: T,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct GroupRef {
    pub group_id: String,
}

impl GroupRef {
    fn id(&self) -> Result<GroupId, RpcError> {
        if self.group_id.trim().is_empty() {
            return Err(RpcError::invalid("Group ID is required"));
        }
        Ok(GroupId::new(self.group_id.trim()))
    }
}

#[derive(Deserialize)]
pub struct JoinRequest<T> {
    #[serde(flatten)]
    pub group: GroupRef,
    #[serde(flatten)]
    pub details: T,
}

fn left() -> Json<Value> {
    Json(json!({ "success": true, "message": "Successfully left the group" }))
}

pub async fn list_flight_groups(
    State(state): AppState,
) -> RpcResult<GroupsResponse<FlightGroupView>> {
    Ok(Json(GroupsResponse {
        groups: state.groups.list_flight_groups()?,
    }))
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CreateFlightGroup {
    pub departure_city: String,
}

pub async fn create_flight_group(
    State(state): AppState,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateFlightGroup>,
) -> RpcResult<GroupCreated<FlightGroup>> {
    let group = blocking(&state, move |s| {
        Ok(s.groups.create_flight_group(&user.id, &req.departure_city, s.now())?)
    })
    .await?;
    Ok(Json(GroupCreated {
        success: true,
        group,
    }))
}

pub async fn join_flight_group(
    State(state): AppState,
    CurrentUser(user): CurrentUser,
    Json(req): Json<JoinRequest<FlightJoin>>,
) -> RpcResult<Joined<FlightParticipant>> {
    let group_id = req.group.id()?;
    let participant = blocking(&state, move |s| {
        Ok(s.groups.join_flight_group(&user.id, &group_id, req.details, s.now())?)
    })
    .await?;
    Ok(Json(Joined {
        success: true,
        participant,
    }))
}

pub async fn leave_flight_group(
    State(state): AppState,
    CurrentUser(user): CurrentUser,
    Json(req): Json<GroupRef>,
) -> RpcResult<Value> {
    let group_id = req.id()?;
    blocking(&state, move |s| Ok(s.groups.leave_flight_group(&user.id, &group_id)?)).await?;
    Ok(left())
}

pub async fn list_date_groups(
    State(state): AppState,
) -> RpcResult<GroupsResponse<DateGroupView>> {
    Ok(Json(GroupsResponse {
        groups: state.groups.list_date_groups()?,
    }))
}

#[derive(Deserialize)]
pub struct CreateDateGroup {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub async fn create_date_group(
    State(state): AppState,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateDateGroup>,
) -> RpcResult<GroupCreated<DateGroup>> {
    let (Some(start), Some(end)) = (req.start_date, req.end_date) else {
        return Err(RpcError::invalid("Start date and end date are required"));
    };
    let group = blocking(&state, move |s| {
        Ok(s.groups.create_date_group(&user.id, start, end, s.now())?)
    })
    .await?;
    Ok(Json(GroupCreated {
        success: true,
        group,
    }))
}

pub async fn join_date_group(
    State(state): AppState,
    CurrentUser(user): CurrentUser,
    Json(req): Json<JoinRequest<DateJoin>>,
) -> RpcResult<Joined<DateParticipant>> {
    let group_id = req.group.id()?;
    let participant = blocking(&state, move |s| {
        Ok(s.groups.join_date_group(&user.id, &group_id, req.details, s.now())?)
    })
    .await?;
    Ok(Json(Joined {
        success: true,
        participant,
    }))
}

pub async fn leave_date_group(
    State(state): AppState,
    CurrentUser(user): CurrentUser,
    Json(req): Json<GroupRef>,
) -> RpcResult<Value> {
    let group_id = req.id()?;
    blocking(&state, move |s| Ok(s.groups.leave_date_group(&user.id, &group_id)?)).await?;
    Ok(left())
}

pub async fn participations(
    State(state): AppState,
    CurrentUser(user): CurrentUser,
) -> RpcResult<Participations> {
    Ok(Json(state.groups.participations(&user.id)?))
}

// ── City directory ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CitySearch {
    pub search: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct CitiesResponse {
    pub cities: Vec<ApprovedCity>,
}

pub async fn search_cities(
    State(state): AppState,
    Query(query): Query<CitySearch>,
) -> RpcResult<CitiesResponse> {
    Ok(Json(CitiesResponse {
        cities: state.cities.search(query.search.as_deref(), query.limit)?,
    }))
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct SubmitCity {
    pub city_name: String,
    pub country: String,
    pub region: Option<String>,
}

#[derive(Serialize)]
pub struct CitySubmitted {
    pub success: bool,
    pub message: &'static str,
    pub submission: CitySubmission,
}

pub async fn submit_city(
    State(state): AppState,
    CurrentUser(user): CurrentUser,
    Json(req): Json<SubmitCity>,
) -> RpcResult<CitySubmitted> {
    let submission = blocking(&state, move |s| {
        Ok(s.cities.submit(&user.id, &req.city_name, &req.country, req.region, s.now())?)
    })
    .await?;
    Ok(Json(CitySubmitted {
        success: true,
        message: CITY_SUBMITTED_MESSAGE,
        submission,
    }))
}
