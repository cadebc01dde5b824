//! Axum-based RPC server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use village_community::{CityService, ContactService, GroupService, ListingService};
use village_mail::{CodeRecovery, Mailer};
use village_store::{AccountStore, CityStore, ContactStore, GroupStore, ListingStore};
use village_types::{Clock, Timestamp};
use village_verification::{AccessCodeGenerator, AnswerKey, SessionResolver, VerificationEngine};

use crate::error::RpcError;
use crate::handlers;

/// One handle per store trait. They usually point at the same backend.
#[derive(Clone)]
pub struct Stores {
    pub accounts: Arc<dyn AccountStore + Send + Sync>,
    pub listings: Arc<dyn ListingStore + Send + Sync>,
    pub contacts: Arc<dyn ContactStore + Send + Sync>,
    pub groups: Arc<dyn GroupStore + Send + Sync>,
    pub cities: Arc<dyn CityStore + Send + Sync>,
}

impl Stores {
    /// Use a single backend for every store.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: AccountStore + ListingStore + ContactStore + GroupStore + CityStore + Send + Sync + 'static,
    {
        Self {
            accounts: store.clone(),
            listings: store.clone(),
            contacts: store.clone(),
            groups: store.clone(),
            cities: store,
        }
    }
}

/// Everything a handler can reach.
pub struct RpcState {
    pub engine: VerificationEngine,
    pub sessions: SessionResolver,
    pub recovery: CodeRecovery,
    pub listings: ListingService,
    pub contacts: ContactService,
    pub groups: GroupService,
    pub cities: CityService,
    pub clock: Arc<dyn Clock>,
}

impl RpcState {
    pub fn new(
        stores: Stores,
        answer_key: Arc<AnswerKey>,
        codes: AccessCodeGenerator,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            engine: VerificationEngine::new(answer_key, stores.accounts.clone(), codes),
            sessions: SessionResolver::new(stores.accounts.clone()),
            recovery: CodeRecovery::new(stores.accounts.clone(), mailer),
            listings: ListingService::new(stores.listings.clone(), stores.accounts.clone()),
            contacts: ContactService::new(
                stores.contacts,
                stores.listings,
                stores.accounts.clone(),
            ),
            groups: GroupService::new(stores.groups, stores.accounts),
            cities: CityService::new(stores.cities),
            clock,
        }
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }
}

/// Build the full router with every route.
pub fn router(state: Arc<RpcState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Verification and sessions
        .route("/api/verify-attendee", post(handlers::verify_attendee))
        .route("/api/login", post(handlers::login))
        .route("/api/recover-code", post(handlers::recover_code))
        // Accommodations
        .route(
            "/api/accommodations",
            get(handlers::list_accommodations)
                .post(handlers::create_accommodation)
                .delete(handlers::delete_accommodation),
        )
        .route("/api/accommodations/:id", get(handlers::get_accommodation))
        .route("/api/host/accommodations", get(handlers::host_accommodations))
        // Contact exchange
        .route("/api/contact-requests", post(handlers::request_contact))
        .route(
            "/api/host/contact-requests",
            get(handlers::host_contact_requests).patch(handlers::act_on_contact_request),
        )
        .route("/api/host/contact-shares", get(handlers::contact_shares))
        // Groups
        .route(
            "/api/flight-groups",
            get(handlers::list_flight_groups).post(handlers::create_flight_group),
        )
        .route("/api/flight-groups/join", post(handlers::join_flight_group))
        .route("/api/flight-groups/leave", post(handlers::leave_flight_group))
        .route(
            "/api/date-groups",
            get(handlers::list_date_groups).post(handlers::create_date_group),
        )
        .route("/api/date-groups/join", post(handlers::join_date_group))
        .route("/api/date-groups/leave", post(handlers::leave_date_group))
        .route("/api/participations", get(handlers::participations))
        // City directory
        .route(
            "/api/cities",
            get(handlers::search_cities).post(handlers::submit_city),
        )
        .fallback(handlers::not_found)
        .with_state(state)
}

pub struct RpcServer {
    pub addr: SocketAddr,
    pub enable_cors: bool,
    state: Arc<RpcState>,
}

impl RpcServer {
    pub fn new(addr: SocketAddr, state: Arc<RpcState>) -> Self {
        Self {
            addr,
            enable_cors: true,
            state,
        }
    }

    pub fn with_cors(mut self, enable: bool) -> Self {
        self.enable_cors = enable;
        self
    }

    pub fn app(&self) -> Router {
        let app = router(self.state.clone()).layer(TraceLayer::new_for_http());
        if self.enable_cors {
            app.layer(CorsLayer::permissive())
        } else {
            app
        }
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn start<F>(&self, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {}: {e}", self.addr)))?;
        tracing::info!(addr = %self.addr, cors = self.enable_cors, "HTTP server listening");

        axum::serve(listener, self.app())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}
