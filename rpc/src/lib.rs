//! JSON HTTP server for the village web client.
//!
//! Provides endpoints for:
//! - Attendee verification, login and access-code recovery
//! - Accommodation listings and host/guest contact exchange
//! - Flight-buddy and date groups
//! - The departure-city directory
//!
//! Authenticated routes read the access code from the `x-access-code` header.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use server::{router, RpcServer, RpcState, Stores};
