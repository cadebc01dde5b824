//! Shared utilities for the village service.

pub mod logging;

pub use logging::{init_logging, LogFormat, UnknownLogFormat};
