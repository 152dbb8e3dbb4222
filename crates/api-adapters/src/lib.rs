//! # api-adapters
//!
//! Inbound HTTP adapter. Maps verbs and paths onto the service layer and
//! service outcomes onto status codes and JSON bodies.

#[cfg(feature = "web-axum")]
pub mod http;

#[cfg(feature = "web-axum")]
pub use http::{build_router, serve, ApiError, AppState, ServerError};
