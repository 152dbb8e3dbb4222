//! Axum wiring: shared state, the router and the server loop.

mod error;
mod extractors;
mod middleware;
mod routes;
mod server;

use std::sync::Arc;

use axum::Router;
use prometheus_client::registry::Registry;
use services::Services;
use storage_adapters::PoolStats;

pub use error::ApiError;
pub use extractors::{Payload, PathId};
pub use server::{serve, ServerError};

/// Shared application state, one per process.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Connection accounting of the store behind `services`.
    pub pool: PoolStats,
    /// Backend name reported by `/health`.
    pub storage: &'static str,
    /// Metrics served by `/metrics`, with the pool metrics registered.
    pub metrics: Arc<Registry>,
}

impl AppState {
    pub fn new(services: Services, pool: PoolStats, storage: &'static str) -> Self {
        let mut registry = Registry::with_prefix("kanban");
        pool.register(&mut registry);
        Self {
            services,
            pool,
            storage,
            metrics: Arc::new(registry),
        }
    }
}

/// Build the full API router.
pub fn build_router(state: AppState, cors_permissive: bool) -> Router {
    let routes = Router::new()
        .merge(routes::health::router())
        .merge(routes::metrics::router())
        .merge(routes::users::router())
        .merge(routes::boards::router())
        .merge(routes::lists::router())
        .merge(routes::cards::router());

    middleware::apply(routes, cors_permissive).with_state(Arc::new(state))
}
