//! API module
//!
//! HTTP API endpoints and middleware.

pub mod middleware;
pub mod routes;

use axum::Router;

use crate::stats::StatsService;

pub use routes::create_router;

/// Admin API with correlation and logging middleware applied, ready to nest.
///
/// Axum layers run in reverse order: correlation -> logging -> handler.
pub fn admin_router() -> Router<StatsService> {
    create_router()
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(axum::middleware::from_fn(middleware::correlation_middleware))
}
