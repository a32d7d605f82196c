//! Trip Admin Stats Library
//!
//! Re-exports modules for integration testing and the binaries.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod stats;
pub mod store;
pub mod telemetry;

mod error;

pub use config::Config;
pub use error::{AppError, AppResult, ErrorResponse};
pub use stats::{StatsService, StatsSettings};
pub use store::{MemoryStatsStore, PgStatsStore, StatsStore, StoreError};

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the application router
pub fn build_router(stats: StatsService) -> Router {
    Router::new()
        // Health check
        .route("/health", axum::routing::get(health_check))
        .nest("/api/admin", api::admin_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(stats)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
