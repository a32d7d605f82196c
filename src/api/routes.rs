//! API Routes
//!
//! HTTP endpoint definitions for the admin dashboard.

use axum::{extract::State, routing::get, Json, Router};

use crate::domain::{PlatformStats, TripAnalytics, UserOverview};
use crate::error::AppResult;
use crate::stats::StatsService;

// =========================================================================
// API Router
// =========================================================================

/// Create the admin API router
pub fn create_router() -> Router<StatsService> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/analytics", get(get_analytics))
        .route("/users", get(get_users))
}

// =========================================================================
// GET /stats
// =========================================================================

/// Platform counts and top rankings
async fn get_stats(State(stats): State<StatsService>) -> AppResult<Json<PlatformStats>> {
    let report = stats.platform_stats().await?;
    Ok(Json(report))
}

// =========================================================================
// GET /analytics
// =========================================================================

/// Trips created per day over the trailing window
async fn get_analytics(
    State(stats): State<StatsService>,
) -> AppResult<Json<TripAnalytics>> {
    let analytics = stats.trip_analytics().await?;
    Ok(Json(analytics))
}

// =========================================================================
// GET /users
// =========================================================================

/// All users with their trip counts, newest first
async fn get_users(State(stats): State<StatsService>) -> AppResult<Json<Vec<UserOverview>>> {
    let users = stats.user_overview().await?;
    Ok(Json(users))
}
