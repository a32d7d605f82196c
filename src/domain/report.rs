//! Report types
//!
//! Output shapes of the statistics service. Field names follow the
//! dashboard's JSON contract (camelCase).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entities::Role;

/// Platform-wide statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub user_count: u64,
    pub trip_count: u64,
    pub city_count: u64,
    pub activity_count: u64,
    pub top_cities: Vec<TopCity>,
    pub top_activities: Vec<TopActivity>,
}

/// A city ranked by the number of trip stops referencing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCity {
    pub city: String,
    pub country: String,
    pub trip_count: u64,
}

/// An activity ranked by the number of trips including it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopActivity {
    pub activity: String,
    pub category: String,
    pub usage_count: u64,
}

/// Recent trip creation, bucketed by UTC day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripAnalytics {
    pub recent_trips: u64,
    /// Sparse: days without trips are absent
    pub trips_by_day: BTreeMap<String, u64>,
}

/// User listing row with the number of trips the user owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOverview {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub trip_count: u64,
}
