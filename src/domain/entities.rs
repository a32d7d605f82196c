//! Platform Entities
//!
//! Read-only views of the records owned by the trip planning backend.
//! The statistics service never writes any of these.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Entity kinds that can be counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Trip,
    City,
    Activity,
}

impl EntityKind {
    /// All countable kinds, in report order
    pub const ALL: [EntityKind; 4] = [
        EntityKind::User,
        EntityKind::Trip,
        EntityKind::City,
        EntityKind::Activity,
    ];

    /// Backing table name
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Trip => "trips",
            EntityKind::City => "cities",
            EntityKind::Activity => "activities",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::User => "user",
            EntityKind::Trip => "trip",
            EntityKind::City => "city",
            EntityKind::Activity => "activity",
        };
        write!(f, "{}", name)
    }
}

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Platform user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// A planned trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

/// City reference row. `id` is a slug such as `new-york`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: String,
    pub name: String,
    pub country: String,
    /// 1 (cheap) to 10 (expensive)
    pub cost_index: i32,
    /// 0 to 100
    pub popularity: i32,
    pub image_url: Option<String>,
}

/// Activity reference row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub category: String,
    pub cost: Decimal,
    /// Minutes
    pub duration: i32,
    pub image_url: Option<String>,
}

/// Join record: a trip visits a city
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripStop {
    pub trip_id: String,
    pub city_id: String,
}

/// Join record: a trip includes an activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripActivity {
    pub trip_id: String,
    pub activity_id: String,
}
