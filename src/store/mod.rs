//! Store module
//!
//! Read-only query interface over the platform dataset.
//! The statistics service depends on [`StatsStore`] only, so the Postgres
//! store and the in-memory store are interchangeable.

mod error;
mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{EntityKind, UserOverview};
use crate::stats::ranking::RankedKey;

pub use error::{StoreError, StoreResult};
pub use memory::{MemoryStatsStore, StoreOperation};
pub use postgres::PgStatsStore;

/// Join tables that record usage of a reference entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageTable {
    /// `trip_stops`, grouped by `city_id`
    TripStops,
    /// `trip_activities`, grouped by `activity_id`
    TripActivities,
}

impl UsageTable {
    pub fn table(&self) -> &'static str {
        match self {
            UsageTable::TripStops => "trip_stops",
            UsageTable::TripActivities => "trip_activities",
        }
    }

    /// Column holding the grouping key
    pub fn key_column(&self) -> &'static str {
        match self {
            UsageTable::TripStops => "city_id",
            UsageTable::TripActivities => "activity_id",
        }
    }
}

/// Tables holding descriptive attributes for ranked keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceTable {
    Cities,
    Activities,
}

impl ReferenceTable {
    pub fn table(&self) -> &'static str {
        match self {
            ReferenceTable::Cities => "cities",
            ReferenceTable::Activities => "activities",
        }
    }

    /// Column holding the secondary display attribute
    pub fn detail_column(&self) -> &'static str {
        match self {
            ReferenceTable::Cities => "country",
            ReferenceTable::Activities => "category",
        }
    }
}

/// Display projection of a reference row: id, name and one secondary
/// attribute (country for cities, category for activities).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRow {
    pub id: String,
    pub name: String,
    pub detail: String,
}

/// Read-only queries the statistics service needs from the store.
///
/// Each call is an independent snapshot; no cross-call consistency is
/// promised.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Number of rows of the given kind
    async fn count(&self, kind: EntityKind) -> StoreResult<u64>;

    /// Occurrences per distinct key of a usage table, ordered by count
    /// descending. Equal counts keep the store's native order. The store
    /// may return at most `limit` groups.
    async fn grouped_counts(
        &self,
        usage: UsageTable,
        limit: usize,
    ) -> StoreResult<Vec<RankedKey<String>>>;

    /// Batch lookup of reference rows whose id is in `ids`.
    /// Ids without a row are simply absent from the result.
    async fn lookup_references(
        &self,
        reference: ReferenceTable,
        ids: &[String],
    ) -> StoreResult<Vec<ReferenceRow>>;

    /// Creation timestamps of trips created at or after `since`
    async fn trip_timestamps_since(&self, since: DateTime<Utc>) -> StoreResult<Vec<DateTime<Utc>>>;

    /// All users, newest first, with the number of trips each owns
    async fn user_overviews(&self) -> StoreResult<Vec<UserOverview>>;
}
