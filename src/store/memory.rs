//! In-memory Store
//!
//! [`StatsStore`] over plain vectors. Used as a fixture in tests and for
//! local runs without a database. Failures can be injected per operation,
//! and every call is recorded so tests can assert query shapes.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Activity, City, EntityKind, Trip, TripActivity, TripStop, User, UserOverview};
use crate::stats::ranking::{count_occurrences, rank, RankedKey};

use super::{ReferenceRow, ReferenceTable, StatsStore, StoreError, StoreResult, UsageTable};

/// A store operation, used for failure injection and call recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    Count(EntityKind),
    GroupedCounts(UsageTable),
    LookupReferences(ReferenceTable),
    TripTimestamps,
    UserOverviews,
}

#[derive(Debug, Default)]
struct Dataset {
    users: Vec<User>,
    trips: Vec<Trip>,
    cities: Vec<City>,
    activities: Vec<Activity>,
    trip_stops: Vec<TripStop>,
    trip_activities: Vec<TripActivity>,
}

/// In-memory statistics store
#[derive(Debug, Default)]
pub struct MemoryStatsStore {
    data: RwLock<Dataset>,
    failing: RwLock<HashSet<StoreOperation>>,
    calls: Mutex<Vec<StoreOperation>>,
}

impl MemoryStatsStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(self, users: impl IntoIterator<Item = User>) -> Self {
        self.mutate(|data| data.users.extend(users));
        self
    }

    pub fn with_trips(self, trips: impl IntoIterator<Item = Trip>) -> Self {
        self.mutate(|data| data.trips.extend(trips));
        self
    }

    pub fn with_cities(self, cities: impl IntoIterator<Item = City>) -> Self {
        self.mutate(|data| data.cities.extend(cities));
        self
    }

    pub fn with_activities(self, activities: impl IntoIterator<Item = Activity>) -> Self {
        self.mutate(|data| data.activities.extend(activities));
        self
    }

    pub fn with_trip_stops(self, stops: impl IntoIterator<Item = TripStop>) -> Self {
        self.mutate(|data| data.trip_stops.extend(stops));
        self
    }

    pub fn with_trip_activities(self, items: impl IntoIterator<Item = TripActivity>) -> Self {
        self.mutate(|data| data.trip_activities.extend(items));
        self
    }

    /// Remove a city while stops may still reference it
    pub fn remove_city(&self, id: &str) {
        self.mutate(|data| data.cities.retain(|c| c.id != id));
    }

    /// Make every subsequent call of `operation` fail as unavailable
    pub fn fail_on(&self, operation: StoreOperation) {
        if let Ok(mut failing) = self.failing.write() {
            failing.insert(operation);
        }
    }

    /// Clear all injected failures
    pub fn recover(&self) {
        if let Ok(mut failing) = self.failing.write() {
            failing.clear();
        }
    }

    /// Operations issued so far, in call order
    pub fn calls(&self) -> Vec<StoreOperation> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of times `operation` was issued
    pub fn call_count(&self, operation: StoreOperation) -> usize {
        self.calls().iter().filter(|c| **c == operation).count()
    }

    fn mutate(&self, f: impl FnOnce(&mut Dataset)) {
        if let Ok(mut data) = self.data.write() {
            f(&mut data);
        }
    }

    /// Record the call, fail if injected, then run `f` over the dataset
    fn read<T>(&self, operation: StoreOperation, f: impl FnOnce(&Dataset) -> T) -> StoreResult<T> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(operation);
        }

        let failing = self
            .failing
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        if failing.contains(&operation) {
            return Err(StoreError::Unavailable(format!(
                "injected failure for {:?}",
                operation
            )));
        }
        drop(failing);

        let data = self
            .data
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(f(&data))
    }
}

#[async_trait]
impl StatsStore for MemoryStatsStore {
    async fn count(&self, kind: EntityKind) -> StoreResult<u64> {
        self.read(StoreOperation::Count(kind), |data| {
            let count = match kind {
                EntityKind::User => data.users.len(),
                EntityKind::Trip => data.trips.len(),
                EntityKind::City => data.cities.len(),
                EntityKind::Activity => data.activities.len(),
            };
            count as u64
        })
    }

    async fn grouped_counts(
        &self,
        usage: UsageTable,
        limit: usize,
    ) -> StoreResult<Vec<RankedKey<String>>> {
        // Native order for ties is first appearance in the join table.
        self.read(StoreOperation::GroupedCounts(usage), |data| {
            let groups = match usage {
                UsageTable::TripStops => {
                    count_occurrences(data.trip_stops.iter().map(|s| s.city_id.clone()))
                }
                UsageTable::TripActivities => count_occurrences(
                    data.trip_activities.iter().map(|a| a.activity_id.clone()),
                ),
            };
            rank(groups, limit)
        })
    }

    async fn lookup_references(
        &self,
        reference: ReferenceTable,
        ids: &[String],
    ) -> StoreResult<Vec<ReferenceRow>> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();

        self.read(StoreOperation::LookupReferences(reference), |data| match reference {
            ReferenceTable::Cities => data
                .cities
                .iter()
                .filter(|c| wanted.contains(c.id.as_str()))
                .map(|c| ReferenceRow {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    detail: c.country.clone(),
                })
                .collect(),
            ReferenceTable::Activities => data
                .activities
                .iter()
                .filter(|a| wanted.contains(a.id.as_str()))
                .map(|a| ReferenceRow {
                    id: a.id.clone(),
                    name: a.name.clone(),
                    detail: a.category.clone(),
                })
                .collect(),
        })
    }

    async fn trip_timestamps_since(&self, since: DateTime<Utc>) -> StoreResult<Vec<DateTime<Utc>>> {
        self.read(StoreOperation::TripTimestamps, |data| {
            let mut timestamps: Vec<DateTime<Utc>> = data
                .trips
                .iter()
                .map(|t| t.created_at)
                .filter(|created_at| *created_at >= since)
                .collect();
            timestamps.sort_by(|a, b| b.cmp(a));
            timestamps
        })
    }

    async fn user_overviews(&self) -> StoreResult<Vec<UserOverview>> {
        self.read(StoreOperation::UserOverviews, |data| {
            let mut trips_per_owner: HashMap<&str, u64> = HashMap::new();
            for trip in &data.trips {
                *trips_per_owner.entry(trip.owner_id.as_str()).or_insert(0) += 1;
            }

            let mut users: Vec<&User> = data.users.iter().collect();
            users.sort_by(|a, b| b.created_at.cmp(&a.created_at));

            users
                .into_iter()
                .map(|u| UserOverview {
                    id: u.id.clone(),
                    email: u.email.clone(),
                    name: u.name.clone(),
                    role: u.role,
                    created_at: u.created_at,
                    trip_count: trips_per_owner.get(u.id.as_str()).copied().unwrap_or(0),
                })
                .collect()
        })
    }
}
