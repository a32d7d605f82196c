//! Statistics Service
//!
//! Composes counts, rankings and trends into the dashboard reports.
//! Holds no state besides the injected store, so every call re-queries.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{EntityKind, PlatformStats, TopActivity, TopCity, TripAnalytics, UserOverview};
use crate::store::{StatsStore, StoreResult};

use super::counting::count;
use super::ranking::{Ranker, DEFAULT_TOP_N};
use super::trend::{TrendBuilder, DEFAULT_WINDOW_DAYS};

/// Tunables for report construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSettings {
    /// Entries per ranking list
    pub top_n: usize,
    /// Trailing window for trip analytics, in days
    pub window_days: u32,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

/// Statistics service
#[derive(Clone)]
pub struct StatsService {
    store: Arc<dyn StatsStore>,
    settings: StatsSettings,
}

impl StatsService {
    /// Create a new StatsService
    pub fn new(store: Arc<dyn StatsStore>, settings: StatsSettings) -> Self {
        Self { store, settings }
    }

    /// Platform-wide counts and top rankings.
    ///
    /// All six queries run concurrently. The first failure aborts the
    /// report; nothing partial is returned.
    pub async fn platform_stats(&self) -> StoreResult<PlatformStats> {
        let store = self.store.as_ref();
        let city_ranker = Ranker::<TopCity>::new(self.settings.top_n);
        let activity_ranker = Ranker::<TopActivity>::new(self.settings.top_n);

        let result = tokio::try_join!(
            count(store, EntityKind::User),
            count(store, EntityKind::Trip),
            count(store, EntityKind::City),
            count(store, EntityKind::Activity),
            city_ranker.run(store),
            activity_ranker.run(store),
        );

        let (user_count, trip_count, city_count, activity_count, top_cities, top_activities) =
            match result {
                Ok(parts) => parts,
                Err(e) => {
                    tracing::error!(error = %e, timeout = e.is_timeout(), "Platform stats aborted");
                    return Err(e);
                }
            };

        tracing::info!(
            users = user_count,
            trips = trip_count,
            top_cities = top_cities.len(),
            top_activities = top_activities.len(),
            "Platform stats built"
        );

        Ok(PlatformStats {
            user_count,
            trip_count,
            city_count,
            activity_count,
            top_cities,
            top_activities,
        })
    }

    /// Trips created over the trailing window, by UTC day
    pub async fn trip_analytics(&self) -> StoreResult<TripAnalytics> {
        self.trip_analytics_at(Utc::now()).await
    }

    /// Same as [`trip_analytics`](Self::trip_analytics) with an explicit `now`
    pub async fn trip_analytics_at(&self, now: DateTime<Utc>) -> StoreResult<TripAnalytics> {
        let trend = TrendBuilder::new(self.settings.window_days)
            .build(self.store.as_ref(), now)
            .await?;

        Ok(TripAnalytics {
            recent_trips: trend.total_count,
            trips_by_day: trend.by_day,
        })
    }

    /// Users, newest first, with their trip counts
    pub async fn user_overview(&self) -> StoreResult<Vec<UserOverview>> {
        let users = self.store.user_overviews().await?;
        tracing::debug!(users = users.len(), "User overview built");
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Activity, City, Role, Trip, TripActivity, TripStop, User};
    use crate::store::{MemoryStatsStore, ReferenceTable, StoreError, StoreOperation, UsageTable};
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn city(id: &str, name: &str, country: &str) -> City {
        City {
            id: id.to_string(),
            name: name.to_string(),
            country: country.to_string(),
            cost_index: 5,
            popularity: 50,
            image_url: None,
        }
    }

    fn activity(id: &str, name: &str, category: &str) -> Activity {
        Activity {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            cost: Decimal::new(2500, 2),
            duration: 90,
            image_url: None,
        }
    }

    fn stops(city_id: &str, n: usize) -> Vec<TripStop> {
        (0..n)
            .map(|i| TripStop {
                trip_id: format!("trip-{}", i),
                city_id: city_id.to_string(),
            })
            .collect()
    }

    fn fixture() -> MemoryStatsStore {
        let created = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        let mut trip_stops = stops("paris", 5);
        trip_stops.extend(stops("rome", 5));
        trip_stops.extend(stops("nyc", 2));

        MemoryStatsStore::new()
            .with_users(vec![User {
                id: "u1".to_string(),
                email: "ada@example.com".to_string(),
                name: "Ada".to_string(),
                role: Role::Admin,
                created_at: created,
            }])
            .with_trips(vec![Trip {
                id: "trip-0".to_string(),
                owner_id: "u1".to_string(),
                created_at: created,
            }])
            .with_cities(vec![city("paris", "Paris", "France"), city("rome", "Rome", "Italy")])
            .with_activities(vec![activity("louvre", "Louvre Tour", "culture")])
            .with_trip_stops(trip_stops)
            .with_trip_activities(vec![
                TripActivity {
                    trip_id: "trip-0".to_string(),
                    activity_id: "louvre".to_string(),
                },
                TripActivity {
                    trip_id: "trip-0".to_string(),
                    activity_id: "gone".to_string(),
                },
            ])
    }

    #[tokio::test]
    async fn test_platform_stats_ranks_and_enriches() {
        let store = Arc::new(fixture());
        let service = StatsService::new(store.clone(), StatsSettings::default());

        let stats = service.platform_stats().await.unwrap();
        assert_eq!(stats.user_count, 1);
        assert_eq!(stats.trip_count, 1);
        assert_eq!(stats.city_count, 2);
        assert_eq!(stats.activity_count, 1);

        let cities: Vec<(&str, &str, u64)> = stats
            .top_cities
            .iter()
            .map(|c| (c.city.as_str(), c.country.as_str(), c.trip_count))
            .collect();
        assert_eq!(
            cities,
            vec![("Paris", "France", 5), ("Rome", "Italy", 5), ("Unknown", "", 2)]
        );

        assert_eq!(stats.top_activities.len(), 2);
        assert_eq!(stats.top_activities[0].activity, "Louvre Tour");
        assert_eq!(stats.top_activities[1].activity, "Unknown");
        assert_eq!(stats.top_activities[1].category, "");
    }

    #[tokio::test]
    async fn test_enrichment_uses_one_batch_lookup_per_ranking() {
        let store = Arc::new(fixture());
        let service = StatsService::new(store.clone(), StatsSettings::default());

        service.platform_stats().await.unwrap();

        assert_eq!(store.call_count(StoreOperation::LookupReferences(ReferenceTable::Cities)), 1);
        assert_eq!(
            store.call_count(StoreOperation::LookupReferences(ReferenceTable::Activities)),
            1
        );
        assert_eq!(store.call_count(StoreOperation::GroupedCounts(UsageTable::TripStops)), 1);
    }

    #[tokio::test]
    async fn test_platform_stats_respects_top_n() {
        let store = Arc::new(fixture());
        let settings = StatsSettings {
            top_n: 1,
            ..StatsSettings::default()
        };
        let service = StatsService::new(store, settings);

        let stats = service.platform_stats().await.unwrap();
        assert_eq!(stats.top_cities.len(), 1);
        assert_eq!(stats.top_cities[0].city, "Paris");
        assert_eq!(stats.top_activities.len(), 1);
    }

    #[tokio::test]
    async fn test_platform_stats_is_idempotent() {
        let service = StatsService::new(Arc::new(fixture()), StatsSettings::default());

        let first = service.platform_stats().await.unwrap();
        let second = service.platform_stats().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_platform_stats_on_empty_store() {
        let service = StatsService::new(Arc::new(MemoryStatsStore::new()), StatsSettings::default());

        let stats = service.platform_stats().await.unwrap();
        assert_eq!(stats.user_count, 0);
        assert_eq!(stats.trip_count, 0);
        assert_eq!(stats.city_count, 0);
        assert_eq!(stats.activity_count, 0);
        assert!(stats.top_cities.is_empty());
        assert!(stats.top_activities.is_empty());
    }

    #[tokio::test]
    async fn test_any_failed_branch_fails_the_report() {
        let store = Arc::new(fixture());
        let service = StatsService::new(store.clone(), StatsSettings::default());

        store.fail_on(StoreOperation::LookupReferences(ReferenceTable::Activities));
        let err = service.platform_stats().await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));

        store.recover();
        for kind in EntityKind::ALL {
            store.fail_on(StoreOperation::Count(kind));
        }
        assert!(service.platform_stats().await.is_err());
    }

    #[tokio::test]
    async fn test_city_deleted_between_runs_degrades_to_unknown() {
        let store = Arc::new(fixture());
        let service = StatsService::new(store.clone(), StatsSettings::default());

        store.remove_city("rome");
        let stats = service.platform_stats().await.unwrap();

        assert_eq!(stats.top_cities.len(), 3);
        assert_eq!(stats.top_cities[1].city, "Unknown");
        assert_eq!(stats.top_cities[1].trip_count, 5);
    }

    #[tokio::test]
    async fn test_trip_analytics_window() {
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
        let trips = vec![
            // Outside the 30 day window
            Utc.with_ymd_and_hms(2023, 12, 25, 12, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 20, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 20, 22, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 0).unwrap(),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, created_at)| Trip {
            id: format!("trip-{}", i),
            owner_id: "u1".to_string(),
            created_at,
        });

        let store = Arc::new(MemoryStatsStore::new().with_trips(trips));
        let service = StatsService::new(store, StatsSettings::default());

        let analytics = service.trip_analytics_at(now).await.unwrap();
        assert_eq!(analytics.recent_trips, 3);
        assert_eq!(analytics.trips_by_day.get("2024-01-20"), Some(&2));
        assert_eq!(analytics.trips_by_day.get("2024-01-31"), Some(&1));
        assert!(!analytics.trips_by_day.contains_key("2023-12-25"));
        assert_eq!(
            analytics.trips_by_day.values().sum::<u64>(),
            analytics.recent_trips
        );
    }

    #[tokio::test]
    async fn test_user_overview_counts_trips() {
        let service = StatsService::new(Arc::new(fixture()), StatsSettings::default());

        let users = service.user_overview().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].trip_count, 1);
        assert_eq!(users[0].role, Role::Admin);
    }
}
