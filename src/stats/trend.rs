//! Time-Bucketed Trend Builder
//!
//! Buckets recent records by UTC calendar day.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::store::{StatsStore, StoreResult};

/// Default trailing window for analytics
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Per-day counts over a window. Days without records are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyTrend {
    pub total_count: u64,
    pub by_day: BTreeMap<String, u64>,
}

/// ISO-8601 date (`YYYY-MM-DD`) of a timestamp, truncated in UTC
pub fn day_key<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String {
    timestamp.with_timezone(&Utc).format("%Y-%m-%d").to_string()
}

/// Earliest timestamp inside a window of `window_days` ending at `now`.
///
/// Windows reaching past the representable range start at
/// [`DateTime::<Utc>::MIN_UTC`].
pub fn window_start(now: DateTime<Utc>, window_days: u32) -> DateTime<Utc> {
    now.checked_sub_signed(Duration::days(i64::from(window_days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Count timestamps per UTC day
pub fn bucket_by_day<Tz, I>(timestamps: I) -> DailyTrend
where
    Tz: TimeZone,
    I: IntoIterator<Item = DateTime<Tz>>,
{
    let mut trend = DailyTrend::default();
    for timestamp in timestamps {
        *trend.by_day.entry(day_key(&timestamp)).or_insert(0) += 1;
        trend.total_count += 1;
    }
    trend
}

/// Builds the daily trend of trip creation over a trailing window
#[derive(Debug, Clone, Copy)]
pub struct TrendBuilder {
    window_days: u32,
}

impl TrendBuilder {
    pub fn new(window_days: u32) -> Self {
        Self { window_days }
    }

    /// Fetch trips created in the window ending at `now` and bucket them
    pub async fn build(&self, store: &dyn StatsStore, now: DateTime<Utc>) -> StoreResult<DailyTrend> {
        let since = window_start(now, self.window_days);
        let timestamps = store.trip_timestamps_since(since).await?;

        let trend = bucket_by_day(timestamps.into_iter().filter(|t| *t >= since));

        tracing::debug!(
            window_days = self.window_days,
            total = trend.total_count,
            days = trend.by_day.len(),
            "Trend built"
        );

        Ok(trend)
    }
}
