//! Statistics module
//!
//! Counting, ranking and trend aggregation over the platform store.

pub mod counting;
pub mod ranking;
pub mod service;
pub mod trend;

pub use ranking::{RankedKey, RankedRow, Ranker};
pub use service::{StatsService, StatsSettings};
pub use trend::{DailyTrend, TrendBuilder};
