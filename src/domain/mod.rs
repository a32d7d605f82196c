//! Domain module
//!
//! Platform entities and report types.

pub mod context;
pub mod entities;
pub mod report;

pub use context::RequestContext;
pub use entities::{Activity, City, EntityKind, Role, Trip, TripActivity, TripStop, User};
pub use report::{PlatformStats, TopActivity, TopCity, TripAnalytics, UserOverview};
