//! # netprofile
//!
//! Aggregate traffic statistics and behavioral user profiles from
//! enterprise network access logs.
//!
//! ## Modules
//!
//! - `models` - Access event records, time ranges, and batch partitioning
//! - `stats` - Aggregate statistics engine (PV/UV, breakdowns, trends, rankings)
//! - `profile` - Per-user behavioral profiling and risk classification
//! - `generator` - Synthetic access log generation for demos and tests
//! - `report` - Console rendering of computed statistics and profiles
//! - `error` - Library error types
pub mod error;
pub mod generator;
pub mod models;
pub mod profile;
pub mod report;
pub mod stats;

#[cfg(test)]
pub mod testing;

pub use error::{Error, Result};
pub use models::{group_by_user, AccessEvent, TimeRange};
pub use profile::{ProfileEngine, RiskLevel, UserProfile};
pub use stats::{AggregateStats, StatsEngine};
