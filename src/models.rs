//! Data models for network access analytics

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single network access record, as produced by the collection layer.
///
/// `timestamp`, `user_id`, and `department` are always present; the
/// remaining fields degrade gracefully when absent (`bytes` counts as 0,
/// events without a `site_category` are excluded from category breakdowns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessEvent {
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub department: String,
    pub src_ip: String,
    pub dst_ip: String,
    pub domain: Option<String>,
    pub url: String,
    pub method: String,
    pub bytes: Option<u64>,
    pub user_agent: String,
    pub site_category: Option<String>,
}

impl AccessEvent {
    /// Byte count with absent values treated as zero.
    pub fn bytes_or_zero(&self) -> u64 {
        self.bytes.unwrap_or(0)
    }
}

/// Closed time interval `[start, end]` for filtering analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Create a range, rejecting `end < start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(Error::Validation(format!(
                "time range end {end} precedes start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a range from two RFC 3339 timestamps.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = DateTime::parse_from_rfc3339(start)?.with_timezone(&Utc);
        let end = DateTime::parse_from_rfc3339(end)?.with_timezone(&Utc);
        Self::new(start, end)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Partition a flat event batch into per-user batches.
///
/// This is the driver-side half of the profiling contract: the profile
/// engine only ever receives the resulting mapping, never a flat list it
/// must partition itself.
pub fn group_by_user(events: &[AccessEvent]) -> HashMap<String, Vec<AccessEvent>> {
    let mut by_user: HashMap<String, Vec<AccessEvent>> = HashMap::new();
    for event in events {
        by_user
            .entry(event.user_id.clone())
            .or_default()
            .push(event.clone());
    }
    by_user
}
