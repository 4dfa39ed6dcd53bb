//! Aggregate traffic statistics over access event batches
//!
//! Every operation is a pure function of its input batch: no shared state,
//! no I/O, no clock reads. Empty input yields zero-valued results rather
//! than errors.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{AccessEvent, TimeRange};

/// Aggregate counters for one batch of access events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Total number of events (page views).
    pub pv: u64,
    /// Number of distinct user ids.
    pub uv: u64,
    /// Sum of byte counts, absent counts as zero.
    pub total_bytes: u64,
    /// Users with at least one event; always equal to `uv`.
    pub active_users: u64,
    /// Event count per department.
    pub department_counts: HashMap<String, u64>,
    /// Event count per site category; events without a category are excluded.
    pub category_counts: HashMap<String, u64>,
}

/// Stateless engine computing aggregate statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsEngine;

impl StatsEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compute aggregate counters for a batch of events.
    pub fn compute(&self, events: &[AccessEvent]) -> AggregateStats {
        if events.is_empty() {
            return AggregateStats::default();
        }

        let mut stats = AggregateStats {
            pv: events.len() as u64,
            ..AggregateStats::default()
        };

        let mut users: HashSet<&str> = HashSet::new();
        for event in events {
            users.insert(&event.user_id);
            stats.total_bytes += event.bytes_or_zero();
            *stats
                .department_counts
                .entry(event.department.clone())
                .or_insert(0) += 1;
            if let Some(category) = &event.site_category {
                *stats.category_counts.entry(category.clone()).or_insert(0) += 1;
            }
        }
        stats.uv = users.len() as u64;
        stats.active_users = stats.uv;

        debug!(pv = stats.pv, uv = stats.uv, "computed aggregate stats");
        stats
    }

    /// Compute statistics over the events falling inside the closed
    /// interval `[range.start, range.end]`.
    pub fn compute_in_range(&self, events: &[AccessEvent], range: &TimeRange) -> AggregateStats {
        let filtered: Vec<AccessEvent> = events
            .iter()
            .filter(|e| range.contains(e.timestamp))
            .cloned()
            .collect();
        self.compute(&filtered)
    }

    /// Per-department statistics, one [`AggregateStats`] per distinct department.
    pub fn by_department(&self, events: &[AccessEvent]) -> HashMap<String, AggregateStats> {
        let mut partitions: HashMap<String, Vec<AccessEvent>> = HashMap::new();
        for event in events {
            partitions
                .entry(event.department.clone())
                .or_default()
                .push(event.clone());
        }
        partitions
            .into_iter()
            .map(|(dept, batch)| (dept, self.compute(&batch)))
            .collect()
    }

    /// Per-category statistics; events without a category are excluded.
    pub fn by_category(&self, events: &[AccessEvent]) -> HashMap<String, AggregateStats> {
        let mut partitions: HashMap<String, Vec<AccessEvent>> = HashMap::new();
        for event in events {
            if let Some(category) = &event.site_category {
                partitions
                    .entry(category.clone())
                    .or_default()
                    .push(event.clone());
            }
        }
        partitions
            .into_iter()
            .map(|(category, batch)| (category, self.compute(&batch)))
            .collect()
    }

    /// Per-day statistics keyed by calendar date, ascending.
    pub fn daily_trend(&self, events: &[AccessEvent]) -> BTreeMap<NaiveDate, AggregateStats> {
        let mut partitions: BTreeMap<NaiveDate, Vec<AccessEvent>> = BTreeMap::new();
        for event in events {
            partitions
                .entry(event.timestamp.date_naive())
                .or_default()
                .push(event.clone());
        }
        partitions
            .into_iter()
            .map(|(date, batch)| (date, self.compute(&batch)))
            .collect()
    }

    /// Event count per hour of day (0-23), ascending. Hours with no
    /// events are omitted; callers wanting all 24 buckets fill the gaps.
    pub fn hourly_trend(&self, events: &[AccessEvent]) -> BTreeMap<u32, u64> {
        let mut hourly: BTreeMap<u32, u64> = BTreeMap::new();
        for event in events {
            *hourly.entry(event.timestamp.hour()).or_insert(0) += 1;
        }
        hourly
    }

    /// Top `n` users by event count, descending. Equal counts order by
    /// user id ascending so rankings are reproducible.
    pub fn top_users(&self, events: &[AccessEvent], n: usize) -> Vec<(String, u64)> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for event in events {
            *counts.entry(event.user_id.clone()).or_insert(0) += 1;
        }
        rank(counts, n)
    }

    /// Top `n` domains by event count, descending, same tie-break as
    /// [`top_users`](Self::top_users). Events without a domain are skipped.
    pub fn top_domains(&self, events: &[AccessEvent], n: usize) -> Vec<(String, u64)> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for event in events {
            if let Some(domain) = &event.domain {
                *counts.entry(domain.clone()).or_insert(0) += 1;
            }
        }
        rank(counts, n)
    }
}

/// Sort a count map descending by count, ties by key ascending, keep `n`.
fn rank(counts: HashMap<String, u64>, n: usize) -> Vec<(String, u64)> {
    let mut ranked: Vec<(String, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::testing::fixtures::arb_events;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_uv_never_exceeds_pv(events in arb_events(0..80)) {
            let stats = StatsEngine::new().compute(&events);

            prop_assert!(stats.uv <= stats.pv);
            prop_assert_eq!(stats.active_users, stats.uv);
        }

        #[test]
        fn prop_department_counts_sum_to_pv(events in arb_events(0..80)) {
            let stats = StatsEngine::new().compute(&events);

            prop_assert_eq!(stats.department_counts.values().sum::<u64>(), stats.pv);
            prop_assert!(stats.category_counts.values().sum::<u64>() <= stats.pv);
        }

        #[test]
        fn prop_top_users_sorted_and_bounded(events in arb_events(0..80), n in 0usize..12) {
            let stats = StatsEngine::new().compute(&events);
            let top = StatsEngine::new().top_users(&events, n);

            prop_assert!(top.len() <= n.min(stats.uv as usize));
            prop_assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
            prop_assert!(top.iter().map(|(_, c)| c).sum::<u64>() <= stats.pv);
        }

        #[test]
        fn prop_compute_is_idempotent(events in arb_events(0..60)) {
            let engine = StatsEngine::new();

            prop_assert_eq!(engine.compute(&events), engine.compute(&events));
        }
    }
}
