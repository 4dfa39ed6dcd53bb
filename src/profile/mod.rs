//! Per-user behavioral profiles and risk classification
//!
//! Consumes one user's event batch and derives activity cadence, site
//! preference, off-hours and non-work ratios, and a discrete risk level.
//! Like the stats engine this is stateless; the only clock read happens
//! in [`ProfileEngine::compute_profile`], which stamps `computed_at` and
//! otherwise delegates to the fully deterministic
//! [`ProfileEngine::compute_profile_at`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::AccessEvent;

/// Site categories treated as unrelated to job function.
pub const NON_WORK_CATEGORIES: [&str; 4] = ["entertainment", "social", "shopping", "gaming"];

/// Mean bytes-per-event above which traffic volume contributes to risk.
const HIGH_VOLUME_BYTES: u64 = 10 * 1024 * 1024;

/// Fraction of events in the night window above which off-hours activity
/// contributes to risk.
const NIGHT_FRACTION_THRESHOLD: f64 = 0.3;

/// Non-work ratio above which browsing mix contributes to risk.
const NON_WORK_RATIO_THRESHOLD: f64 = 0.5;

/// Discrete risk classification derived from additive threshold scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Map a raw additive score (0-3) to a reported level, capped at High.
    pub fn from_score(score: u8) -> Self {
        match score {
            0 => Self::Low,
            1 => Self::Medium,
            _ => Self::High,
        }
    }

    /// Numeric form: 0 low, 1 medium, 2 high.
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }
}

/// Behavioral profile for one user, computed from that user's events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub display_name: String,
    pub department: String,
    /// Distinct calendar days with at least one event; >= 1 for any
    /// non-empty batch.
    pub active_days: u64,
    /// Events per active day, floored.
    pub avg_daily_pv: u64,
    /// Hour-of-day window with the most events, e.g. `"09:00-10:00"`.
    pub peak_time_slot: String,
    /// Most frequent site category, "unknown" substituted for absent ones.
    pub top_category: String,
    /// Most frequent domain, "unknown" substituted for absent ones.
    pub top_domain: String,
    /// Fraction of events in [`NON_WORK_CATEGORIES`], in [0, 1].
    pub non_work_ratio: f64,
    pub total_bytes: u64,
    /// Bytes per active day, floored.
    pub avg_daily_bytes: u64,
    pub risk_level: RiskLevel,
    pub computed_at: DateTime<Utc>,
}

/// Stateless engine computing user profiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileEngine;

impl ProfileEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compute a profile for one user's batch, stamped with the current
    /// time. Returns `None` for an empty batch; a valid zero-activity
    /// profile cannot otherwise occur since any non-empty batch has at
    /// least one active day.
    pub fn compute_profile(
        &self,
        events: &[AccessEvent],
        display_name: &str,
    ) -> Option<UserProfile> {
        self.compute_profile_at(events, display_name, Utc::now())
    }

    /// Deterministic core of profile computation: identical inputs yield
    /// bit-identical profiles.
    pub fn compute_profile_at(
        &self,
        events: &[AccessEvent],
        display_name: &str,
        computed_at: DateTime<Utc>,
    ) -> Option<UserProfile> {
        let first = events.first()?;

        let active_days = count_active_days(events);
        let pv = events.len() as u64;
        let total_bytes: u64 = events.iter().map(AccessEvent::bytes_or_zero).sum();
        let non_work_ratio = non_work_ratio(events);

        let profile = UserProfile {
            user_id: first.user_id.clone(),
            display_name: display_name.to_string(),
            department: first.department.clone(),
            active_days,
            avg_daily_pv: pv / active_days.max(1),
            peak_time_slot: peak_time_slot(events),
            top_category: top_category(events),
            top_domain: top_domain(events),
            non_work_ratio,
            total_bytes,
            avg_daily_bytes: total_bytes / active_days.max(1),
            risk_level: risk_level(events, non_work_ratio),
            computed_at,
        };

        debug!(
            user_id = %profile.user_id,
            risk = profile.risk_level.as_u8(),
            "computed user profile"
        );
        Some(profile)
    }

    /// Compute profiles for every user partition. Display names come from
    /// the directory mapping, defaulting to "unknown user"; users whose
    /// partition is empty are omitted.
    pub fn compute_batch_profiles(
        &self,
        events_by_user: &HashMap<String, Vec<AccessEvent>>,
        display_names: &HashMap<String, String>,
    ) -> HashMap<String, UserProfile> {
        let computed_at = Utc::now();
        let mut profiles = HashMap::new();

        for (user_id, events) in events_by_user {
            let name = display_names
                .get(user_id)
                .map_or("unknown user", String::as_str);
            if let Some(profile) = self.compute_profile_at(events, name, computed_at) {
                profiles.insert(user_id.clone(), profile);
            }
        }

        info!(
            users = events_by_user.len(),
            profiles = profiles.len(),
            "computed batch profiles"
        );
        profiles
    }
}

fn count_active_days(events: &[AccessEvent]) -> u64 {
    let days: BTreeSet<chrono::NaiveDate> =
        events.iter().map(|e| e.timestamp.date_naive()).collect();
    days.len() as u64
}

/// Hour with the most events; ties go to the lowest hour. Formatted as
/// an hour range, wrapping 23:00 to 24:00.
fn peak_time_slot(events: &[AccessEvent]) -> String {
    let mut hour_counts = [0u64; 24];
    for event in events {
        hour_counts[event.timestamp.hour() as usize] += 1;
    }

    let mut peak = 0usize;
    for (hour, &count) in hour_counts.iter().enumerate() {
        if count > hour_counts[peak] {
            peak = hour;
        }
    }
    format!("{peak:02}:00-{:02}:00", peak + 1)
}

fn top_category(events: &[AccessEvent]) -> String {
    most_frequent(events.iter().map(|e| {
        e.site_category
            .as_deref()
            .unwrap_or("unknown")
            .to_string()
    }))
}

fn top_domain(events: &[AccessEvent]) -> String {
    most_frequent(
        events
            .iter()
            .map(|e| e.domain.as_deref().unwrap_or("unknown").to_string()),
    )
}

/// Highest-frequency value; ties break to the lexicographically smallest
/// key so repeated runs rank identically. "unknown" when there are none.
fn most_frequent(values: impl Iterator<Item = String>) -> String {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(value, _)| value)
        .unwrap_or_else(|| "unknown".to_string())
}

fn non_work_ratio(events: &[AccessEvent]) -> f64 {
    if events.is_empty() {
        return 0.0;
    }
    let non_work = events
        .iter()
        .filter(|e| {
            e.site_category
                .as_deref()
                .is_some_and(|c| NON_WORK_CATEGORIES.contains(&c))
        })
        .count();
    non_work as f64 / events.len() as f64
}

/// Additive 0-3 raw score, one point per condition, reported capped at
/// [`RiskLevel::High`].
fn risk_level(events: &[AccessEvent], non_work_ratio: f64) -> RiskLevel {
    let mut score = 0u8;
    let pv = events.len() as u64;

    // Off-hours activity: night window is 22:00-06:00.
    let night_count = events
        .iter()
        .filter(|e| {
            let hour = e.timestamp.hour();
            hour >= 22 || hour < 6
        })
        .count() as u64;
    if night_count as f64 > pv as f64 * NIGHT_FRACTION_THRESHOLD {
        score += 1;
    }

    if non_work_ratio > NON_WORK_RATIO_THRESHOLD {
        score += 1;
    }

    let total_bytes: u64 = events.iter().map(AccessEvent::bytes_or_zero).sum();
    if total_bytes / pv.max(1) > HIGH_VOLUME_BYTES {
        score += 1;
    }

    RiskLevel::from_score(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::{event, event_at, event_at_with};
    use chrono::TimeZone;

    fn engine() -> ProfileEngine {
        ProfileEngine::new()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_batch_yields_no_profile() {
        assert!(engine().compute_profile_at(&[], "Alice", now()).is_none());
    }

    #[test]
    fn test_non_work_ratio_at_half_is_not_risky() {
        // 4 events over 2 days, half entertainment half technical.
        let events = vec![
            event_at_with("u1", 2025, 3, 10, 9, Some("entertainment"), Some(1000)),
            event_at_with("u1", 2025, 3, 10, 10, Some("technical"), Some(1000)),
            event_at_with("u1", 2025, 3, 11, 9, Some("entertainment"), Some(1000)),
            event_at_with("u1", 2025, 3, 11, 10, Some("technical"), Some(1000)),
        ];
        let profile = engine()
            .compute_profile_at(&events, "Alice", now())
            .unwrap();

        assert_eq!(profile.active_days, 2);
        assert_eq!(profile.avg_daily_pv, 2);
        assert!((profile.non_work_ratio - 0.5).abs() < f64::EPSILON);
        // 0.5 does not exceed the strict threshold
        assert_eq!(profile.risk_level, RiskLevel::Low);
        assert_eq!(profile.total_bytes, 4000);
        assert_eq!(profile.avg_daily_bytes, 2000);
    }

    #[test]
    fn test_peak_slot_and_night_fraction() {
        // 4 events at 02:00 (night), 6 at 10:00.
        let mut events = Vec::new();
        for i in 0..4 {
            events.push(event_at("u1", 2025, 3, 10 + i, 2));
        }
        for i in 0..6 {
            events.push(event_at("u1", 2025, 3, 10 + (i % 4), 10));
        }
        let profile = engine()
            .compute_profile_at(&events, "Alice", now())
            .unwrap();

        assert_eq!(profile.peak_time_slot, "10:00-11:00");
        // night fraction 0.4 > 0.3 contributes one point
        assert_eq!(profile.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_high_volume_and_night_cap_at_high() {
        // Mean 11 MiB per event, both at night.
        let events = vec![
            event_at_with("u1", 2025, 3, 10, 23, None, Some(11 * 1024 * 1024)),
            event_at_with("u1", 2025, 3, 11, 23, None, Some(11 * 1024 * 1024)),
        ];
        let profile = engine()
            .compute_profile_at(&events, "Alice", now())
            .unwrap();

        assert_eq!(profile.risk_level, RiskLevel::High);
        assert_eq!(profile.risk_level.as_u8(), 2);
    }

    #[test]
    fn test_peak_slot_tie_breaks_to_lowest_hour() {
        let events = vec![
            event_at("u1", 2025, 3, 10, 14),
            event_at("u1", 2025, 3, 10, 9),
        ];
        let profile = engine()
            .compute_profile_at(&events, "Alice", now())
            .unwrap();

        assert_eq!(profile.peak_time_slot, "09:00-10:00");
    }

    #[test]
    fn test_top_category_defaults_unknown() {
        let events = vec![event_at("u1", 2025, 3, 10, 9)];
        let profile = engine()
            .compute_profile_at(&events, "Alice", now())
            .unwrap();

        assert_eq!(profile.top_category, "unknown");
        assert_eq!(profile.top_domain, "github.com");
    }

    #[test]
    fn test_profile_takes_identity_from_first_event() {
        let events = vec![event("u7", "Finance", Some("office"), Some(10))];
        let profile = engine()
            .compute_profile_at(&events, "Grace", now())
            .unwrap();

        assert_eq!(profile.user_id, "u7");
        assert_eq!(profile.display_name, "Grace");
        assert_eq!(profile.department, "Finance");
    }

    #[test]
    fn test_compute_profile_at_is_deterministic() {
        let events = vec![
            event_at_with("u1", 2025, 3, 10, 9, Some("social"), Some(5000)),
            event_at_with("u1", 2025, 3, 12, 23, Some("technical"), None),
        ];
        let a = engine().compute_profile_at(&events, "Alice", now());
        let b = engine().compute_profile_at(&events, "Alice", now());

        assert_eq!(a, b);
    }

    #[test]
    fn test_batch_profiles_default_name_and_skip_empty() {
        let mut by_user = HashMap::new();
        by_user.insert(
            "u1".to_string(),
            vec![event("u1", "Engineering", None, None)],
        );
        by_user.insert("u2".to_string(), Vec::new());

        let mut names = HashMap::new();
        names.insert("u1".to_string(), "Alice".to_string());

        let profiles = engine().compute_batch_profiles(&by_user, &names);
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles["u1"].display_name, "Alice");

        // missing directory entry falls back to the default label
        let mut unnamed = HashMap::new();
        unnamed.insert(
            "u3".to_string(),
            vec![event("u3", "Engineering", None, None)],
        );
        let profiles = engine().compute_batch_profiles(&unnamed, &names);
        assert_eq!(profiles["u3"].display_name, "unknown user");
    }
}
