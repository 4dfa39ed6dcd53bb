//! Console rendering for statistics and profiles
//!
//! Formatting only; all numbers come in precomputed. Renderers return
//! strings so the CLI decides where they go and tests can assert on them.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::error::Result;
use crate::profile::UserProfile;
use crate::stats::AggregateStats;

const BAR_WIDTH: u64 = 50;

/// Bytes rendered as megabytes with two decimals.
pub fn format_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

/// Overview block: headline counters plus department and category
/// breakdowns with percentages.
pub fn render_overview(stats: &AggregateStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("Total visits (PV):   {}\n", stats.pv));
    out.push_str(&format!("Unique users (UV):   {}\n", stats.uv));
    out.push_str(&format!("Total traffic:       {}\n", format_mb(stats.total_bytes)));
    out.push_str(&format!("Active users:        {}\n", stats.active_users));

    out.push_str("\nBy department:\n");
    for (dept, count) in sorted(&stats.department_counts) {
        out.push_str(&format!(
            "  {dept}: {count} visits ({:.1}%)\n",
            percent(count, stats.pv)
        ));
    }

    out.push_str("\nBy category:\n");
    for (category, count) in sorted(&stats.category_counts) {
        out.push_str(&format!(
            "  {category}: {count} visits ({:.1}%)\n",
            percent(count, stats.pv)
        ));
    }
    out
}

/// Ranked list with display names resolved from the directory mapping.
pub fn render_ranking(
    title: &str,
    entries: &[(String, u64)],
    names: &HashMap<String, String>,
) -> String {
    let mut out = format!("{title}:\n");
    for (rank, (key, count)) in entries.iter().enumerate() {
        match names.get(key) {
            Some(name) => {
                out.push_str(&format!("{}. {name} ({key}): {count} visits\n", rank + 1));
            }
            None => out.push_str(&format!("{}. {key}: {count} visits\n", rank + 1)),
        }
    }
    out
}

/// Hour-of-day bar chart scaled to the busiest hour.
pub fn render_hourly(trend: &BTreeMap<u32, u64>) -> String {
    let max = trend.values().copied().max().unwrap_or(0);
    let mut out = String::from("Hourly trend:\n");
    for (hour, count) in trend {
        let bar = if max == 0 {
            0
        } else {
            (count * BAR_WIDTH / max) as usize
        };
        out.push_str(&format!("{hour:02}:00 | {} {count}\n", "█".repeat(bar)));
    }
    out
}

/// Per-department summary blocks, department name order.
pub fn render_departments(by_department: &HashMap<String, AggregateStats>) -> String {
    let mut out = String::from("Department summary:\n");
    let mut departments: Vec<&String> = by_department.keys().collect();
    departments.sort();
    for dept in departments {
        let stats = &by_department[dept];
        out.push_str(&format!(
            "\n{dept}:\n  visits: {}\n  active users: {}\n  traffic: {}\n",
            stats.pv,
            stats.uv,
            format_mb(stats.total_bytes)
        ));
    }
    out
}

/// Sample of user profiles, user id order, at most `limit` entries.
pub fn render_profiles(profiles: &HashMap<String, UserProfile>, limit: usize) -> String {
    let mut out = format!("Profiles computed for {} users\n", profiles.len());
    let mut user_ids: Vec<&String> = profiles.keys().collect();
    user_ids.sort();

    for user_id in user_ids.into_iter().take(limit) {
        let p = &profiles[user_id];
        out.push_str(&format!(
            "\n{} ({}) - {}\n",
            p.display_name, p.user_id, p.department
        ));
        out.push_str(&format!("  active days:    {}\n", p.active_days));
        out.push_str(&format!("  daily visits:   {}\n", p.avg_daily_pv));
        out.push_str(&format!("  peak slot:      {}\n", p.peak_time_slot));
        out.push_str(&format!("  top category:   {}\n", p.top_category));
        out.push_str(&format!("  top domain:     {}\n", p.top_domain));
        out.push_str(&format!(
            "  non-work share: {:.1}%\n",
            p.non_work_ratio * 100.0
        ));
        out.push_str(&format!("  daily traffic:  {}\n", format_mb(p.avg_daily_bytes)));
        out.push_str(&format!("  risk level:     {}\n", p.risk_level.as_u8()));
    }
    out
}

/// Pretty-printed JSON for the machine-readable output modes.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn sorted(counts: &HashMap<String, u64>) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> = counts
        .iter()
        .map(|(k, v)| (k.clone(), *v))
        .collect();
    entries.sort();
    entries
}
