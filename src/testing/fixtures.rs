//! Event builders and proptest strategies for engine tests

use std::ops::Range;

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use crate::models::AccessEvent;

/// Event with a fixed timestamp (2025-03-10 09:00 UTC) and the given
/// identity, category, and byte count.
pub fn event(
    user: &str,
    department: &str,
    category: Option<&str>,
    bytes: Option<u64>,
) -> AccessEvent {
    AccessEvent {
        timestamp: Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap(),
        user_id: user.to_string(),
        department: department.to_string(),
        src_ip: "10.1.2.3".to_string(),
        dst_ip: "10.4.5.6".to_string(),
        domain: Some("github.com".to_string()),
        url: "https://github.com/home".to_string(),
        method: "GET".to_string(),
        bytes,
        user_agent: "test-agent".to_string(),
        site_category: category.map(str::to_string),
    }
}

/// Event at a specific date and hour, no category, no bytes.
pub fn event_at(user: &str, year: i32, month: u32, day: u32, hour: u32) -> AccessEvent {
    event_at_with(user, year, month, day, hour, None, None)
}

/// Event at a specific date and hour with category and byte count.
pub fn event_at_with(
    user: &str,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    category: Option<&str>,
    bytes: Option<u64>,
) -> AccessEvent {
    let mut e = event(user, "Engineering", category, bytes);
    e.timestamp = Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap();
    e
}

const USERS: [&str; 6] = ["u1", "u2", "u3", "u4", "u5", "u6"];
const DEPARTMENTS: [&str; 4] = ["Engineering", "Sales", "Finance", "Marketing"];
const CATEGORIES: [&str; 7] = [
    "technical",
    "office",
    "social",
    "entertainment",
    "shopping",
    "news",
    "gaming",
];
const DOMAINS: [&str; 4] = ["github.com", "docs.example.com", "youtube.com", "news.example.com"];

/// Strategy producing one event drawn from small identity pools so that
/// generated batches exercise repeated users, departments, and domains.
pub fn arb_event() -> impl Strategy<Value = AccessEvent> {
    (
        0..USERS.len(),
        0..DEPARTMENTS.len(),
        proptest::option::of(0..CATEGORIES.len()),
        proptest::option::of(0..DOMAINS.len()),
        proptest::option::of(0u64..20_000_000),
        0i64..28,
        0u32..24,
    )
        .prop_map(|(user, dept, category, domain, bytes, day, hour)| {
            let base = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
            AccessEvent {
                timestamp: base + Duration::days(day) + Duration::hours(i64::from(hour)),
                user_id: USERS[user].to_string(),
                department: DEPARTMENTS[dept].to_string(),
                src_ip: "10.1.2.3".to_string(),
                dst_ip: "10.4.5.6".to_string(),
                domain: domain.map(|d| DOMAINS[d].to_string()),
                url: "https://example.com/".to_string(),
                method: "GET".to_string(),
                bytes,
                user_agent: "test-agent".to_string(),
                site_category: category.map(|c| CATEGORIES[c].to_string()),
            }
        })
}

/// Strategy producing a batch of events with length in `len`.
pub fn arb_events(len: Range<usize>) -> impl Strategy<Value = Vec<AccessEvent>> {
    proptest::collection::vec(arb_event(), len)
}
