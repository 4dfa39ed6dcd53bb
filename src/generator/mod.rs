//! Synthetic access log generation
//!
//! Produces realistic-looking event batches for demos and tests. The
//! engines never call into this module, and every function here takes an
//! explicit `&mut impl Rng` so no global random state leaks anywhere.

use chrono::Duration;
use rand::Rng;

use crate::models::{AccessEvent, TimeRange};

const DEPARTMENTS: [&str; 8] = [
    "Engineering",
    "Product",
    "Marketing",
    "Sales",
    "HR",
    "Finance",
    "Operations",
    "QA",
];

/// Site categories with representative domains.
const SITES: [(&str, [&str; 5]); 7] = [
    (
        "technical",
        [
            "github.com",
            "stackoverflow.com",
            "docs.rs",
            "crates.io",
            "news.ycombinator.com",
        ],
    ),
    (
        "office",
        [
            "docs.google.com",
            "slack.com",
            "zoom.us",
            "notion.so",
            "office.com",
        ],
    ),
    (
        "social",
        [
            "twitter.com",
            "facebook.com",
            "linkedin.com",
            "reddit.com",
            "instagram.com",
        ],
    ),
    (
        "entertainment",
        [
            "youtube.com",
            "netflix.com",
            "twitch.tv",
            "spotify.com",
            "hulu.com",
        ],
    ),
    (
        "shopping",
        [
            "amazon.com",
            "ebay.com",
            "etsy.com",
            "walmart.com",
            "aliexpress.com",
        ],
    ),
    (
        "news",
        [
            "nytimes.com",
            "bbc.com",
            "reuters.com",
            "theguardian.com",
            "apnews.com",
        ],
    ),
    (
        "gaming",
        [
            "steampowered.com",
            "epicgames.com",
            "itch.io",
            "roblox.com",
            "battle.net",
        ],
    ),
];

const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0.0.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 Chrome/120.0.0.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/120.0.0.0",
];

const METHODS: [&str; 4] = ["GET", "POST", "PUT", "DELETE"];

const PATHS: [&str; 8] = [
    "api/v1/data",
    "home",
    "detail/123",
    "search?q=test",
    "user/profile",
    "images/2024/12/file.jpg",
    "docs/guide",
    "post/45678",
];

const FIRST_NAMES: [&str; 10] = [
    "Alice", "Bob", "Carol", "David", "Erin", "Frank", "Grace", "Henry", "Iris", "Jack",
];

const LAST_NAMES: [&str; 10] = [
    "Anderson", "Brooks", "Chen", "Diaz", "Evans", "Foster", "Garcia", "Huang", "Ivanov", "Jones",
];

/// Directory entry pairing a generated user with a display name.
#[derive(Debug, Clone)]
pub struct Employee {
    pub user_id: String,
    pub name: String,
    pub department: String,
}

/// Generate a user id of the form `E<dept code><4 digits>`.
pub fn generate_user_id(department: &str, rng: &mut impl Rng) -> String {
    let dept_code = department.bytes().map(u32::from).sum::<u32>() % 1000;
    let user_num: u32 = rng.random_range(1000..10000);
    format!("E{dept_code:03}{user_num:04}")
}

/// Generate an internal-looking IPv4 address.
pub fn generate_ip(rng: &mut impl Rng) -> String {
    format!(
        "{}.{}.{}.{}",
        rng.random_range(10u16..30),
        rng.random_range(0u16..256),
        rng.random_range(0u16..256),
        rng.random_range(0u16..256)
    )
}

/// Byte count distribution: 80% under 1 MB, 15% 1-10 MB, 5% over 10 MB.
pub fn generate_bytes(rng: &mut impl Rng) -> u64 {
    let r = rng.random::<f64>();
    if r < 0.8 {
        rng.random_range(1_000..1_000_000)
    } else if r < 0.95 {
        rng.random_range(1_024_000..10_024_000)
    } else {
        rng.random_range(10_485_760..60_485_760)
    }
}

/// Generate an employee roster with distinct display names per entry.
pub fn generate_employees(count: usize, rng: &mut impl Rng) -> Vec<Employee> {
    (0..count)
        .map(|i| {
            let department = DEPARTMENTS[rng.random_range(0..DEPARTMENTS.len())];
            Employee {
                user_id: generate_user_id(department, rng),
                name: format!(
                    "{} {}",
                    FIRST_NAMES[i % FIRST_NAMES.len()],
                    LAST_NAMES[(i / FIRST_NAMES.len()) % LAST_NAMES.len()]
                ),
                department: department.to_string(),
            }
        })
        .collect()
}

/// Generate one event for the given employee near `base_time` (within
/// an hour either side).
pub fn generate_event(
    employee: &Employee,
    base_time: chrono::DateTime<chrono::Utc>,
    rng: &mut impl Rng,
) -> AccessEvent {
    let (category, domains) = SITES[rng.random_range(0..SITES.len())];
    let domain = domains[rng.random_range(0..domains.len())];
    let offset: i64 = rng.random_range(-60..60);

    AccessEvent {
        timestamp: base_time + Duration::minutes(offset),
        user_id: employee.user_id.clone(),
        department: employee.department.clone(),
        src_ip: generate_ip(rng),
        dst_ip: generate_ip(rng),
        domain: Some(domain.to_string()),
        url: format!(
            "https://{domain}/{}",
            PATHS[rng.random_range(0..PATHS.len())]
        ),
        method: METHODS[rng.random_range(0..METHODS.len())].to_string(),
        bytes: Some(generate_bytes(rng)),
        user_agent: USER_AGENTS[rng.random_range(0..USER_AGENTS.len())].to_string(),
        site_category: Some(category.to_string()),
    }
}

/// Generate a batch of events spread over the range for a random mix of
/// the given employees, sorted by timestamp ascending.
pub fn generate_events(
    employees: &[Employee],
    range: &TimeRange,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<AccessEvent> {
    let total_minutes = (range.end - range.start).num_minutes().max(1);
    let mut events: Vec<AccessEvent> = (0..count)
        .map(|_| {
            let employee = &employees[rng.random_range(0..employees.len())];
            let at = range.start + Duration::minutes(rng.random_range(0..total_minutes));
            generate_event(employee, at, rng)
        })
        .collect();

    events.sort_by_key(|e| e.timestamp);
    events
}

/// Generate a batch for a single employee over the range, sorted by
/// timestamp ascending.
pub fn generate_events_for_user(
    employee: &Employee,
    range: &TimeRange,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<AccessEvent> {
    let total_minutes = (range.end - range.start).num_minutes().max(1);
    let mut events: Vec<AccessEvent> = (0..count)
        .map(|_| {
            let at = range.start + Duration::minutes(rng.random_range(0..total_minutes));
            generate_event(employee, at, rng)
        })
        .collect();

    events.sort_by_key(|e| e.timestamp);
    events
}
