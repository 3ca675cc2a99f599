// storage/models.rs
// Database models and types

use chrono::{DateTime, Utc};

/// A domain under measurement.
///
/// Loaded once per run from the `domains` table; `rank` only orders the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoredDomain {
    pub rank: i64,
    pub name: String,
}

/// One successful probe, as stored in the append-only `dns_queries` table.
///
/// `observed_at` is kept at millisecond precision, matching the
/// `observed_at_ms` column, so a record reads back exactly as it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord {
    pub domain: String,
    /// Nameserver hostname (not its address)
    pub nameserver: String,
    pub latency_micros: u64,
    pub observed_at: DateTime<Utc>,
}

impl QueryRecord {
    /// Creates a record stamped with the current time (truncated to milliseconds).
    pub fn observed_now(domain: &str, nameserver: &str, latency_micros: u64) -> Self {
        QueryRecord {
            domain: domain.to_string(),
            nameserver: nameserver.to_string(),
            latency_micros,
            observed_at: now_millis(),
        }
    }
}

/// Aggregated statistics for one domain, derived from its full query history.
///
/// Maps to the `domain_stats` table. A row only exists once the domain has at
/// least one recorded query.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainStats {
    pub domain: String,
    pub count: u64,
    pub mean_latency_micros: f64,
    /// Sample standard deviation (divisor `count - 1`); `0.0` when `count <= 1`
    pub stddev_latency_micros: f64,
    pub first_observed_at: DateTime<Utc>,
    pub last_observed_at: DateTime<Utc>,
}

/// Current UTC time truncated to the millisecond precision used in storage.
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
