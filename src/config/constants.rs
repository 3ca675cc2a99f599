//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including timeouts, network parameters, and the default domain list.

use std::time::Duration;

pub const DB_PATH: &str = "./dns_latency.db";

/// Seconds to sleep between two full passes over the domain list
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

// Network operation timeouts
/// Recursive resolver timeout in seconds (NS and address lookups)
pub const DNS_TIMEOUT_SECS: u64 = 3;
/// Attempts made by the recursive resolver before giving up
pub const DNS_ATTEMPTS: usize = 2;
/// Bounded wait for a single probe against an authoritative nameserver
pub const PROBE_TIMEOUT_SECS: u64 = 3;
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(PROBE_TIMEOUT_SECS);

/// Port probed on every authoritative nameserver
pub const DNS_PORT: u16 = 53;

/// Receive buffer for probe responses (EDNS-sized, larger than the classic 512 bytes)
pub const MAX_UDP_RESPONSE_SIZE: usize = 4096;

// Cache busting
/// Length of the random label prepended to each probed domain
/// 36^12 possible labels, so collisions within a run are negligible
pub const CACHE_BUST_LABEL_LEN: usize = 12;
/// Characters allowed in the random label (lowercase so 0x20 case randomization cannot interfere)
pub const CACHE_BUST_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Domains seeded by `--reset-db`, in rank order.
pub const DEFAULT_DOMAINS: &[&str] = &[
    "google.com",
    "facebook.com",
    "youtube.com",
    "yahoo.com",
    "live.com",
    "wikipedia.org",
    "baidu.com",
    "blogger.com",
    "msn.com",
    "qq.com",
];
