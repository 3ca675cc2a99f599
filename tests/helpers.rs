// Shared test helpers for database setup and scripted DNS behaviour.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::collections::{HashMap, VecDeque};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Mutex;

use sqlx::SqlitePool;

use dns_latency::{
    run_migrations, LatencyProbe, MonitoredDomain, Nameserver, NameserverSource, ProbeFailure,
    ProbeOutcome, ResolverError,
};

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Address in the TEST-NET-1 documentation range.
#[allow(dead_code)]
pub fn test_ip(last: u8) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(192, 0, 2, last))
}

#[allow(dead_code)]
pub fn nameserver(hostname: &str, last: u8) -> Nameserver {
    Nameserver {
        hostname: hostname.to_string(),
        address: test_ip(last),
    }
}

/// Domains ranked in the given order.
#[allow(dead_code)]
pub fn ranked(names: &[&str]) -> Vec<MonitoredDomain> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| MonitoredDomain {
            rank: i as i64 + 1,
            name: name.to_string(),
        })
        .collect()
}

/// Nameserver source answering from a fixed table.
///
/// Domains marked misconfigured fail the way a missing resolver configuration
/// does; unknown domains have no nameservers.
#[derive(Default)]
pub struct StaticNameservers {
    servers: HashMap<String, Vec<Nameserver>>,
    misconfigured: Vec<String>,
}

#[allow(dead_code)]
impl StaticNameservers {
    pub fn with(mut self, domain: &str, servers: Vec<Nameserver>) -> Self {
        self.servers.insert(domain.to_string(), servers);
        self
    }

    pub fn misconfigured(mut self, domain: &str) -> Self {
        self.misconfigured.push(domain.to_string());
        self
    }
}

impl NameserverSource for StaticNameservers {
    async fn discover(&self, domain: &str) -> Result<Vec<Nameserver>, ResolverError> {
        if self.misconfigured.iter().any(|d| d == domain) {
            return Err(ResolverError::Configuration(
                "no nameservers configured".to_string(),
            ));
        }
        Ok(self.servers.get(domain).cloned().unwrap_or_default())
    }
}

/// Probe replaying scripted outcomes per address; anything unscripted times out.
#[derive(Default)]
pub struct ScriptedProbe {
    script: Mutex<HashMap<IpAddr, VecDeque<ProbeOutcome>>>,
}

#[allow(dead_code)]
impl ScriptedProbe {
    pub fn answers(self, address: IpAddr, latencies: &[u64]) -> Self {
        {
            let mut script = self.script.lock().unwrap();
            let queue = script.entry(address).or_default();
            for &latency_micros in latencies {
                queue.push_back(ProbeOutcome::Answered { latency_micros });
            }
        }
        self
    }
}

impl LatencyProbe for ScriptedProbe {
    async fn probe(&self, _query_name: &str, address: IpAddr) -> ProbeOutcome {
        self.script
            .lock()
            .unwrap()
            .get_mut(&address)
            .and_then(|queue| queue.pop_front())
            .unwrap_or(ProbeOutcome::Failed(ProbeFailure::Timeout))
    }
}
