//! Shared test helpers for storage module tests.

#[cfg(test)]
use chrono::DateTime;
#[cfg(test)]
use sqlx::SqlitePool;

#[cfg(test)]
use crate::storage::models::QueryRecord;
#[cfg(test)]
use crate::storage::run_migrations;

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution.
#[cfg(test)]
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Builds a query record observed at `millis` since the Unix epoch.
#[cfg(test)]
pub fn record_at(domain: &str, nameserver: &str, latency_micros: u64, millis: i64) -> QueryRecord {
    QueryRecord {
        domain: domain.to_string(),
        nameserver: nameserver.to_string(),
        latency_micros,
        observed_at: DateTime::from_timestamp_millis(millis).expect("valid test timestamp"),
    }
}
