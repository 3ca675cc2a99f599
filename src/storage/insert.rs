//! Database write operations.
//!
//! The query log is append-only: records are inserted, never updated. Domain
//! statistics are replaced as a whole in a single statement so a reader never
//! observes a half-updated row.

use log::error;
use sqlx::SqlitePool;

use crate::error_handling::DatabaseError;
use crate::storage::models::{DomainStats, MonitoredDomain, QueryRecord};

/// Appends one successful probe to the `dns_queries` table.
pub async fn insert_query_record(
    pool: &SqlitePool,
    record: &QueryRecord,
) -> Result<(), DatabaseError> {
    let latency = i64::try_from(record.latency_micros).map_err(|_| DatabaseError::CorruptRow {
        table: "dns_queries",
        detail: format!("latency {}us does not fit in INTEGER", record.latency_micros),
    })?;

    sqlx::query(
        "INSERT INTO dns_queries (domain, nameserver, latency_us, observed_at_ms)
         VALUES (?, ?, ?, ?)",
    )
    .bind(&record.domain)
    .bind(&record.nameserver)
    .bind(latency)
    .bind(record.observed_at.timestamp_millis())
    .execute(pool)
    .await
    .map_err(|e| {
        error!(
            "Failed to insert query record for {} via {}: {e}",
            record.domain, record.nameserver
        );
        DatabaseError::SqlError(e)
    })?;

    Ok(())
}

/// Replaces the statistics row of `stats.domain` with `stats`.
pub async fn replace_domain_stats(
    pool: &SqlitePool,
    stats: &DomainStats,
) -> Result<(), DatabaseError> {
    let count = i64::try_from(stats.count).map_err(|_| DatabaseError::CorruptRow {
        table: "domain_stats",
        detail: format!("query count {} does not fit in INTEGER", stats.count),
    })?;

    sqlx::query(
        "INSERT INTO domain_stats (
            domain, query_count, mean_latency_us, stddev_latency_us,
            first_observed_at_ms, last_observed_at_ms
        ) VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(domain) DO UPDATE SET
            query_count = excluded.query_count,
            mean_latency_us = excluded.mean_latency_us,
            stddev_latency_us = excluded.stddev_latency_us,
            first_observed_at_ms = excluded.first_observed_at_ms,
            last_observed_at_ms = excluded.last_observed_at_ms",
    )
    .bind(&stats.domain)
    .bind(count)
    .bind(stats.mean_latency_micros)
    .bind(stats.stddev_latency_micros)
    .bind(stats.first_observed_at.timestamp_millis())
    .bind(stats.last_observed_at.timestamp_millis())
    .execute(pool)
    .await
    .map_err(|e| {
        error!("Failed to replace statistics for {}: {e}", stats.domain);
        DatabaseError::SqlError(e)
    })?;

    Ok(())
}

/// Adds `name` to the monitored domains, ranked after every existing domain.
///
/// Domains already present keep their rank. Returns the stored entry.
pub async fn add_monitored_domain(
    pool: &SqlitePool,
    name: &str,
) -> Result<MonitoredDomain, DatabaseError> {
    sqlx::query(
        "INSERT INTO domains (rank, domain)
         VALUES ((SELECT COALESCE(MAX(rank), 0) + 1 FROM domains), ?)
         ON CONFLICT(domain) DO NOTHING",
    )
    .bind(name)
    .execute(pool)
    .await?;

    let rank: i64 = sqlx::query_scalar("SELECT rank FROM domains WHERE domain = ?")
        .bind(name)
        .fetch_one(pool)
        .await?;

    Ok(MonitoredDomain {
        rank,
        name: name.to_string(),
    })
}
