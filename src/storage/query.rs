//! Database read operations.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;
use crate::storage::models::{DomainStats, MonitoredDomain, QueryRecord};

/// Returns every recorded query for `domain`, oldest first.
pub async fn fetch_query_records(
    pool: &SqlitePool,
    domain: &str,
) -> Result<Vec<QueryRecord>, DatabaseError> {
    let rows = sqlx::query(
        "SELECT domain, nameserver, latency_us, observed_at_ms
         FROM dns_queries
         WHERE domain = ?
         ORDER BY observed_at_ms, id",
    )
    .bind(domain)
    .fetch_all(pool)
    .await?;

    rows.iter().map(query_record_from_row).collect()
}

/// Returns the monitored domains in rank order.
pub async fn fetch_monitored_domains(
    pool: &SqlitePool,
) -> Result<Vec<MonitoredDomain>, DatabaseError> {
    let rows = sqlx::query("SELECT rank, domain FROM domains ORDER BY rank, domain")
        .fetch_all(pool)
        .await?;

    rows.iter()
        .map(|row| -> Result<MonitoredDomain, DatabaseError> {
            Ok(MonitoredDomain {
                rank: row.try_get("rank")?,
                name: row.try_get("domain")?,
            })
        })
        .collect()
}

/// Returns the statistics row for `domain`, or `None` if nothing was recorded yet.
pub async fn fetch_domain_stats(
    pool: &SqlitePool,
    domain: &str,
) -> Result<Option<DomainStats>, DatabaseError> {
    let row = sqlx::query(
        "SELECT domain, query_count, mean_latency_us, stddev_latency_us,
                first_observed_at_ms, last_observed_at_ms
         FROM domain_stats
         WHERE domain = ?",
    )
    .bind(domain)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(domain_stats_from_row).transpose()
}

/// Returns all statistics rows, ordered like the monitored domain list.
///
/// Rows for domains no longer in `domains` are listed last.
pub async fn fetch_all_domain_stats(pool: &SqlitePool) -> Result<Vec<DomainStats>, DatabaseError> {
    let rows = sqlx::query(
        "SELECT s.domain, s.query_count, s.mean_latency_us, s.stddev_latency_us,
                s.first_observed_at_ms, s.last_observed_at_ms
         FROM domain_stats s
         LEFT JOIN domains d ON d.domain = s.domain
         ORDER BY d.rank IS NULL, d.rank, s.domain",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(domain_stats_from_row).collect()
}

fn query_record_from_row(row: &SqliteRow) -> Result<QueryRecord, DatabaseError> {
    let latency: i64 = row.try_get("latency_us")?;
    let latency_micros = u64::try_from(latency).map_err(|_| DatabaseError::CorruptRow {
        table: "dns_queries",
        detail: format!("negative latency {latency}"),
    })?;

    Ok(QueryRecord {
        domain: row.try_get("domain")?,
        nameserver: row.try_get("nameserver")?,
        latency_micros,
        observed_at: timestamp_from_millis("dns_queries", row.try_get("observed_at_ms")?)?,
    })
}

fn domain_stats_from_row(row: &SqliteRow) -> Result<DomainStats, DatabaseError> {
    let count: i64 = row.try_get("query_count")?;
    let count = u64::try_from(count).map_err(|_| DatabaseError::CorruptRow {
        table: "domain_stats",
        detail: format!("negative query count {count}"),
    })?;

    Ok(DomainStats {
        domain: row.try_get("domain")?,
        count,
        mean_latency_micros: row.try_get("mean_latency_us")?,
        stddev_latency_micros: row.try_get("stddev_latency_us")?,
        first_observed_at: timestamp_from_millis(
            "domain_stats",
            row.try_get("first_observed_at_ms")?,
        )?,
        last_observed_at: timestamp_from_millis(
            "domain_stats",
            row.try_get("last_observed_at_ms")?,
        )?,
    })
}

fn timestamp_from_millis(table: &'static str, millis: i64) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| DatabaseError::CorruptRow {
        table,
        detail: format!("timestamp {millis}ms out of range"),
    })
}
