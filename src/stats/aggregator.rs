//! Recomputes a domain's statistics row from its query log.

use log::debug;
use sqlx::SqlitePool;

use super::RunningStats;
use crate::error_handling::DatabaseError;
use crate::storage::{fetch_query_records, replace_domain_stats, DomainStats, QueryRecord};

/// Folds `records` into a statistics row for `domain`.
///
/// Returns `None` when there are no records.
pub fn summarize(domain: &str, records: &[QueryRecord]) -> Option<DomainStats> {
    let mut running = RunningStats::new();
    running.extend(records);
    running.to_domain_stats(domain)
}

/// Recomputes and stores the statistics of `domain` from its full history.
///
/// A domain with no recorded queries keeps its "no data" state: nothing is
/// written and `Ok(None)` is returned. Calling this twice without new records
/// stores (and returns) identical statistics.
pub async fn refresh_domain_stats(
    pool: &SqlitePool,
    domain: &str,
) -> Result<Option<DomainStats>, DatabaseError> {
    let records = fetch_query_records(pool, domain).await?;
    let Some(stats) = summarize(domain, &records) else {
        debug!("No recorded queries for {domain}, leaving statistics untouched");
        return Ok(None);
    };

    replace_domain_stats(pool, &stats).await?;
    debug!(
        "Statistics for {domain}: n={} mean={:.1}us stddev={:.1}us",
        stats.count, stats.mean_latency_micros, stats.stddev_latency_micros
    );
    Ok(Some(stats))
}
