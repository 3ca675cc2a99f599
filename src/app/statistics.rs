//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{FailureKind, ProbeStats};
use crate::storage::DomainStats;

/// Renders the per-domain statistics table printed when a run ends.
pub fn format_domain_stats(stats: &[DomainStats]) -> String {
    let width = stats
        .iter()
        .map(|s| s.domain.len())
        .max()
        .unwrap_or(0)
        .max("domain".len());

    let mut out = format!(
        "{:<width$}  {:>7}  {:>12}  {:>12}  {:<20}  {:<20}\n",
        "domain", "queries", "mean (ms)", "stddev (ms)", "first", "last"
    );
    for s in stats {
        out.push_str(&format!(
            "{:<width$}  {:>7}  {:>12.3}  {:>12.3}  {:<20}  {:<20}\n",
            s.domain,
            s.count,
            s.mean_latency_micros / 1000.0,
            s.stddev_latency_micros / 1000.0,
            s.first_observed_at.format("%Y-%m-%d %H:%M:%S"),
            s.last_observed_at.format("%Y-%m-%d %H:%M:%S"),
        ));
    }
    out
}

/// Prints the per-domain statistics table to stdout.
pub fn print_domain_stats(stats: &[DomainStats]) {
    if stats.is_empty() {
        println!("No latency statistics recorded yet");
        return;
    }
    print!("{}", format_domain_stats(stats));
}

/// Logs answered probes and failure counts by kind.
pub fn print_probe_statistics(probe_stats: &ProbeStats) {
    info!("Answered probes: {}", probe_stats.answered_count());

    let total_failures = probe_stats.total_failures();
    if total_failures > 0 {
        info!("Failure Counts ({} total):", total_failures);
        for kind in FailureKind::iter() {
            let count = probe_stats.failure_count(kind);
            if count > 0 {
                info!("   {}: {}", kind.as_str(), count);
            }
        }
    }
}
