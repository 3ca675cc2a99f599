//! dns_latency library: authoritative DNS latency monitoring
//!
//! This library periodically sends cache-busting queries straight to every
//! authoritative nameserver of a set of domains, records each answered query
//! in a SQLite query log, and keeps per-domain latency statistics (count,
//! mean and sample standard deviation) derived from that log.
//!
//! # Example
//!
//! ```no_run
//! use dns_latency::{run_monitor, Config};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     max_cycles: Some(1),
//!     domains: vec!["example.com".to_string()],
//!     ..Default::default()
//! };
//!
//! let report = run_monitor(config, CancellationToken::new()).await?;
//! for stats in &report.domain_stats {
//!     println!("{}: {:.0}us over {} queries", stats.domain, stats.mean_latency_micros, stats.count);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod app;
pub mod config;
mod dns;
mod domain;
mod error_handling;
pub mod initialization;
mod scheduler;
mod stats;
mod storage;

// Re-export public API
pub use app::{cancel_on_ctrl_c, join_watcher, print_domain_stats};
pub use config::{Config, LogFormat, LogLevel};
pub use dns::{
    cache_busted_name, LatencyProbe, Nameserver, NameserverSource, ProbeFailure, ProbeOutcome,
    SystemNameserverResolver, UdpProbe,
};
pub use domain::normalize_domain;
pub use error_handling::{DatabaseError, FailureKind, ProbeStats, ResolverError};
pub use run::{run_monitor, MonitorReport};
pub use scheduler::{
    CycleReport, DomainOutcome, ProbeScheduler, RunSummary, SchedulerConfig, SchedulerState,
};
pub use stats::{refresh_domain_stats, summarize, RunningStats};
pub use storage::{
    add_monitored_domain, fetch_all_domain_stats, fetch_domain_stats, fetch_monitored_domains,
    fetch_query_records, init_db_pool_with_path, insert_query_record, replace_domain_stats,
    reset_database, run_migrations, seed_default_domains, DomainStats, MonitoredDomain,
    QueryRecord,
};

// Internal run module (wires storage, discovery, probing and the scheduler together)
mod run {
    use anyhow::{bail, Context, Result};
    use log::{info, warn};
    use std::path::PathBuf;
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    use crate::app::print_probe_statistics;
    use crate::config::Config;
    use crate::dns::{SystemNameserverResolver, UdpProbe};
    use crate::domain::normalize_domain;
    use crate::scheduler::{ProbeScheduler, SchedulerConfig};
    use crate::storage::{
        add_monitored_domain, fetch_all_domain_stats, fetch_monitored_domains,
        init_db_pool_with_path, reset_database, run_migrations, seed_default_domains,
        DomainStats,
    };

    /// Results of a monitoring run.
    #[derive(Debug, Clone)]
    pub struct MonitorReport {
        /// Number of passes over the domain list that were started
        pub cycles: u64,
        /// Query records written during this run
        pub recorded: usize,
        /// Whether the run ended because it was cancelled
        pub cancelled: bool,
        /// Statistics of every domain with recorded queries, in rank order
        pub domain_stats: Vec<DomainStats>,
        /// Path to the SQLite database
        pub db_path: PathBuf,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Runs the monitor until `cancel` fires or `config.max_cycles` passes are done.
    ///
    /// Opens (and migrates) the database, optionally resets it, registers the
    /// domains given in `config.domains`, then hands the monitored domain list
    /// to a [`ProbeScheduler`](crate::ProbeScheduler). A database without any
    /// monitored domain is seeded with the default list.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The database cannot be opened, migrated or reset
    /// - A domain given in `config.domains` is not a valid DNS name
    /// - The final statistics cannot be read
    ///
    /// Probe, resolver and per-domain storage failures never end the run.
    pub async fn run_monitor(config: Config, cancel: CancellationToken) -> Result<MonitorReport> {
        let start_time = std::time::Instant::now();

        let pool = init_db_pool_with_path(&config.db_path)
            .await
            .context("Failed to initialize database pool")?;
        run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        if config.reset_db {
            reset_database(&pool)
                .await
                .context("Failed to reset database")?;
        }

        for domain in &config.domains {
            let name = normalize_domain(domain)
                .with_context(|| format!("Invalid domain to monitor: {domain:?}"))?;
            let added = add_monitored_domain(&pool, &name)
                .await
                .with_context(|| format!("Failed to add domain {name}"))?;
            info!("Monitoring {} (rank {})", added.name, added.rank);
        }

        let mut domains = fetch_monitored_domains(&pool)
            .await
            .context("Failed to load monitored domains")?;
        if domains.is_empty() {
            info!("No monitored domains in {}", config.db_path.display());
            seed_default_domains(&pool)
                .await
                .context("Failed to seed default domains")?;
            domains = fetch_monitored_domains(&pool)
                .await
                .context("Failed to load monitored domains")?;
        }
        if domains.is_empty() {
            bail!("No domains to monitor");
        }

        let resolver = SystemNameserverResolver::new();
        let probe = UdpProbe::from_config(&config);
        let mut scheduler = ProbeScheduler::new(
            resolver,
            probe,
            Arc::clone(&pool),
            domains,
            SchedulerConfig::from(&config),
        )
        .with_cancellation(cancel);

        let summary = scheduler.run().await;

        if let Err(e) = sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(pool.as_ref())
            .await
        {
            warn!(
                "Failed to checkpoint WAL file (this is non-critical): {}",
                e
            );
        }

        print_probe_statistics(&scheduler.stats());

        let domain_stats = fetch_all_domain_stats(&pool)
            .await
            .context("Failed to load domain statistics")?;

        Ok(MonitorReport {
            cycles: summary.cycles,
            recorded: summary.recorded,
            cancelled: summary.cancelled,
            domain_stats,
            db_path: config.db_path.clone(),
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
        })
    }
}
