//! Probe scheduling.
//!
//! The scheduler walks the monitored domains one at a time:
//!
//! ```text
//! Idle -> ProbingDomain(d) -> ProbingNameserver(d, ns)* -> Aggregating(d) -> Idle
//!      ... after the last domain ... -> Sleeping(interval) -> Idle
//! ```
//!
//! Exactly one probe is in flight at any time. All probes of a domain finish
//! (or are abandoned) before its statistics are recomputed. A failure for one
//! nameserver or one domain never stops the loop; only cancellation or the
//! optional cycle limit does.

mod report;

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::dns::{cache_busted_name, LatencyProbe, NameserverSource, ProbeOutcome};
use crate::error_handling::{FailureKind, ProbeStats};
use crate::stats::refresh_domain_stats;
use crate::storage::{insert_query_record, MonitoredDomain, QueryRecord};

pub use report::{CycleReport, DomainOutcome, RunSummary};

/// Timing parameters of a run.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Pause between the end of one pass and the start of the next
    pub interval: Duration,
    /// Stop after this many passes; `None` runs until cancelled
    pub max_cycles: Option<u64>,
}

impl From<&Config> for SchedulerConfig {
    fn from(config: &Config) -> Self {
        SchedulerConfig {
            interval: config.interval(),
            max_cycles: config.max_cycles,
        }
    }
}

/// Where the scheduler currently is in its loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    ProbingDomain { domain: String },
    ProbingNameserver { domain: String, nameserver: String },
    Aggregating { domain: String },
    Sleeping(Duration),
    Stopped,
}

/// Drives discovery, probing, logging and aggregation for a fixed domain set.
pub struct ProbeScheduler<R, P> {
    resolver: R,
    probe: P,
    pool: Arc<SqlitePool>,
    domains: Arc<[MonitoredDomain]>,
    config: SchedulerConfig,
    stats: Arc<ProbeStats>,
    cancel: CancellationToken,
    state: SchedulerState,
    cycle: u64,
}

impl<R: NameserverSource, P: LatencyProbe> ProbeScheduler<R, P> {
    pub fn new(
        resolver: R,
        probe: P,
        pool: Arc<SqlitePool>,
        domains: Vec<MonitoredDomain>,
        config: SchedulerConfig,
    ) -> Self {
        ProbeScheduler {
            resolver,
            probe,
            pool,
            domains: domains.into(),
            config,
            stats: Arc::new(ProbeStats::new()),
            cancel: CancellationToken::new(),
            state: SchedulerState::Idle,
            cycle: 0,
        }
    }

    /// Uses `cancel` as the stop signal instead of a private token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run-wide answer and failure counters.
    pub fn stats(&self) -> Arc<ProbeStats> {
        Arc::clone(&self.stats)
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn domains(&self) -> &[MonitoredDomain] {
        &self.domains
    }

    fn transition(&mut self, next: SchedulerState) {
        debug!("Scheduler state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Runs cycles until cancelled or until `max_cycles` passes are done.
    pub async fn run(&mut self) -> RunSummary {
        info!(
            "Monitoring {} domains, pausing {}s between passes",
            self.domains.len(),
            self.config.interval.as_secs_f64()
        );

        let mut summary = RunSummary::default();
        loop {
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            let report = self.run_cycle().await;
            report.log_summary();
            summary.cycles += 1;
            summary.recorded += report.recorded();

            if report.was_cancelled() {
                summary.cancelled = true;
                break;
            }
            if self
                .config
                .max_cycles
                .is_some_and(|max| summary.cycles >= max)
            {
                break;
            }
            if !self.sleep().await {
                summary.cancelled = true;
                break;
            }
        }

        self.transition(SchedulerState::Stopped);
        if summary.cancelled {
            info!("Stopped after {} cycles", summary.cycles);
        }
        summary
    }

    /// One pass over every monitored domain, in rank order.
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.cycle += 1;
        let started = Instant::now();
        let domains = Arc::clone(&self.domains);
        let mut outcomes = Vec::with_capacity(domains.len());

        for domain in domains.iter() {
            let outcome = self.probe_domain(&domain.name).await;
            let cancelled = matches!(outcome, DomainOutcome::Cancelled { .. });
            outcomes.push((domain.name.clone(), outcome));
            self.transition(SchedulerState::Idle);
            if cancelled {
                break;
            }
        }

        CycleReport {
            cycle: self.cycle,
            outcomes,
            elapsed: started.elapsed(),
        }
    }

    /// Probes every nameserver of `domain` once, then refreshes its statistics.
    pub async fn probe_domain(&mut self, domain: &str) -> DomainOutcome {
        self.transition(SchedulerState::ProbingDomain {
            domain: domain.to_string(),
        });

        let discovered = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return DomainOutcome::Cancelled { recorded: 0 },
            result = self.resolver.discover(domain) => result,
        };

        let nameservers = match discovered {
            Ok(nameservers) if nameservers.is_empty() => {
                self.stats.increment_failure(FailureKind::NoNameservers);
                info!("{domain}: no usable nameservers, skipping this cycle");
                return DomainOutcome::NoNameservers;
            }
            Ok(nameservers) => nameservers,
            Err(e) => {
                self.stats.increment_failure(e.failure_kind());
                if e.is_fatal() {
                    error!("{domain}: {e}");
                } else {
                    warn!("{domain}: {e}; retrying next cycle");
                }
                return DomainOutcome::ResolverFailed {
                    fatal: e.is_fatal(),
                    message: e.to_string(),
                };
            }
        };

        let mut attempted = 0;
        let mut recorded = 0;
        let mut write_failures = 0;
        let mut write_error = None;
        let mut cancelled = false;

        for nameserver in &nameservers {
            self.transition(SchedulerState::ProbingNameserver {
                domain: domain.to_string(),
                nameserver: nameserver.hostname.clone(),
            });
            attempted += 1;

            let query_name = cache_busted_name(domain);
            let outcome = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                outcome = self.probe.probe(&query_name, nameserver.address) => Some(outcome),
            };
            // A result that lands after the stop request is discarded
            let Some(outcome) = outcome.filter(|_| !self.cancel.is_cancelled()) else {
                cancelled = true;
                break;
            };

            match outcome {
                ProbeOutcome::Answered { latency_micros } => {
                    let record =
                        QueryRecord::observed_now(domain, &nameserver.hostname, latency_micros);
                    match insert_query_record(&self.pool, &record).await {
                        Ok(()) => {
                            recorded += 1;
                            self.stats.record_answer();
                            debug!(
                                "{domain} via {} ({}): {latency_micros}us",
                                nameserver.hostname, nameserver.address
                            );
                        }
                        Err(e) => {
                            self.stats.increment_failure(FailureKind::StorageWrite);
                            write_failures += 1;
                            write_error = Some(e.to_string());
                        }
                    }
                }
                ProbeOutcome::Failed(failure) => {
                    self.stats.increment_failure(failure.failure_kind());
                    debug!(
                        "{domain}: no answer from {} ({}): {failure:?}",
                        nameserver.hostname, nameserver.address
                    );
                }
            }
        }

        if recorded == 0 {
            return match (cancelled, write_error) {
                (true, _) => DomainOutcome::Cancelled { recorded: 0 },
                (false, Some(message)) => DomainOutcome::StorageFailed {
                    recorded: 0,
                    message,
                },
                (false, None) => DomainOutcome::NoAnswers { attempted },
            };
        }

        // Statistics are refreshed even on cancellation so they never lag the log
        self.transition(SchedulerState::Aggregating {
            domain: domain.to_string(),
        });
        let outcome = match refresh_domain_stats(&self.pool, domain).await {
            Ok(Some(stats)) => DomainOutcome::Aggregated {
                attempted,
                recorded,
                write_failures,
                stats,
            },
            Ok(None) => {
                self.stats.increment_failure(FailureKind::StatsRefresh);
                DomainOutcome::StorageFailed {
                    recorded,
                    message: "recorded queries are not visible in the query log".to_string(),
                }
            }
            Err(e) => {
                self.stats.increment_failure(FailureKind::StatsRefresh);
                error!("{domain}: failed to refresh statistics: {e}");
                DomainOutcome::StorageFailed {
                    recorded,
                    message: e.to_string(),
                }
            }
        };

        if cancelled {
            DomainOutcome::Cancelled { recorded }
        } else {
            outcome
        }
    }

    /// Sleeps for the configured interval. Returns `false` if cancelled meanwhile.
    async fn sleep(&mut self) -> bool {
        let interval = self.config.interval;
        self.transition(SchedulerState::Sleeping(interval));
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(interval) => true,
        }
    }
}
