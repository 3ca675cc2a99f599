//! Per-cycle and per-run reports produced by the scheduler.

use std::time::Duration;

use log::{info, warn};

use crate::storage::DomainStats;

/// What happened to one domain during one cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainOutcome {
    /// At least one probe was recorded and the statistics were refreshed.
    /// `write_failures` answered probes could not be written to the log.
    Aggregated {
        attempted: usize,
        recorded: usize,
        write_failures: usize,
        stats: DomainStats,
    },
    /// Nameservers were probed but nothing was recorded.
    NoAnswers { attempted: usize },
    /// Discovery returned no usable nameserver.
    NoNameservers,
    /// Nameserver discovery failed; `fatal` marks configuration errors.
    ResolverFailed { fatal: bool, message: String },
    /// Probes were recorded but the statistics could not be refreshed,
    /// or every answered probe failed to be written.
    StorageFailed { recorded: usize, message: String },
    /// A stop was requested while this domain was in progress; `recorded`
    /// probes were written (and aggregated) before it.
    Cancelled { recorded: usize },
}

impl DomainOutcome {
    pub fn recorded(&self) -> usize {
        match self {
            DomainOutcome::Aggregated { recorded, .. }
            | DomainOutcome::StorageFailed { recorded, .. }
            | DomainOutcome::Cancelled { recorded } => *recorded,
            _ => 0,
        }
    }
}

/// Result of one pass over all monitored domains.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// 1-based cycle number
    pub cycle: u64,
    pub outcomes: Vec<(String, DomainOutcome)>,
    pub elapsed: Duration,
}

impl CycleReport {
    /// Outcome recorded for `domain` in this cycle.
    pub fn outcome(&self, domain: &str) -> Option<&DomainOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == domain)
            .map(|(_, outcome)| outcome)
    }

    pub fn recorded(&self) -> usize {
        self.outcomes.iter().map(|(_, o)| o.recorded()).sum()
    }

    pub fn aggregated_domains(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, DomainOutcome::Aggregated { .. }))
            .count()
    }

    pub fn was_cancelled(&self) -> bool {
        self.outcomes
            .iter()
            .any(|(_, o)| matches!(o, DomainOutcome::Cancelled { .. }))
    }

    /// Logs a one-line summary, plus one line per domain that needs attention.
    pub fn log_summary(&self) {
        info!(
            "Cycle {} finished in {:.2}s: {} queries recorded, {}/{} domains updated",
            self.cycle,
            self.elapsed.as_secs_f64(),
            self.recorded(),
            self.aggregated_domains(),
            self.outcomes.len()
        );
        for (domain, outcome) in &self.outcomes {
            match outcome {
                DomainOutcome::ResolverFailed { fatal: true, message } => {
                    warn!("  {domain}: not probed ({message})")
                }
                DomainOutcome::StorageFailed { message, .. } => {
                    warn!("  {domain}: statistics not updated ({message})")
                }
                DomainOutcome::Aggregated { write_failures, .. } if *write_failures > 0 => {
                    warn!("  {domain}: {write_failures} answered queries were not recorded")
                }
                _ => {}
            }
        }
    }
}

/// Result of a whole scheduler run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub cycles: u64,
    pub recorded: usize,
    pub cancelled: bool,
}
