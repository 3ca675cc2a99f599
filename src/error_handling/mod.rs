//! Error handling and probe statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, resolver, database)
//! - Failure categorization for probes and storage writes
//! - Run-wide probe statistics tracking
//!
//! Failures are categorized into:
//! - **Configuration**: the domain cannot be probed until configuration changes
//! - **Transient**: network conditions; the domain is retried next cycle
//! - **Storage**: database reads or writes failed; surfaced, never dropped

mod stats;
mod types;

// Re-export public API
pub use stats::ProbeStats;
pub use types::{DatabaseError, FailureKind, InitializationError, ResolverError};
