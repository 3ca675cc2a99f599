//! Error type definitions.
//!
//! This module defines all error and failure types used throughout the application.

use hickory_resolver::error::ResolveError;
use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error reading the local resolver configuration.
    #[error("DNS resolver initialization error: {0}")]
    DnsResolverError(String),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// A stored value cannot be represented in the model (e.g. negative latency).
    #[error("Corrupt row in {table}: {detail}")]
    CorruptRow { table: &'static str, detail: String },
}

/// Error types for nameserver discovery.
///
/// Configuration failures (`Configuration`, `InvalidDomain`) abort the affected
/// domain's cycle and are reported as actionable. `Lookup` failures are
/// transient: the domain is simply retried on the next cycle.
#[derive(Error, Debug)]
pub enum ResolverError {
    /// No usable local resolver configuration.
    #[error("resolver configuration unavailable: {0}")]
    Configuration(String),

    /// The domain name cannot be turned into a DNS name.
    #[error("invalid domain name {domain:?}: {reason}")]
    InvalidDomain { domain: String, reason: String },

    /// The NS lookup itself failed (timeout, network error, SERVFAIL...).
    #[error("NS lookup for {domain} failed: {source}")]
    Lookup {
        domain: String,
        #[source]
        source: ResolveError,
    },
}

impl ResolverError {
    /// Whether this failure stems from configuration rather than the network.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ResolverError::Configuration(_) | ResolverError::InvalidDomain { .. }
        )
    }

    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ResolverError::Configuration(_) => FailureKind::ResolverConfiguration,
            ResolverError::InvalidDomain { .. } => FailureKind::InvalidDomain,
            ResolverError::Lookup { .. } => FailureKind::NsLookup,
        }
    }
}

/// Categories of failures counted during a monitoring run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum FailureKind {
    // Configuration
    ResolverConfiguration,
    InvalidDomain,
    // Transient
    NsLookup,
    NoNameservers,
    ProbeTimeout,
    ProbeUnreachable,
    ProbeMalformed,
    // Storage
    StorageWrite,
    StatsRefresh,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::ResolverConfiguration => "Resolver configuration error",
            FailureKind::InvalidDomain => "Invalid domain name",
            FailureKind::NsLookup => "NS lookup error",
            FailureKind::NoNameservers => "No usable nameservers",
            FailureKind::ProbeTimeout => "Probe timeout",
            FailureKind::ProbeUnreachable => "Nameserver unreachable",
            FailureKind::ProbeMalformed => "Query could not be encoded",
            FailureKind::StorageWrite => "Database write error",
            FailureKind::StatsRefresh => "Statistics refresh error",
        }
    }

    /// Actionable failures need operator attention; the rest are network noise.
    pub fn is_actionable(&self) -> bool {
        matches!(
            self,
            FailureKind::ResolverConfiguration
                | FailureKind::InvalidDomain
                | FailureKind::StorageWrite
                | FailureKind::StatsRefresh
        )
    }
}
