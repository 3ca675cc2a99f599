//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{DB_PATH, DEFAULT_INTERVAL_SECS, DNS_PORT, PROBE_TIMEOUT_SECS};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Monitor configuration.
///
/// Built once at startup (from the command line or programmatically) and never
/// mutated during a run.
///
/// # Examples
///
/// ```no_run
/// use dns_latency::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     db_path: PathBuf::from("latency.db"),
///     interval_secs: 30,
///     max_cycles: Some(10),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dns_latency",
    version,
    about = "Tracks DNS query latency against the authoritative nameservers of a set of domains"
)]
pub struct Config {
    /// SQLite database holding domains, query log and statistics
    #[arg(long, value_name = "PATH", default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Seconds to wait between two passes over all domains
    #[arg(
        short,
        long = "interval",
        value_name = "SECONDS",
        default_value_t = DEFAULT_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_secs: u64,

    /// Per-probe timeout in seconds
    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        default_value_t = PROBE_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub probe_timeout_secs: u64,

    /// UDP port probed on each authoritative nameserver
    #[arg(long, default_value_t = DNS_PORT)]
    pub dns_port: u16,

    /// Stop after this many passes (runs until interrupted when omitted)
    #[arg(long, value_name = "N")]
    pub max_cycles: Option<u64>,

    /// Drop all recorded data and seed the default domain list
    #[arg(short = 'r', long)]
    pub reset_db: bool,

    /// Additional domain to monitor (may be repeated)
    #[arg(long = "domain", value_name = "DOMAIN")]
    pub domains: Vec<String>,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DB_PATH),
            interval_secs: DEFAULT_INTERVAL_SECS,
            probe_timeout_secs: PROBE_TIMEOUT_SECS,
            dns_port: DNS_PORT,
            max_cycles: None,
            reset_db: false,
            domains: Vec::new(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}
