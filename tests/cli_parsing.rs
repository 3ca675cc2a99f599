//! Tests for command-line parsing of `Config`.

use clap::Parser;
use dns_latency::config::{LogFormat, LogLevel};
use dns_latency::Config;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_defaults() {
    let config = Config::try_parse_from(["dns_latency"]).unwrap();
    assert_eq!(config.db_path, PathBuf::from("./dns_latency.db"));
    assert_eq!(config.interval(), Duration::from_secs(60));
    assert_eq!(config.probe_timeout(), Duration::from_secs(3));
    assert_eq!(config.dns_port, 53);
    assert_eq!(config.max_cycles, None);
    assert!(!config.reset_db);
    assert!(config.domains.is_empty());
    assert!(matches!(config.log_level, LogLevel::Info));
    assert!(matches!(config.log_format, LogFormat::Plain));
}

#[test]
fn test_all_flags() {
    let config = Config::try_parse_from([
        "dns_latency",
        "--db-path",
        "/tmp/latency.db",
        "-i",
        "30",
        "--timeout",
        "2",
        "--dns-port",
        "5353",
        "--max-cycles",
        "4",
        "-r",
        "--domain",
        "example.com",
        "--domain",
        "example.org",
        "--log-level",
        "debug",
        "--log-format",
        "json",
    ])
    .unwrap();

    assert_eq!(config.db_path, PathBuf::from("/tmp/latency.db"));
    assert_eq!(config.interval_secs, 30);
    assert_eq!(config.probe_timeout_secs, 2);
    assert_eq!(config.dns_port, 5353);
    assert_eq!(config.max_cycles, Some(4));
    assert!(config.reset_db);
    assert_eq!(config.domains, vec!["example.com", "example.org"]);
    assert!(matches!(config.log_level, LogLevel::Debug));
    assert!(matches!(config.log_format, LogFormat::Json));
}

#[test]
fn test_zero_timeout_rejected() {
    assert!(Config::try_parse_from(["dns_latency", "--timeout", "0"]).is_err());
}

#[test]
fn test_unknown_log_format_rejected() {
    assert!(Config::try_parse_from(["dns_latency", "--log-format", "xml"]).is_err());
}
