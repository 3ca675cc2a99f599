//! Logger initialization.
//!
//! The monitor runs for days, so every line carries a timestamp. Two formats
//! are supported: colored plain text for terminals and one JSON object per
//! line for log shippers.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::LevelFilter;

/// Initializes the logger with the specified level and format.
///
/// `RUST_LOG` is read first and the `level` argument then overrides the
/// global and crate filters, so `--log-level` always wins while per-module
/// directives for dependencies still apply.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Debug output for one pass
/// RUST_LOG=debug dns_latency --max-cycles 1
///
/// # Per-module filtering via RUST_LOG
/// RUST_LOG=hickory_resolver=debug dns_latency --log-level info
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    // sqlx logs every statement at info; one per probe is too noisy
    builder.filter_module("sqlx", LevelFilter::Warn);
    // Truncated or malformed upstream responses are retried by hickory itself
    builder.filter_module("hickory_proto", LevelFilter::Error);
    builder.filter_module("hickory_resolver", LevelFilter::Warn);
    builder.filter_module("dns_latency", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{}",
                    json_line(
                        chrono::Utc::now().timestamp_millis(),
                        record.level(),
                        record.target(),
                        &record.args().to_string(),
                    )
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let level = record.level();
                let colored_level = match level {
                    log::Level::Error => level.to_string().red(),
                    log::Level::Warn => level.to_string().yellow(),
                    log::Level::Info => level.to_string().green(),
                    log::Level::Debug => level.to_string().blue(),
                    log::Level::Trace => level.to_string().purple(),
                };

                writeln!(
                    buf,
                    "{} {} [{}] {}",
                    chrono::Local::now()
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string()
                        .dimmed(),
                    record.target().cyan(),
                    colored_level,
                    record.args()
                )
            });
        }
    }

    // try_init: tests may install a logger more than once per process
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

/// Renders one JSON log line.
fn json_line(ts_millis: i64, level: log::Level, target: &str, msg: &str) -> String {
    serde_json::json!({
        "ts": ts_millis,
        "level": level.as_str(),
        "target": target,
        "msg": msg,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_line_is_valid_json() {
        let line = json_line(
            1_700_000_000_000,
            log::Level::Warn,
            "dns_latency::scheduler",
            "probe to \"ns1\" timed out\n",
        );
        let value: serde_json::Value = serde_json::from_str(&line).expect("Line should parse");
        assert_eq!(value["ts"], 1_700_000_000_000i64);
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["target"], "dns_latency::scheduler");
        assert_eq!(value["msg"], "probe to \"ns1\" timed out\n");
        assert!(!line.contains('\n'), "One record per line");
    }

    #[test]
    fn test_init_logger_twice_does_not_panic() {
        let first = init_logger_with(LevelFilter::Info, LogFormat::Plain);
        let second = init_logger_with(LevelFilter::Debug, LogFormat::Json);
        // Whichever ran first in this process installed the logger
        assert!(first.is_err() || second.is_err());
    }
}
