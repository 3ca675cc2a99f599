//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `dns_latency` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Ctrl-C handling and the final statistics table
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;

use dns_latency::initialization::init_logger_with;
use dns_latency::{cancel_on_ctrl_c, join_watcher, print_domain_stats, run_monitor, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists), falling back
    // to a .env next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    let cancel = CancellationToken::new();
    let watcher = cancel_on_ctrl_c(cancel.clone());

    let result = run_monitor(config, cancel.clone()).await;
    cancel.cancel();
    join_watcher(watcher).await;

    match result {
        Ok(report) => {
            print_domain_stats(&report.domain_stats);
            println!(
                "{} cycle{} ({} queries recorded) in {:.1}s - results saved in {}",
                report.cycles,
                if report.cycles == 1 { "" } else { "s" },
                report.recorded,
                report.elapsed_seconds,
                report.db_path.display()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("dns_latency error: {:#}", e);
            process::exit(1);
        }
    }
}
