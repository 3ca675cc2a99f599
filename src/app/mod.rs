//! Main application modules.
//!
//! This module provides shutdown handling and the end-of-run statistics
//! printing used by the binary.

pub mod shutdown;
pub mod statistics;

// Re-export public API
pub use shutdown::{cancel_on_ctrl_c, join_watcher};
pub use statistics::{print_domain_stats, print_probe_statistics};
