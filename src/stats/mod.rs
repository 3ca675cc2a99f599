//! Per-domain latency statistics.
//!
//! Statistics are a derived view of the query log: they are recomputed from
//! the full history of a domain and hold no state of their own, so a crash or
//! restart can never leave them inconsistent with the recorded queries.
//!
//! The standard deviation is the **sample** standard deviation (Bessel's
//! correction, divisor `n - 1`). With fewer than two samples it is `0.0`.

mod aggregator;
mod running;

// Re-export public API
pub use aggregator::{refresh_domain_stats, summarize};
pub use running::RunningStats;
