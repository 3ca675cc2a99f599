//! DNS measurement primitives.
//!
//! This module provides async DNS operations built on `hickory-resolver`:
//! - Cache-busting query names (random label prepended to the domain)
//! - Authoritative nameserver discovery (NS records + address lookups)
//! - Direct, timed A-record probes against a single nameserver

mod cache_bust;
mod nameservers;
mod probe;

// Re-export public API
pub use cache_bust::{cache_busted_name, random_label};
pub use nameservers::{Nameserver, NameserverSource, SystemNameserverResolver};
pub use probe::{build_query, LatencyProbe, ProbeFailure, ProbeOutcome, UdpProbe};
