//! DNS resolver initialization.
//!
//! This module builds the recursive resolver used to discover a domain's
//! authoritative nameservers.

use std::time::Duration;

use hickory_resolver::system_conf::read_system_conf;
use hickory_resolver::TokioAsyncResolver;

use crate::config::{DNS_ATTEMPTS, DNS_TIMEOUT_SECS};
use crate::error_handling::InitializationError;

/// Initializes the recursive resolver from the system configuration.
///
/// Nameservers and search settings come from `/etc/resolv.conf` (or the
/// platform equivalent); timeouts are tightened so a dead upstream resolver
/// fails a domain quickly instead of stalling the whole cycle.
///
/// # Errors
///
/// Returns `InitializationError::DnsResolverError` when the system resolver
/// configuration cannot be read. There is no silent fallback to public
/// resolvers: the caller decides how to surface the failure.
pub fn init_resolver() -> Result<TokioAsyncResolver, InitializationError> {
    let (config, mut opts) =
        read_system_conf().map_err(|e| InitializationError::DnsResolverError(e.to_string()))?;

    opts.timeout = Duration::from_secs(DNS_TIMEOUT_SECS);
    opts.attempts = DNS_ATTEMPTS;
    // Domains are always absolute; never append search domains
    opts.ndots = 0;

    Ok(TokioAsyncResolver::tokio(config, opts))
}
