//! Domain name normalization and validation.
//!
//! Key functions:
//! - `normalize_domain()` - Canonical form used as the storage key (lowercase, no trailing dot)
//! - `to_dns_name()` - Validated, fully-qualified DNS name for queries

use std::net::IpAddr;

use hickory_resolver::proto::rr::Name;

use crate::error_handling::ResolverError;

/// Normalizes a domain name into the form stored in the database.
///
/// Trims whitespace, lowercases, and strips a single trailing dot. The result
/// is validated as a DNS name.
///
/// # Errors
///
/// Returns `ResolverError::InvalidDomain` for empty input, IP addresses, or
/// strings that are not valid DNS names.
pub fn normalize_domain(input: &str) -> Result<String, ResolverError> {
    let trimmed = input.trim();
    let without_dot = trimmed.strip_suffix('.').unwrap_or(trimmed);
    let normalized = without_dot.to_ascii_lowercase();
    to_dns_name(&normalized)?;
    Ok(normalized)
}

/// Parses `domain` into a fully-qualified DNS name.
///
/// # Errors
///
/// Returns `ResolverError::InvalidDomain` if the name is malformed.
pub fn to_dns_name(domain: &str) -> Result<Name, ResolverError> {
    let invalid = |reason: String| ResolverError::InvalidDomain {
        domain: domain.to_string(),
        reason,
    };

    if domain.is_empty() || domain == "." {
        return Err(invalid("empty name".to_string()));
    }
    if domain.parse::<IpAddr>().is_ok() {
        return Err(invalid("IP addresses are not domain names".to_string()));
    }

    let relative = domain.strip_suffix('.').unwrap_or(domain);
    if relative.split('.').any(str::is_empty) {
        return Err(invalid("empty label".to_string()));
    }

    let mut name = Name::from_ascii(domain).map_err(|e| invalid(e.to_string()))?;
    if name.is_root() {
        return Err(invalid("empty name".to_string()));
    }
    name.set_fqdn(true);
    Ok(name)
}
