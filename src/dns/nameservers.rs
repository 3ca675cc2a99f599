//! Authoritative nameserver discovery.
//!
//! Queries the local recursive resolver for a domain's NS records, then
//! resolves every NS target to its addresses. Each (hostname, address) pair
//! becomes one probe target.

use std::future::Future;
use std::net::IpAddr;

use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::rr::{Name, RData, RecordType};
use hickory_resolver::TokioAsyncResolver;
use log::{debug, warn};
use rand::seq::SliceRandom;
use tokio::sync::OnceCell;

use crate::domain::to_dns_name;
use crate::error_handling::ResolverError;
use crate::initialization::init_resolver;

/// One authoritative nameserver address to probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nameserver {
    /// NS target without the trailing dot (e.g. `ns1.google.com`)
    pub hostname: String,
    pub address: IpAddr,
}

/// Source of the authoritative nameservers of a domain.
pub trait NameserverSource {
    /// Discovers the nameservers of `domain`.
    ///
    /// An empty list means the domain has no usable nameserver right now and
    /// is skipped for this cycle. Errors carry their own severity
    /// (`ResolverError::is_fatal`).
    fn discover(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<Vec<Nameserver>, ResolverError>> + Send;
}

/// Nameserver discovery through the system's recursive resolver (`resolv.conf`).
///
/// The resolver is built lazily on first use. If the system configuration
/// cannot be read, every discovery fails with `ResolverError::Configuration`
/// and construction is retried on the next call, so a configuration that
/// appears later is picked up without restarting.
pub struct SystemNameserverResolver {
    resolver: OnceCell<TokioAsyncResolver>,
}

impl Default for SystemNameserverResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemNameserverResolver {
    pub fn new() -> Self {
        SystemNameserverResolver {
            resolver: OnceCell::new(),
        }
    }

    /// Uses an explicitly configured resolver instead of the system one.
    pub fn with_resolver(resolver: TokioAsyncResolver) -> Self {
        SystemNameserverResolver {
            resolver: OnceCell::new_with(Some(resolver)),
        }
    }

    async fn resolver(&self) -> Result<&TokioAsyncResolver, ResolverError> {
        self.resolver
            .get_or_try_init(|| async {
                init_resolver().map_err(|e| ResolverError::Configuration(e.to_string()))
            })
            .await
    }

    /// Queries the NS records of `domain`.
    ///
    /// Returns an empty vector when the domain has no NS records (including
    /// NXDOMAIN). Other lookup failures are returned as `ResolverError::Lookup`.
    ///
    /// # Errors
    ///
    /// `InvalidDomain` for malformed names, `Configuration` when no resolver
    /// is available, `Lookup` for timeouts and network errors.
    pub async fn lookup_ns_records(&self, domain: &str) -> Result<Vec<Name>, ResolverError> {
        let name = to_dns_name(domain)?;
        let resolver = self.resolver().await?;

        match resolver.lookup(name, RecordType::NS).await {
            Ok(lookup) => Ok(lookup
                .iter()
                .filter_map(|rdata| match rdata {
                    RData::NS(ns) => Some(ns.0.clone()),
                    _ => None,
                })
                .collect()),
            Err(e) => match e.kind() {
                ResolveErrorKind::NoRecordsFound { .. } => {
                    debug!("No NS records for {domain}: {e}");
                    Ok(Vec::new())
                }
                _ => Err(ResolverError::Lookup {
                    domain: domain.to_string(),
                    source: e,
                }),
            },
        }
    }

    /// Resolves a nameserver hostname, returning no addresses on failure.
    async fn resolve_addresses(resolver: &TokioAsyncResolver, host: &Name) -> Vec<IpAddr> {
        match resolver.lookup_ip(host.clone()).await {
            Ok(lookup) => lookup.iter().collect(),
            Err(e) => {
                warn!("Skipping nameserver {host}: address lookup failed: {e}");
                Vec::new()
            }
        }
    }
}

impl NameserverSource for SystemNameserverResolver {
    async fn discover(&self, domain: &str) -> Result<Vec<Nameserver>, ResolverError> {
        let hosts = self.lookup_ns_records(domain).await?;
        let resolver = self.resolver().await?;

        let mut nameservers = Vec::with_capacity(hosts.len());
        for host in &hosts {
            let ascii = host.to_ascii();
            let hostname = ascii.strip_suffix('.').unwrap_or(&ascii).to_string();
            for address in Self::resolve_addresses(resolver, host).await {
                nameservers.push(Nameserver {
                    hostname: hostname.clone(),
                    address,
                });
            }
        }

        // Spread load across the authoritative servers from one cycle to the next
        nameservers.shuffle(&mut rand::rng());
        debug!(
            "{domain}: {} NS records, {} nameserver addresses",
            hosts.len(),
            nameservers.len()
        );
        Ok(nameservers)
    }
}
