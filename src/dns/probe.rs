//! Direct, timed A-record probes.
//!
//! A probe sends one non-recursive query straight to a nameserver address
//! over UDP and measures the time until the matching response arrives. The
//! clock is `std::time::Instant`, which is monotonic, so latencies can never
//! go negative when the wall clock is adjusted.

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::{Duration, Instant};

use hickory_resolver::proto::error::ProtoError;
use hickory_resolver::proto::op::{Message, MessageType, OpCode, Query};
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::proto::serialize::binary::BinEncodable;
use log::{debug, trace};
use tokio::net::UdpSocket;

use crate::config::{Config, DNS_PORT, MAX_UDP_RESPONSE_SIZE, PROBE_TIMEOUT};
use crate::domain::to_dns_name;
use crate::error_handling::FailureKind;

/// Why a probe produced no measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeFailure {
    /// No matching response before the deadline
    Timeout,
    /// Socket could not be opened, or the send/receive failed
    Unreachable,
    /// The query name could not be encoded
    Malformed,
}

impl ProbeFailure {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ProbeFailure::Timeout => FailureKind::ProbeTimeout,
            ProbeFailure::Unreachable => FailureKind::ProbeUnreachable,
            ProbeFailure::Malformed => FailureKind::ProbeMalformed,
        }
    }
}

/// Result of a single probe.
///
/// A latency of zero is a valid measurement; failure is always explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Answered { latency_micros: u64 },
    Failed(ProbeFailure),
}

impl ProbeOutcome {
    pub fn latency_micros(&self) -> Option<u64> {
        match self {
            ProbeOutcome::Answered { latency_micros } => Some(*latency_micros),
            ProbeOutcome::Failed(_) => None,
        }
    }
}

/// Issues one timed query for `query_name` against `address`.
pub trait LatencyProbe {
    fn probe(
        &self,
        query_name: &str,
        address: IpAddr,
    ) -> impl Future<Output = ProbeOutcome> + Send;
}

/// UDP probe with a bounded wait.
#[derive(Debug, Clone)]
pub struct UdpProbe {
    port: u16,
    timeout: Duration,
}

impl Default for UdpProbe {
    fn default() -> Self {
        UdpProbe::new(DNS_PORT, PROBE_TIMEOUT)
    }
}

impl UdpProbe {
    pub fn new(port: u16, timeout: Duration) -> Self {
        UdpProbe { port, timeout }
    }

    pub fn from_config(config: &Config) -> Self {
        UdpProbe::new(config.dns_port, config.probe_timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Encodes a non-recursive A/IN query for `query_name` with message id `id`.
pub fn build_query(query_name: &str, id: u16) -> Result<Vec<u8>, ProtoError> {
    let name = to_dns_name(query_name).map_err(|e| ProtoError::from(e.to_string()))?;

    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(false);
    message.add_query(Query::query(name, RecordType::A));
    message.to_bytes()
}

/// Whether `bytes` is a response to the query with id `id`.
///
/// Any response code counts: the server answered, which is what is measured.
fn is_matching_response(bytes: &[u8], id: u16) -> bool {
    match Message::from_vec(bytes) {
        Ok(message) => message.id() == id && message.message_type() == MessageType::Response,
        Err(e) => {
            trace!("Ignoring undecodable datagram: {e}");
            false
        }
    }
}

impl LatencyProbe for UdpProbe {
    async fn probe(&self, query_name: &str, address: IpAddr) -> ProbeOutcome {
        let id: u16 = rand::random();
        let packet = match build_query(query_name, id) {
            Ok(packet) => packet,
            Err(e) => {
                debug!("Cannot encode query for {query_name}: {e}");
                return ProbeOutcome::Failed(ProbeFailure::Malformed);
            }
        };

        let bind_addr: SocketAddr = match address {
            IpAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            IpAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let target = SocketAddr::new(address, self.port);

        let socket = match UdpSocket::bind(bind_addr).await {
            Ok(socket) => socket,
            Err(e) => {
                debug!("Failed to bind probe socket for {target}: {e}");
                return ProbeOutcome::Failed(ProbeFailure::Unreachable);
            }
        };
        if let Err(e) = socket.connect(target).await {
            debug!("Failed to connect probe socket to {target}: {e}");
            return ProbeOutcome::Failed(ProbeFailure::Unreachable);
        }

        let mut buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let started = Instant::now();
        if let Err(e) = socket.send(&packet).await {
            debug!("Failed to send probe to {target}: {e}");
            return ProbeOutcome::Failed(ProbeFailure::Unreachable);
        }

        let wait_for_answer = async {
            loop {
                let len = socket.recv(&mut buf).await?;
                let received = Instant::now();
                if is_matching_response(&buf[..len], id) {
                    return Ok::<Duration, std::io::Error>(received.duration_since(started));
                }
            }
        };

        match tokio::time::timeout(self.timeout, wait_for_answer).await {
            Ok(Ok(elapsed)) => ProbeOutcome::Answered {
                latency_micros: u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
            },
            Ok(Err(e)) => {
                debug!("Probe to {target} failed: {e}");
                ProbeOutcome::Failed(ProbeFailure::Unreachable)
            }
            Err(_) => {
                debug!(
                    "Probe to {target} timed out after {}ms",
                    self.timeout.as_millis()
                );
                ProbeOutcome::Failed(ProbeFailure::Timeout)
            }
        }
    }
}
