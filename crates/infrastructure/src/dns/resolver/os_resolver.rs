use super::super::forwarding::MessageBuilder;
use super::super::network::NetworkChangeDetector;
use super::super::transport::{self, tcp::TcpTransport, Transport};
use async_trait::async_trait;
use ferrous_osdns_application::ports::DnsResolver;
use ferrous_osdns_application::RequestContext;
use ferrous_osdns_domain::{DomainError, NetworkSnapshot};
use hickory_proto::op::{Message, ResponseCode};
use smallvec::SmallVec;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Per-attempt upper bound when the caller's context carries no deadline.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(2);

/// One upstream to try, copied out of the snapshot before any I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Nameserver reported by the OS. Always plain DNS.
    Address(SocketAddr),
    /// Configured endpoint, classified on use.
    Endpoint(Arc<str>),
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Candidate::Address(addr) => write!(f, "{}", addr),
            Candidate::Endpoint(endpoint) => f.write_str(endpoint),
        }
    }
}

type Candidates = SmallVec<[Candidate; 4]>;

/// Forwards queries to the nameservers the host is currently using.
///
/// A LAN nameserver that just appeared is tried first, then the public
/// nameservers in OS order, then any configured fallback endpoints. The
/// first `NOERROR` answer wins. Other response codes are remembered and the
/// next candidate is tried; when every candidate has been tried the last
/// such answer is returned.
pub struct OsResolver {
    detector: Arc<NetworkChangeDetector>,
    fallback_upstreams: Arc<[Arc<str>]>,
    attempt_timeout: Duration,
}

impl OsResolver {
    pub fn new(detector: Arc<NetworkChangeDetector>) -> Self {
        Self {
            detector,
            fallback_upstreams: Arc::from(Vec::new()),
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    pub fn with_fallback_upstreams(mut self, endpoints: Vec<String>) -> Self {
        self.fallback_upstreams = endpoints.into_iter().map(Arc::from).collect();
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn detector(&self) -> &Arc<NetworkChangeDetector> {
        &self.detector
    }

    /// Candidates in query order for the given snapshot.
    pub fn candidates_for(&self, snapshot: &NetworkSnapshot) -> SmallVec<[Candidate; 4]> {
        let mut candidates: Candidates =
            SmallVec::with_capacity(snapshot.candidate_count() + self.fallback_upstreams.len());
        candidates.extend(snapshot.candidates().map(Candidate::Address));
        candidates.extend(
            self.fallback_upstreams
                .iter()
                .map(|endpoint| Candidate::Endpoint(Arc::clone(endpoint))),
        );
        candidates
    }

    pub async fn resolve(
        &self,
        ctx: &RequestContext,
        query: &Message,
    ) -> Result<Message, DomainError> {
        let candidates = self.candidates_for(&self.detector.current_snapshot());
        if candidates.is_empty() {
            warn!("No nameservers known, cannot forward query");
            return Err(DomainError::NoUpstreamAvailable);
        }

        let mut upstream_query = query.clone();
        MessageBuilder::set_id(&mut upstream_query, fastrand::u16(..));
        let query_bytes = MessageBuilder::serialize(&upstream_query)?;

        let mut best_answer: Option<Message> = None;
        let mut last_error: Option<DomainError> = None;

        for candidate in &candidates {
            if ctx.is_done() {
                return Err(DomainError::Canceled);
            }

            let timeout = self.attempt_budget(ctx);
            let outcome = tokio::select! {
                biased;
                _ = ctx.done() => {
                    debug!(server = %candidate, "Query canceled by caller");
                    return Err(DomainError::Canceled);
                }
                outcome = exchange(candidate, &query_bytes, timeout) => outcome,
            };

            match outcome {
                Ok(mut response) => {
                    MessageBuilder::set_id(&mut response, query.id());
                    let rcode = response.response_code();
                    if rcode == ResponseCode::NoError {
                        debug!(server = %candidate, answers = response.answers().len(), "Upstream answered");
                        return Ok(response);
                    }

                    debug!(server = %candidate, rcode = ?rcode, "Upstream returned non-success, trying next");
                    best_answer = Some(response);
                }
                Err(e) if e.is_transport_error() => {
                    debug!(server = %candidate, error = %e, "Upstream attempt failed, trying next");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        match best_answer {
            Some(answer) => Ok(answer),
            None => Err(last_error.unwrap_or(DomainError::NoUpstreamAvailable)),
        }
    }

    fn attempt_budget(&self, ctx: &RequestContext) -> Duration {
        match ctx.remaining() {
            Some(remaining) => remaining.min(self.attempt_timeout),
            None => self.attempt_timeout,
        }
    }
}

/// One exchange with one candidate. The transport and its socket live only
/// for the duration of this future.
async fn exchange(
    candidate: &Candidate,
    query_bytes: &[u8],
    timeout: Duration,
) -> Result<Message, DomainError> {
    let start = Instant::now();
    let dns_transport = match candidate {
        Candidate::Address(addr) => transport::for_address(*addr),
        Candidate::Endpoint(endpoint) => transport::create_transport(endpoint)?,
    };

    let response = dns_transport.send(query_bytes, timeout).await?;
    let message = MessageBuilder::parse_response(&response.bytes)?;

    if message.truncated() {
        if let Transport::Udp(udp) = &dns_transport {
            debug!(
                server = %udp.server_addr(),
                "Response truncated (TC bit), retrying via TCP"
            );

            let remaining = timeout.saturating_sub(start.elapsed());
            if remaining.is_zero() {
                return Err(DomainError::TransportTimeout {
                    server: udp.server_addr().to_string(),
                });
            }

            let tcp = Transport::Tcp(TcpTransport::new(udp.server_addr()));
            let tcp_response = tcp.send(query_bytes, remaining).await?;
            return MessageBuilder::parse_response(&tcp_response.bytes);
        }
    }

    debug!(
        server = %candidate,
        protocol = response.protocol_used,
        latency_ms = start.elapsed().as_millis() as u64,
        "Upstream exchange complete"
    );

    Ok(message)
}

#[async_trait]
impl DnsResolver for OsResolver {
    async fn resolve(&self, ctx: &RequestContext, query: &Message) -> Result<Message, DomainError> {
        OsResolver::resolve(self, ctx, query).await
    }
}
