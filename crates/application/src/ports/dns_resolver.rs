use crate::context::RequestContext;
use async_trait::async_trait;
use ferrous_osdns_domain::DomainError;
use hickory_proto::op::Message;

/// Query-serving entry point used by the DNS frontend.
///
/// Returns either an answer, possibly with a non-success response code, or
/// an error the frontend turns into SERVFAIL.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(&self, ctx: &RequestContext, query: &Message) -> Result<Message, DomainError>;
}
