use super::super::forwarding::MessageBuilder;
use async_trait::async_trait;
use ferrous_osdns_application::ports::DnsResolver;
use ferrous_osdns_application::RequestContext;
use hickory_proto::op::{Edns, Header, Message, OpCode, ResponseCode};
use hickory_proto::rr::Record;
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use std::iter;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Answers client requests by forwarding them through a [`DnsResolver`].
///
/// Each request gets its own deadline. Resolution failures become SERVFAIL
/// carrying the client's question. Truncation to the client's UDP payload
/// is left to the hickory-server response handle.
#[derive(Clone)]
pub struct DnsServerHandler {
    resolver: Arc<dyn DnsResolver>,
    request_timeout: Duration,
    shutdown: CancellationToken,
}

impl DnsServerHandler {
    pub fn new(resolver: Arc<dyn DnsResolver>, request_timeout: Duration) -> Self {
        Self {
            resolver,
            request_timeout,
            shutdown: CancellationToken::new(),
        }
    }

    /// In-flight resolutions are canceled when `shutdown` fires.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Resolves one decoded query. Never fails: errors come back as SERVFAIL.
    pub async fn answer(&self, request: &Message) -> Message {
        let ctx = RequestContext::with_cancellation(self.shutdown.child_token())
            .with_timeout(self.request_timeout);

        match self.resolver.resolve(&ctx, request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    id = request.id(),
                    query = ?request.queries().first().map(|q| q.name().to_string()),
                    error = %e,
                    "Resolution failed, answering SERVFAIL"
                );
                MessageBuilder::servfail_for(request)
            }
        }
    }
}

#[async_trait]
impl RequestHandler for DnsServerHandler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> ResponseInfo {
        let mut builder = MessageResponseBuilder::from_message_request(request);
        if request.edns().is_some() {
            let mut edns = Edns::new();
            edns.set_max_payload(request.max_payload());
            builder.edns(edns);
        }

        if request.op_code() != OpCode::Query {
            debug!(id = request.id(), op_code = ?request.op_code(), "Unsupported opcode");
            let response = builder.error_msg(request.header(), ResponseCode::NotImp);
            return send(&mut response_handle, response, request.header()).await;
        }

        let query = match MessageBuilder::parse_query(request.as_slice()) {
            Ok(query) => query,
            Err(e) => {
                debug!(id = request.id(), error = %e, "Undecodable request");
                let response = builder.error_msg(request.header(), ResponseCode::FormErr);
                return send(&mut response_handle, response, request.header()).await;
            }
        };

        let reply = self.answer(&query).await;

        let mut header = Header::response_from_request(request.header());
        header.set_response_code(reply.response_code());
        header.set_recursion_available(true);
        header.set_authoritative(reply.authoritative());
        header.set_authentic_data(reply.authentic_data());

        let response = builder.build(
            header,
            reply.answers(),
            reply.name_servers(),
            iter::empty::<&Record>(),
            reply.additionals(),
        );
        send(&mut response_handle, response, &header).await
    }
}

async fn send<'a, R: ResponseHandler>(
    response_handle: &mut R,
    response: hickory_server::authority::MessageResponse<
        '_,
        'a,
        impl Iterator<Item = &'a Record> + Send + 'a,
        impl Iterator<Item = &'a Record> + Send + 'a,
        impl Iterator<Item = &'a Record> + Send + 'a,
        impl Iterator<Item = &'a Record> + Send + 'a,
    >,
    header: &Header,
) -> ResponseInfo {
    match response_handle.send_response(response).await {
        Ok(info) => info,
        Err(e) => {
            warn!(id = header.id(), error = %e, "Failed to send response");
            let mut failed = Header::response_from_request(header);
            failed.set_response_code(ResponseCode::ServFail);
            failed.into()
        }
    }
}
