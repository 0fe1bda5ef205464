//! DNS message codec
//!
//! Wire-format encoding and decoding of `hickory-proto` messages, plus the
//! synthetic answers the forwarder produces on its own.

use ferrous_osdns_domain::DomainError;
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;

pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a recursive query for `domain` with a random ID.
    pub fn build_query(domain: &str, record_type: RecordType) -> Result<Message, DomainError> {
        let name = Name::from_str(domain)
            .map_err(|e| DomainError::InvalidQuery(format!("Invalid domain '{}': {}", domain, e)))?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(record_type);
        query.set_query_class(DNSClass::IN);

        let mut message = Message::new(fastrand::u16(..), MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);

        Ok(message)
    }

    /// Serialize a message to wire format bytes.
    pub fn serialize(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidQuery(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }

    /// Parse an upstream answer.
    pub fn parse_response(bytes: &[u8]) -> Result<Message, DomainError> {
        Message::from_vec(bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })
    }

    /// Parse a client request.
    pub fn parse_query(bytes: &[u8]) -> Result<Message, DomainError> {
        Message::from_vec(bytes)
            .map_err(|e| DomainError::InvalidQuery(format!("Failed to parse DNS query: {}", e)))
    }

    /// SERVFAIL reply echoing the ID, opcode, RD flag and questions of `request`.
    pub fn servfail_for(request: &Message) -> Message {
        Self::error_for(request, ResponseCode::ServFail)
    }

    pub fn error_for(request: &Message, code: ResponseCode) -> Message {
        let mut response = Message::new(request.id(), MessageType::Response, request.op_code());
        response.set_recursion_desired(request.recursion_desired());
        response.set_recursion_available(true);
        response.set_response_code(code);
        response.add_queries(request.queries().iter().cloned());
        response
    }

    /// Replace the transaction ID, leaving the rest of the header intact.
    pub fn set_id(message: &mut Message, id: u16) {
        let mut header = *message.header();
        header.set_id(id);
        message.set_header(header);
    }
}
