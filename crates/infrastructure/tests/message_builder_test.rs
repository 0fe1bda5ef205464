use ferrous_osdns_domain::DomainError;
use ferrous_osdns_infrastructure::dns::forwarding::MessageBuilder;
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::RecordType;

// ============================================================================
// Query Building Tests
// ============================================================================

#[test]
fn test_build_a_query_sets_rd() {
    let query = MessageBuilder::build_query("google.com", RecordType::A).unwrap();
    let bytes = MessageBuilder::serialize(&query).unwrap();

    // DNS header is always 12 bytes, plus question section
    assert!(bytes.len() > 12, "DNS message too short: {} bytes", bytes.len());
    assert_eq!(bytes[2] & 0x01, 0x01, "RD flag should be set");
    assert_eq!(u16::from_be_bytes([bytes[0], bytes[1]]), query.id());
}

#[test]
fn test_build_query_rejects_bad_name() {
    let long_label = "a".repeat(64);
    let err = MessageBuilder::build_query(&format!("{}.com", long_label), RecordType::A)
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidQuery(_)));
}

// ============================================================================
// Codec Tests
// ============================================================================

#[test]
fn test_parse_query_reads_serialized_question() {
    let query = MessageBuilder::build_query("example.com.", RecordType::AAAA).unwrap();
    let bytes = MessageBuilder::serialize(&query).unwrap();

    let parsed = MessageBuilder::parse_query(&bytes).unwrap();

    assert_eq!(parsed.queries().len(), 1);
    assert_eq!(parsed.queries()[0].query_type(), RecordType::AAAA);
}

#[test]
fn test_error_for_keeps_code() {
    let query = MessageBuilder::build_query("example.com.", RecordType::A).unwrap();
    let refused = MessageBuilder::error_for(&query, ResponseCode::Refused);

    assert_eq!(refused.response_code(), ResponseCode::Refused);
    assert_eq!(refused.id(), query.id());
}
