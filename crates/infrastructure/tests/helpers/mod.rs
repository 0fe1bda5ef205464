#![allow(dead_code)]
pub mod dns_server_mock;

pub use dns_server_mock::*;

use ferrous_osdns_infrastructure::dns::forwarding::MessageBuilder;
use hickory_proto::op::Message;
use hickory_proto::rr::RecordType;
use std::net::SocketAddr;

pub fn a_query(domain: &str) -> Message {
    MessageBuilder::build_query(domain, RecordType::A).unwrap()
}

/// A loopback port with nothing listening on it.
pub async fn closed_port() -> SocketAddr {
    let socket = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    socket.local_addr().unwrap()
}
