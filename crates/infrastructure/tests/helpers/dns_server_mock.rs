#![allow(dead_code)]
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

pub const RCODE_NOERROR: u8 = 0;
pub const RCODE_SERVFAIL: u8 = 2;
pub const RCODE_NXDOMAIN: u8 = 3;
pub const RCODE_REFUSED: u8 = 5;

/// How the mock answers each UDP query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Answer with this response code. `NOERROR` carries one A record.
    Answer(u8),
    /// Answer `NOERROR` over UDP with TC set and no records; a TCP listener
    /// on the same port gives the full answer.
    Truncated,
    /// Read queries and never reply.
    Silent,
}

/// Mock DNS server for tests
///
/// Listens on an ephemeral loopback port and counts every query it reads.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;

        let tcp_listener = match behavior {
            MockBehavior::Truncated => Some(TcpListener::bind(addr).await?),
            _ => None,
        };

        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let udp_counter = Arc::clone(&udp_queries);
        let tcp_counter = Arc::clone(&tcp_queries);
        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        let Ok((len, peer)) = result else { continue };
                        udp_counter.fetch_add(1, Ordering::SeqCst);

                        let response = match behavior {
                            MockBehavior::Answer(rcode) => build_mock_response(&buf[..len], rcode, false),
                            MockBehavior::Truncated => build_mock_response(&buf[..len], RCODE_NOERROR, true),
                            MockBehavior::Silent => continue,
                        };
                        let _ = socket.send_to(&response, peer).await;
                    }
                    Some(stream) = accept(&tcp_listener) => {
                        tcp_counter.fetch_add(1, Ordering::SeqCst);
                        tokio::spawn(serve_tcp(stream));
                    }
                }
            }
        });

        Ok(Self {
            addr,
            udp_queries,
            tcp_queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn query_count(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_connection_count(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn accept(listener: &Option<TcpListener>) -> Option<tokio::net::TcpStream> {
    match listener {
        Some(listener) => listener.accept().await.ok().map(|(stream, _)| stream),
        None => std::future::pending().await,
    }
}

async fn serve_tcp(mut stream: tokio::net::TcpStream) {
    let mut len_buf = [0u8; 2];
    if stream.read_exact(&mut len_buf).await.is_err() {
        return;
    }
    let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
    if stream.read_exact(&mut query).await.is_err() {
        return;
    }

    let response = build_mock_response(&query, RCODE_NOERROR, false);
    let mut frame = (response.len() as u16).to_be_bytes().to_vec();
    frame.extend_from_slice(&response);
    let _ = stream.write_all(&frame).await;
}

/// Builds a reply to a single-question query without EDNS.
pub fn build_mock_response(query: &[u8], rcode: u8, truncated: bool) -> Vec<u8> {
    if query.len() < 12 {
        return vec![];
    }

    let with_answer = rcode == RCODE_NOERROR && !truncated;
    let mut response = Vec::with_capacity(512);

    // Transaction ID
    response.extend_from_slice(&query[0..2]);

    // QR=1, Opcode=0, AA=0, TC, RD=1
    response.push(if truncated { 0x83 } else { 0x81 });
    // RA=1, RCODE
    response.push(0x80 | (rcode & 0x0f));

    // Questions count (from query)
    response.extend_from_slice(&query[4..6]);
    // Answers, authority, additional
    response.extend_from_slice(&[0x00, u8::from(with_answer)]);
    response.extend_from_slice(&[0x00, 0x00]);
    response.extend_from_slice(&[0x00, 0x00]);

    // Question section
    response.extend_from_slice(&query[12..]);

    if with_answer {
        response.extend_from_slice(&[
            0xc0, 0x0c, // Name pointer to question
            0x00, 0x01, // Type A
            0x00, 0x01, // Class IN
            0x00, 0x00, 0x00, 0x3c, // TTL: 60 seconds
            0x00, 0x04, // Data length: 4 bytes
            93, 184, 216, 34, // IP: 93.184.216.34
        ]);
    }

    response
}
