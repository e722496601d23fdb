//! The network seam: sending one query datagram and waiting for a
//! validated reply. Production code goes through [`UdpTransport`]; the
//! resolver's traversal policy is exercised in tests through
//! [`testing::FakeTransport`] instead of a live socket, so the S1-S7
//! scenarios run deterministically and without a network.
use std::net::{Ipv4Addr, UdpSocket};
use std::time::Duration;

use byteorder::{BigEndian, ByteOrder};

use crate::error::{DNSError, DNSResult};

/// Largest UDP datagram this resolver will ever receive (the classic
/// DNS-over-UDP ceiling; nothing here ever negotiates EDNS0).
pub const MAX_UDP_PACKET: usize = 65536;

const RECEIVE_ATTEMPTS: usize = 255;
const SOCKET_TIMEOUT: Duration = Duration::from_secs(3);

/// A single request/response exchange with one name server. Implementors
/// own retransmission policy (this resolver sends exactly once per call
/// and lets the caller decide whether to retry against another server).
pub trait Transport {
    /// Sends `query` (already containing `id` and the question for
    /// `qname`) to `server:53` and reads the first reply whose id and
    /// echoed question match, into `buf`. Returns the number of bytes
    /// received.
    fn exchange(
        &self,
        server: Ipv4Addr,
        query: &[u8],
        id: u16,
        qname: &[u8],
        buf: &mut [u8; MAX_UDP_PACKET],
    ) -> DNSResult<usize>;
}

/// Talks to real name servers over UDP port 53.
#[derive(Debug, Default)]
pub struct UdpTransport;

impl Transport for UdpTransport {
    fn exchange(
        &self,
        server: Ipv4Addr,
        query: &[u8],
        id: u16,
        qname: &[u8],
        buf: &mut [u8; MAX_UDP_PACKET],
    ) -> DNSResult<usize> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.set_read_timeout(Some(SOCKET_TIMEOUT))?;
        socket.set_write_timeout(Some(SOCKET_TIMEOUT))?;
        socket.connect((server, 53))?;
        socket.send(query)?;

        for _ in 0..RECEIVE_ATTEMPTS {
            let n = socket.recv(buf)?;
            if !reply_matches(&buf[..n], id, qname) {
                continue;
            }
            return Ok(n);
        }

        Err(DNSError::MalformedResponse(
            "no matching reply within the receive attempt budget",
        ))
    }
}

/// A reply is only accepted if its transaction id and echoed QNAME match
/// the query we sent — otherwise it's either a stray duplicate from an
/// earlier, abandoned query, or spoofed.
fn reply_matches(reply: &[u8], id: u16, qname: &[u8]) -> bool {
    if reply.len() < 12 + qname.len() {
        return false;
    }
    BigEndian::read_u16(&reply[0..2]) == id && &reply[12..12 + qname.len()] == qname
}

/// Scripted transports for exercising the resolver's traversal logic
/// without a network.
pub mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::{HashMap, VecDeque};
    use std::io;

    /// A transport whose replies are scripted per server address ahead of
    /// time and consumed in FIFO order. Unscripted servers, or a server
    /// whose script has run dry, fail the exchange — which is exactly
    /// what scenario S7 ("every server in the chain times out") wants.
    #[derive(Default)]
    pub struct FakeTransport {
        scripts: RefCell<HashMap<Ipv4Addr, VecDeque<Vec<u8>>>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            FakeTransport::default()
        }

        /// Queues `response` as the next reply `server` will give.
        pub fn script(&self, server: Ipv4Addr, response: Vec<u8>) {
            self.scripts
                .borrow_mut()
                .entry(server)
                .or_default()
                .push_back(response);
        }
    }

    impl Transport for FakeTransport {
        fn exchange(
            &self,
            server: Ipv4Addr,
            _query: &[u8],
            _id: u16,
            _qname: &[u8],
            buf: &mut [u8; MAX_UDP_PACKET],
        ) -> DNSResult<usize> {
            let mut scripts = self.scripts.borrow_mut();
            let response = scripts
                .get_mut(&server)
                .and_then(|queue| queue.pop_front())
                .ok_or_else(|| {
                    DNSError::Socket(io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("no scripted response left for {}", server),
                    ))
                })?;

            if response.len() > buf.len() {
                return Err(DNSError::BufferTooSmall);
            }
            buf[..response.len()].copy_from_slice(&response);
            Ok(response.len())
        }
    }
}
