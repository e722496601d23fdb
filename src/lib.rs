//! An iterative DNS resolver: given a hostname, walks the delegation
//! chain from the root servers down to an authoritative answer itself,
//! rather than handing the query to a configured recursive resolver.
pub mod bootstrap;
pub mod codec;
pub mod error;
pub mod message;
pub mod network_order;
pub mod resolver;
pub mod transport;
pub mod util;
pub mod walker;
pub mod wire;

use std::net::Ipv4Addr;

pub use error::{DNSError, DNSResult};
use resolver::Resolver;
use transport::UdpTransport;

/// Resolves `hostname` to its first `A` record by iterative resolution
/// over live UDP transport, starting from the IANA root servers.
pub fn resolve(hostname: &str) -> DNSResult<Ipv4Addr> {
    Resolver::new(UdpTransport).resolve(hostname)
}
