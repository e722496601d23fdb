//! The 13 IANA root name servers and the wall-clock-seeded order in which
//! this resolver tries them. Grounded in `original_source/src/dns.c`'s
//! root server table and `original_source/lib/dns.c`'s `dns_resolve_root`,
//! which rotates the starting server by a seed derived from the current
//! time rather than always hammering `a.root-servers.net` first.
use std::net::Ipv4Addr;

/// The 13 IANA root servers, in their canonical a-m order.
pub const ROOT_SERVERS: [Ipv4Addr; 13] = [
    Ipv4Addr::new(198, 41, 0, 4),     // a.root-servers.net
    Ipv4Addr::new(199, 9, 14, 201),   // b.root-servers.net
    Ipv4Addr::new(192, 33, 4, 12),    // c.root-servers.net
    Ipv4Addr::new(199, 7, 91, 13),    // d.root-servers.net
    Ipv4Addr::new(192, 203, 230, 10), // e.root-servers.net
    Ipv4Addr::new(192, 5, 5, 241),    // f.root-servers.net
    Ipv4Addr::new(192, 112, 36, 4),   // g.root-servers.net
    Ipv4Addr::new(198, 97, 190, 53),  // h.root-servers.net
    Ipv4Addr::new(192, 36, 148, 17),  // i.root-servers.net
    Ipv4Addr::new(192, 58, 128, 30),  // j.root-servers.net
    Ipv4Addr::new(193, 0, 14, 129),   // k.root-servers.net
    Ipv4Addr::new(199, 7, 83, 42),    // l.root-servers.net
    Ipv4Addr::new(202, 12, 27, 33),   // m.root-servers.net
];

/// Returns the root servers starting at `seed % 13` and wrapping around,
/// so repeated resolves don't all hit the same root server first.
pub fn seeded_order(seed: u16) -> impl Iterator<Item = Ipv4Addr> {
    let offset = seed as usize % ROOT_SERVERS.len();
    ROOT_SERVERS
        .into_iter()
        .cycle()
        .skip(offset)
        .take(ROOT_SERVERS.len())
}
