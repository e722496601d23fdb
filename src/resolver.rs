//! The resolver engine: depth-bounded, iterative resolution from the root
//! down, following referrals, chasing aliases, and resolving glue-less
//! nameservers along the way. Grounded in
//! `original_source/lib/dns.c`'s `dns_recursive_query`/`dns_resolve_root`,
//! which walk exactly these four passes over a response — direct answer,
//! delegation with glue, delegation without glue, and alias — in that
//! priority order.
use std::net::Ipv4Addr;

use log::{debug, trace};

use crate::bootstrap::seeded_order;
use crate::codec::{encode_hostname, MAX_NAME_LEN};
use crate::error::{DNSError, DNSResult};
use crate::message::build_query;
use crate::transport::{Transport, MAX_UDP_PACKET};
use crate::util::{bootstrap_seed, query_id};
use crate::walker::{RecordView, Walker};
use crate::wire::{DNSPacketHeader, PacketType, QType, ResponseCode};

/// Recursion reached this many referrals/aliases/NS-resolutions deep
/// without an answer is treated as a broken or hostile delegation chain,
/// not patience running out — matching `original_source`'s own bound.
pub const DEPTH_LIMIT: u8 = 16;

/// What a single response told us to do next.
enum StepOutcome {
    /// A usable `A` record for the name we asked about.
    Answer(Ipv4Addr),
    /// A referral to a closer set of nameservers, with glue addresses.
    Delegate(Vec<Ipv4Addr>),
    /// A referral naming nameservers this response gave us no address
    /// for, in AUTHORITY order; each must be resolved in turn until one
    /// works.
    DelegateNoGlue(Vec<String>),
    /// The name we asked about is an alias; resolve this target instead.
    Alias(String),
}

/// Resolves hostnames to their first `A` record by iterative descent from
/// the root servers, over whichever [`Transport`] it's built with.
pub struct Resolver<T: Transport> {
    transport: T,
}

impl<T: Transport> Resolver<T> {
    pub fn new(transport: T) -> Self {
        Resolver { transport }
    }

    /// Resolves `hostname` to an IPv4 address, starting a fresh bootstrap
    /// walk of the root servers.
    pub fn resolve(&self, hostname: &str) -> DNSResult<Ipv4Addr> {
        self.resolve_at_depth(hostname, 0)
    }

    fn resolve_at_depth(&self, name: &str, depth: u8) -> DNSResult<Ipv4Addr> {
        if depth >= DEPTH_LIMIT {
            return Err(DNSError::DepthExceeded);
        }
        let servers: Vec<Ipv4Addr> = seeded_order(bootstrap_seed()).collect();
        self.query_chain(name, &servers, depth)
    }

    /// Queries `servers` in order for `name`, following whatever referral,
    /// alias or glue-less delegation each response describes, until an
    /// answer is found or every avenue at this depth is exhausted.
    fn query_chain(&self, name: &str, servers: &[Ipv4Addr], depth: u8) -> DNSResult<Ipv4Addr> {
        if depth >= DEPTH_LIMIT {
            return Err(DNSError::DepthExceeded);
        }

        let mut qname_buf = [0u8; MAX_NAME_LEN];
        let qname_len = encode_hostname(name, &mut qname_buf)?;
        let qname = &qname_buf[..qname_len];

        for &server in servers {
            debug!("querying {} for {} at depth {}", server, name, depth);
            let outcome = match self.exchange_once(qname, name, server) {
                Ok(outcome) => outcome,
                Err(e) => {
                    trace!("{} gave no usable reply for {}: {}", server, name, e);
                    continue;
                }
            };

            let result = match outcome {
                StepOutcome::Answer(addr) => return Ok(addr),
                StepOutcome::Delegate(next_servers) => {
                    self.query_chain(name, &next_servers, depth + 1)
                }
                StepOutcome::DelegateNoGlue(ns_names) => {
                    self.query_via_ns_targets(name, &ns_names, depth + 1)
                }
                StepOutcome::Alias(target) => self.resolve_at_depth(&target, depth + 1),
            };

            if result.is_ok() {
                return result;
            }
        }

        Err(DNSError::NoAnswer)
    }

    /// Tries each glue-less NS target in turn: resolve its hostname from
    /// the bootstrap, then query it for `name`. Moves on to the next NS
    /// target if either step fails, matching `original_source/lib/dns.c`'s
    /// authority-count loop, which advances to the next NS record rather
    /// than giving up when one nameserver can't be resolved or reached.
    fn query_via_ns_targets(&self, name: &str, ns_names: &[String], depth: u8) -> DNSResult<Ipv4Addr> {
        for ns_name in ns_names {
            let result = self
                .resolve_at_depth(ns_name, depth)
                .and_then(|ns_addr| self.query_chain(name, &[ns_addr], depth));
            if result.is_ok() {
                return result;
            }
        }
        Err(DNSError::NoAnswer)
    }

    fn exchange_once(&self, qname: &[u8], sought: &str, server: Ipv4Addr) -> DNSResult<StepOutcome> {
        let id = query_id();
        let query = build_query(qname, id)?;

        let mut buf = [0u8; MAX_UDP_PACKET];
        let n = self.transport.exchange(server, &query, id, qname, &mut buf)?;

        interpret_response(&buf[..n], sought)
    }
}

/// Interprets one response packet against the name we asked about,
/// applying the four passes in priority order: a direct answer beats a
/// glued referral, which beats a glue-less referral, which beats chasing
/// an alias.
fn interpret_response(packet: &[u8], sought: &str) -> DNSResult<StepOutcome> {
    let mut header = DNSPacketHeader::default();
    {
        use crate::network_order::ToFromNetworkOrder;
        let mut cursor = std::io::Cursor::new(packet);
        header.from_network_bytes(&mut cursor)?;
    }

    if header.flags.packet_type != PacketType::Response {
        return Err(DNSError::MalformedResponse("reply is not a response"));
    }
    if header.flags.response_code != ResponseCode::NoError {
        return Err(DNSError::NoAnswer);
    }

    let mut walker = Walker::new(packet, 12);
    for _ in 0..header.qd_count {
        walker.skip_question()?;
    }

    let answers = collect_records(&mut walker, header.an_count)?;
    let authorities = collect_records(&mut walker, header.ns_count)?;
    let additionals = collect_records(&mut walker, header.ar_count)?;

    // Pass 1: the first A record in ANSWER, whoever its owner is — a
    // response commonly bundles the final A record with the CNAME chain
    // that led to it in one packet, and this record is already in hand.
    for (_, record) in &answers {
        if record.rtype == QType::A as u16 {
            return Ok(StepOutcome::Answer(ipv4_from_rdata(record_rdata(packet, record))?));
        }
    }

    // Collect every NS target named in AUTHORITY, regardless of pass. The
    // target nameserver's hostname lives in the NS record's RDATA, not its
    // owner name (the owner is the zone being delegated, e.g. "com.") — it
    // must be decompressed, not read off the walker's owner-name field.
    let ns_targets: Vec<String> = authorities
        .iter()
        .filter(|(_, r)| r.rtype == QType::NS as u16)
        .map(|(_, r)| {
            let mut out = [0u8; MAX_NAME_LEN];
            let (_, written) = crate::codec::decompress_name(packet, r.rdata_offset, &mut out)?;
            crate::codec::labels_to_string(&out[..written])
        })
        .collect::<DNSResult<Vec<String>>>()?;

    if !ns_targets.is_empty() {
        // Pass 2: glue for any of those nameservers in ADDITIONAL. A glue
        // record's owner name is the nameserver hostname itself.
        let glue: Vec<Ipv4Addr> = additionals
            .iter()
            .filter(|(name, r)| {
                r.rtype == QType::A as u16 && ns_targets.iter().any(|t| names_eq(name, t.as_str()))
            })
            .filter_map(|(_, r)| ipv4_from_rdata(record_rdata(packet, r)).ok())
            .collect();

        if !glue.is_empty() {
            return Ok(StepOutcome::Delegate(glue));
        }

        // Pass 3: a referral with no glue — resolve each NS name in turn
        // until one of them works.
        return Ok(StepOutcome::DelegateNoGlue(ns_targets));
    }

    // Pass 4: the first CNAME record in ANSWER, an alias to chase.
    for (_, record) in &answers {
        if record.rtype == QType::CNAME as u16 {
            let mut out = [0u8; MAX_NAME_LEN];
            let (_, written) = crate::codec::decompress_name(packet, record.rdata_offset, &mut out)?;
            return Ok(StepOutcome::Alias(crate::codec::labels_to_string(&out[..written])?));
        }
    }

    Err(DNSError::NoAnswer)
}

fn collect_records(walker: &mut Walker<'_>, count: u16) -> DNSResult<Vec<(String, RecordView)>> {
    let mut records = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let record = walker.next_record()?;
        records.push((walker.name_string()?, record));
    }
    Ok(records)
}

fn record_rdata<'a>(packet: &'a [u8], record: &RecordView) -> &'a [u8] {
    &packet[record.rdata_offset..record.rdata_offset + record.rdata_len]
}

fn ipv4_from_rdata(rdata: &[u8]) -> DNSResult<Ipv4Addr> {
    if rdata.len() != 4 {
        return Err(DNSError::MalformedResponse("A record RDATA is not 4 octets"));
    }
    Ok(Ipv4Addr::new(rdata[0], rdata[1], rdata[2], rdata[3]))
}

fn names_eq(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b.strip_suffix('.').unwrap_or(b))
        || a.strip_suffix('.').unwrap_or(a).eq_ignore_ascii_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::FakeTransport;
    use crate::wire::{DNSPacketHeader, OpCode, QClass};

    fn header_bytes(id: u16, an: u16, ns: u16, ar: u16) -> Vec<u8> {
        use crate::network_order::ToFromNetworkOrder;
        let mut header = DNSPacketHeader::new_query(id);
        header.flags.packet_type = PacketType::Response;
        header.flags.op_code = OpCode::Query;
        header.flags.recursion_desired = false;
        header.an_count = an;
        header.ns_count = ns;
        header.ar_count = ar;
        let mut buf = Vec::new();
        header.to_network_bytes(&mut buf).unwrap();
        buf
    }

    fn question_bytes(name: &str) -> Vec<u8> {
        let mut qname = [0u8; MAX_NAME_LEN];
        let n = encode_hostname(name, &mut qname).unwrap();
        let mut buf = qname[..n].to_vec();
        buf.extend_from_slice(&(QType::A as u16).to_be_bytes());
        buf.extend_from_slice(&(QClass::IN as u16).to_be_bytes());
        buf
    }

    fn a_record(name: &str, addr: Ipv4Addr) -> Vec<u8> {
        let mut qname = [0u8; MAX_NAME_LEN];
        let n = encode_hostname(name, &mut qname).unwrap();
        let mut buf = qname[..n].to_vec();
        buf.extend_from_slice(&(QType::A as u16).to_be_bytes());
        buf.extend_from_slice(&(QClass::IN as u16).to_be_bytes());
        buf.extend_from_slice(&300u32.to_be_bytes());
        buf.extend_from_slice(&4u16.to_be_bytes());
        buf.extend_from_slice(&addr.octets());
        buf
    }

    #[test]
    fn resolves_a_direct_answer_from_the_first_bootstrap_server() {
        let transport = FakeTransport::new();

        let mut packet = header_bytes(0, 1, 0, 0);
        packet.extend(question_bytes("example.com"));
        packet.extend(a_record("example.com", Ipv4Addr::new(93, 184, 216, 34)));

        // every bootstrap server is tried in some order; script all of them
        // so the test doesn't depend on which one the seed picks first.
        for s in crate::bootstrap::ROOT_SERVERS {
            transport.script(s, packet.clone());
        }

        let resolver = Resolver::new(transport);
        let addr = resolver.resolve("example.com").unwrap();
        assert_eq!(addr, Ipv4Addr::new(93, 184, 216, 34));
    }

    /// Regression test: glue is matched by the NS record's RDATA-decoded
    /// target name, not by the NS record's owner name (the owner is the
    /// zone being delegated, e.g. "com.", which never appears as an
    /// ADDITIONAL record's owner).
    #[test]
    fn interpret_response_matches_glue_by_ns_target_not_owner() {
        let mut packet = header_bytes(0, 0, 1, 1);
        packet.extend(question_bytes("example.com"));

        let mut ns_rr = encode_name("com.");
        ns_rr.extend_from_slice(&(QType::NS as u16).to_be_bytes());
        ns_rr.extend_from_slice(&(QClass::IN as u16).to_be_bytes());
        ns_rr.extend_from_slice(&300u32.to_be_bytes());
        let ns_target = encode_name("a.gtld-servers.net");
        ns_rr.extend_from_slice(&(ns_target.len() as u16).to_be_bytes());
        ns_rr.extend_from_slice(&ns_target);
        packet.extend(ns_rr);

        packet.extend(a_record(
            "a.gtld-servers.net",
            Ipv4Addr::new(192, 5, 6, 30),
        ));

        let outcome = interpret_response(&packet, "example.com").unwrap();
        match outcome {
            StepOutcome::Delegate(glue) => {
                assert_eq!(glue, vec![Ipv4Addr::new(192, 5, 6, 30)])
            }
            _ => panic!("expected a glued delegation"),
        }
    }

    fn encode_name(name: &str) -> Vec<u8> {
        let mut buf = [0u8; MAX_NAME_LEN];
        let n = encode_hostname(name, &mut buf).unwrap();
        buf[..n].to_vec()
    }

    fn ns_rr(owner: &str, target: &str) -> Vec<u8> {
        let mut buf = encode_name(owner);
        buf.extend_from_slice(&(QType::NS as u16).to_be_bytes());
        buf.extend_from_slice(&(QClass::IN as u16).to_be_bytes());
        buf.extend_from_slice(&300u32.to_be_bytes());
        let target = encode_name(target);
        buf.extend_from_slice(&(target.len() as u16).to_be_bytes());
        buf.extend_from_slice(&target);
        buf
    }

    /// Regression test: a glue-less referral naming more than one NS record
    /// must hand back every target, not just the first — the caller is the
    /// one that walks them until one resolves.
    #[test]
    fn interpret_response_collects_every_glueless_ns_target() {
        let mut packet = header_bytes(0, 0, 2, 0);
        packet.extend(question_bytes("example.com"));
        packet.extend(ns_rr("com.", "dead.gtld-servers.net"));
        packet.extend(ns_rr("com.", "a.gtld-servers.net"));

        let outcome = interpret_response(&packet, "example.com").unwrap();
        match outcome {
            StepOutcome::DelegateNoGlue(targets) => assert_eq!(
                targets,
                vec!["dead.gtld-servers.net".to_string(), "a.gtld-servers.net".to_string()]
            ),
            _ => panic!("expected a glue-less delegation"),
        }
    }

    /// Regression test: when the first glue-less NS target can't be
    /// resolved or reached, the resolver falls through to the next one
    /// instead of giving up, matching the original's authority-count loop.
    #[test]
    fn query_via_ns_targets_falls_through_to_the_next_name() {
        let transport = FakeTransport::new();
        let good_server = Ipv4Addr::new(192, 5, 6, 30);

        // every root answers "dead.gtld-servers.net" with NXDOMAIN first —
        // guaranteeing its resolution fails regardless of which roots the
        // seeded order visits — then a usable A record for the second
        // target's own resolution.
        let mut failure = header_bytes(0, 0, 0, 0);
        set_rcode(&mut failure, ResponseCode::NXDomain);
        let mut ns_answer = header_bytes(0, 1, 0, 0);
        ns_answer.extend(question_bytes("a.gtld-servers.net"));
        ns_answer.extend(a_record("a.gtld-servers.net", good_server));

        for s in crate::bootstrap::ROOT_SERVERS {
            transport.script(s, failure.clone());
            transport.script(s, ns_answer.clone());
        }

        // and the second target's own server, once resolved, answers the
        // name the caller actually wants.
        let mut final_answer = header_bytes(0, 1, 0, 0);
        final_answer.extend(question_bytes("example.com"));
        final_answer.extend(a_record("example.com", Ipv4Addr::new(93, 184, 216, 34)));
        transport.script(good_server, final_answer);

        let resolver = Resolver::new(transport);
        // with the old (pre-fix) code this would only ever try
        // "dead.gtld-servers.net", which never resolves, and return
        // `NoAnswer` without ever reaching `good_server`.
        let addr = resolver
            .query_via_ns_targets(
                "example.com",
                &["dead.gtld-servers.net".to_string(), "a.gtld-servers.net".to_string()],
                0,
            )
            .unwrap();
        assert_eq!(addr, Ipv4Addr::new(93, 184, 216, 34));
    }

    // byte 3 (0-indexed) is the second flags octet: ra/z/ad/cd/rcode.
    fn set_rcode(packet: &mut [u8], rcode: ResponseCode) {
        packet[3] = (packet[3] & 0xF0) | (rcode as u8);
    }

    #[test]
    fn names_eq_ignores_trailing_dot_and_case() {
        assert!(names_eq("Example.com", "example.com."));
        assert!(!names_eq("example.com", "example.net"));
    }
}
