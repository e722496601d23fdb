//! Fixed-layout structures from RFC1035 §4.1: the message header and its
//! flags octet pair, and the handful of TYPE/CLASS enumerations this
//! resolver actually inspects (A, NS, CNAME; class IN). Variable-length
//! wire data (domain names, RDATA) lives outside these structures — see
//! [`crate::codec`] and [`crate::walker`].
use std::fmt;

use crate::error::DNSResult;
use crate::network_order::ToFromNetworkOrder;
use dns_derive::{DnsEnum, DnsStruct};

/// A one bit field that specifies whether a message is a query (0) or a
/// response (1).
#[derive(Debug, Clone, Copy, PartialEq, DnsEnum)]
#[repr(u8)]
pub enum PacketType {
    Query = 0,
    Response = 1,
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PacketType::Query => write!(f, "QUERY"),
            PacketType::Response => write!(f, "RESPONSE"),
        }
    }
}

/// A four bit field that specifies the kind of query (RFC1035 §4.1.1).
/// Only `Query` is ever produced by this resolver; the others are kept so
/// a response carrying a non-zero opcode can still be parsed and logged.
#[derive(Debug, Clone, Copy, PartialEq, DnsEnum)]
#[repr(u8)]
pub enum OpCode {
    Query = 0,
    IQuery = 1,
    Status = 2,
}

/// RFC1035 §4.1.1 response codes, trimmed to the values a resolver that
/// never sends EDNS can actually receive.
#[derive(Debug, Clone, Copy, PartialEq, DnsEnum)]
#[repr(u8)]
pub enum ResponseCode {
    NoError = 0,
    FormErr = 1,
    ServFail = 2,
    NXDomain = 3,
    NotImp = 4,
    Refused = 5,
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// RR TYPE codes this resolver's traversal cares about (spec §3: "no
/// support for record types beyond A, NS, CNAME during traversal").
#[derive(Debug, Clone, Copy, PartialEq, DnsEnum)]
#[repr(u16)]
pub enum QType {
    A = 1,
    NS = 2,
    CNAME = 5,
}

/// RR CLASS codes. Only IN is ever sent or expected.
#[derive(Debug, Clone, Copy, PartialEq, DnsEnum)]
#[repr(u16)]
pub enum QClass {
    IN = 1,
}

/// The two flag octets of a DNS header, packed per spec §9's explicit
/// shift-and-mask layout (portable across endianness, unlike the C
/// bitfields `original_source/lib/dns.h` relies on).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Flags {
    pub packet_type: PacketType,
    pub op_code: OpCode,
    pub authoritative_answer: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub z: bool,
    pub authentic_data: bool,
    pub checking_disabled: bool,
    pub response_code: ResponseCode,
}

impl ToFromNetworkOrder for Flags {
    fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let byte1 = ((self.packet_type as u8) << 7)
            | ((self.op_code as u8) << 3)
            | ((self.authoritative_answer as u8) << 2)
            | ((self.truncated as u8) << 1)
            | (self.recursion_desired as u8);

        let byte2 = ((self.recursion_available as u8) << 7)
            | ((self.z as u8) << 6)
            | ((self.authentic_data as u8) << 5)
            | ((self.checking_disabled as u8) << 4)
            | (self.response_code as u8);

        buffer.push(byte1);
        buffer.push(byte2);
        Ok(2)
    }

    fn from_network_bytes(&mut self, buffer: &mut std::io::Cursor<&[u8]>) -> DNSResult<()> {
        let mut byte1 = 0u8;
        let mut byte2 = 0u8;
        byte1.from_network_bytes(buffer)?;
        byte2.from_network_bytes(buffer)?;

        self.packet_type = PacketType::try_from((byte1 >> 7) & 0x1)
            .map_err(|_| crate::error::DNSError::MalformedResponse("invalid QR bit"))?;
        self.op_code = OpCode::try_from((byte1 >> 3) & 0xF)
            .map_err(|_| crate::error::DNSError::MalformedResponse("invalid OPCODE"))?;
        self.authoritative_answer = (byte1 >> 2) & 0x1 == 1;
        self.truncated = (byte1 >> 1) & 0x1 == 1;
        self.recursion_desired = byte1 & 0x1 == 1;

        self.recursion_available = (byte2 >> 7) & 0x1 == 1;
        self.z = (byte2 >> 6) & 0x1 == 1;
        self.authentic_data = (byte2 >> 5) & 0x1 == 1;
        self.checking_disabled = (byte2 >> 4) & 0x1 == 1;
        self.response_code = ResponseCode::try_from(byte2 & 0xF)
            .map_err(|_| crate::error::DNSError::MalformedResponse("invalid RCODE"))?;

        Ok(())
    }
}

/// The 12-octet DNS message header (RFC1035 §4.1.1).
#[derive(Debug, Clone, Copy, Default, DnsStruct)]
pub struct DNSPacketHeader {
    pub id: u16,
    pub flags: Flags,
    pub qd_count: u16,
    pub an_count: u16,
    pub ns_count: u16,
    pub ar_count: u16,
}

impl DNSPacketHeader {
    /// A fresh outgoing-query header: RD set, everything else zeroed, the
    /// given id and a single question.
    pub fn new_query(id: u16) -> Self {
        let mut header = DNSPacketHeader::default();
        header.id = id;
        header.flags.packet_type = PacketType::Query;
        header.flags.op_code = OpCode::Query;
        header.flags.recursion_desired = true;
        header.qd_count = 1;
        header
    }
}
