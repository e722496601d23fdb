//! Assembles a single-question `A` query packet: header + QNAME + QTYPE +
//! QCLASS. This resolver only ever sends this one shape of query (spec
//! §4: "always QTYPE=A, QCLASS=IN, a single question"), so there is no
//! general-purpose message builder here, unlike the teacher's `DnsQuery`.
use crate::error::DNSResult;
use crate::network_order::ToFromNetworkOrder;
use crate::wire::{DNSPacketHeader, QClass, QType};

/// Builds the wire bytes of an `A`/`IN` query for the already-encoded
/// `qname` (see [`crate::codec::encode_hostname`]), using `id` as the
/// transaction id.
pub fn build_query(qname: &[u8], id: u16) -> DNSResult<Vec<u8>> {
    let header = DNSPacketHeader::new_query(id);

    let mut buffer = Vec::with_capacity(12 + qname.len() + 4);
    header.to_network_bytes(&mut buffer)?;
    buffer.extend_from_slice(qname);
    (QType::A as u16).to_network_bytes(&mut buffer)?;
    (QClass::IN as u16).to_network_bytes(&mut buffer)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode_hostname, MAX_NAME_LEN};

    #[test]
    fn builds_a_single_question_query() {
        let mut qname = [0u8; MAX_NAME_LEN];
        let n = encode_hostname("example.com", &mut qname).unwrap();

        let packet = build_query(&qname[..n], 0xBEEF).unwrap();

        assert_eq!(packet.len(), 12 + n + 4);
        assert_eq!(&packet[0..2], &[0xBE, 0xEF]);
        assert_eq!(packet[2] & 0x01, 1, "RD bit must be set");
        assert_eq!(&packet[4..6], &[0x00, 0x01], "QDCOUNT == 1");
        assert_eq!(&packet[6..12], &[0, 0, 0, 0, 0, 0], "no other counts set");

        let qname_end = 12 + n;
        assert_eq!(&packet[12..qname_end], &qname[..n]);
        assert_eq!(&packet[qname_end..qname_end + 2], &[0x00, 0x01], "QTYPE A");
        assert_eq!(&packet[qname_end + 2..qname_end + 4], &[0x00, 0x01], "QCLASS IN");
    }
}
