//! Walks the QUESTION/ANSWER/AUTHORITY/ADDITIONAL sections of a received
//! packet, advancing past each record without interpreting its RDATA —
//! RDATA interpretation (is this an A record worth keeping? does this
//! CNAME target need chasing?) is the resolver's job, not this module's.
//! Modeled on the teacher's `response.rs::ResourceRecord`, minus the
//! RDATA-to-typed-struct conversion it attempted (and which its
//! `self.rd_data = buffer.get_ref()[];` never actually compiled).
use byteorder::{BigEndian, ByteOrder};

use crate::codec::{decompress_name, labels_to_string, MAX_NAME_LEN};
use crate::error::{DNSError, DNSResult};

/// A resource record's fixed-width fields, with RDATA left as an opaque
/// packet-relative range. The owner name for the record just walked is
/// available via [`Walker::name`] until the next call to
/// [`Walker::next_record`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordView {
    pub rtype: u16,
    pub rclass: u16,
    pub ttl: u32,
    pub rdata_offset: usize,
    pub rdata_len: usize,
}

/// Sequential cursor over a packet's resource records, past the header.
pub struct Walker<'a> {
    packet: &'a [u8],
    pos: usize,
    name_buf: [u8; MAX_NAME_LEN],
    name_len: usize,
}

impl<'a> Walker<'a> {
    /// Builds a walker starting at `start`, typically right after the
    /// 12-octet header (`start == 12`).
    pub fn new(packet: &'a [u8], start: usize) -> Self {
        Walker {
            packet,
            pos: start,
            name_buf: [0u8; MAX_NAME_LEN],
            name_len: 0,
        }
    }

    /// Current byte offset into the packet.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Advances past a single QUESTION entry (QNAME + QTYPE + QCLASS).
    pub fn skip_question(&mut self) -> DNSResult<()> {
        let mut scratch = [0u8; MAX_NAME_LEN];
        let (consumed, _) = decompress_name(self.packet, self.pos, &mut scratch)?;
        self.pos = self
            .pos
            .checked_add(consumed + 4)
            .ok_or(DNSError::MalformedResponse("question ran past packet end"))?;
        Ok(())
    }

    /// Reads the next resource record (NAME, TYPE, CLASS, TTL, RDLENGTH,
    /// RDATA), advancing past it, and returns its fixed fields. The
    /// record's owner name is left decoded in the walker's scratch buffer
    /// — read it with [`Walker::name`] before calling this again.
    pub fn next_record(&mut self) -> DNSResult<RecordView> {
        let (consumed, name_len) = decompress_name(self.packet, self.pos, &mut self.name_buf)?;
        self.name_len = name_len;
        self.pos += consumed;

        let rtype = self.read_u16()?;
        let rclass = self.read_u16()?;
        let ttl = self.read_u32()?;
        let rdlength = self.read_u16()? as usize;

        let rdata_offset = self.pos;
        let rdata_end = rdata_offset
            .checked_add(rdlength)
            .ok_or(DNSError::MalformedResponse("RDLENGTH overflow"))?;
        if rdata_end > self.packet.len() {
            return Err(DNSError::MalformedResponse("RDLENGTH runs past packet end"));
        }
        self.pos = rdata_end;

        Ok(RecordView {
            rtype,
            rclass,
            ttl,
            rdata_offset,
            rdata_len: rdlength,
        })
    }

    /// The decompressed owner name of the record most recently returned
    /// by [`Walker::next_record`], in length-prefixed label form.
    pub fn name(&self) -> &[u8] {
        &self.name_buf[..self.name_len]
    }

    /// [`Walker::name`] rendered as a dotted string.
    pub fn name_string(&self) -> DNSResult<String> {
        labels_to_string(self.name())
    }

    /// The raw RDATA bytes for a record view this walker produced.
    pub fn rdata(&self, record: &RecordView) -> &'a [u8] {
        &self.packet[record.rdata_offset..record.rdata_offset + record.rdata_len]
    }

    fn read_u16(&mut self) -> DNSResult<u16> {
        let bytes = self
            .packet
            .get(self.pos..self.pos + 2)
            .ok_or(DNSError::MalformedResponse("u16 field ran past packet end"))?;
        self.pos += 2;
        Ok(BigEndian::read_u16(bytes))
    }

    fn read_u32(&mut self) -> DNSResult<u32> {
        let bytes = self
            .packet
            .get(self.pos..self.pos + 4)
            .ok_or(DNSError::MalformedResponse("u32 field ran past packet end"))?;
        self.pos += 4;
        Ok(BigEndian::read_u32(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_hostname;

    fn sample_a_packet() -> Vec<u8> {
        let mut qname = [0u8; MAX_NAME_LEN];
        let n = encode_hostname("example.com", &mut qname).unwrap();

        let mut packet = vec![0u8; 12];
        packet.extend_from_slice(&qname[..n]);
        packet.extend_from_slice(&[0x00, 0x01]); // QTYPE A
        packet.extend_from_slice(&[0x00, 0x01]); // QCLASS IN

        // answer: same name via pointer to offset 12, TYPE A, CLASS IN,
        // TTL 300, RDLENGTH 4, RDATA 93.184.216.34
        packet.push(0xC0);
        packet.push(0x0C);
        packet.extend_from_slice(&[0x00, 0x01]);
        packet.extend_from_slice(&[0x00, 0x01]);
        packet.extend_from_slice(&300u32.to_be_bytes());
        packet.extend_from_slice(&[0x00, 0x04]);
        packet.extend_from_slice(&[93, 184, 216, 34]);

        packet
    }

    #[test]
    fn walks_question_then_answer() {
        let packet = sample_a_packet();
        let mut walker = Walker::new(&packet, 12);

        walker.skip_question().unwrap();
        let record = walker.next_record().unwrap();

        assert_eq!(walker.name_string().unwrap(), "example.com");
        assert_eq!(record.rtype, 1);
        assert_eq!(record.rclass, 1);
        assert_eq!(record.ttl, 300);
        assert_eq!(walker.rdata(&record), &[93, 184, 216, 34]);
        assert_eq!(walker.pos(), packet.len());
    }

    #[test]
    fn rejects_truncated_rdata() {
        let mut packet = sample_a_packet();
        packet.truncate(packet.len() - 1);

        let mut walker = Walker::new(&packet, 12);
        walker.skip_question().unwrap();
        assert!(matches!(
            walker.next_record(),
            Err(DNSError::MalformedResponse(_))
        ));
    }
}
