//! Domain name codec: encoding a hostname into wire labels, and decoding
//! a (possibly compressed) name out of a received packet.
//!
//! Names are handled as raw label sequences in fixed-size scratch buffers
//! rather than as an owned, parsed structure — `original_source/lib/dns.c`'s
//! `dns_encode_hostname`/`dns_decompress_name` do the same, and it avoids an
//! allocation per name during a walk that may visit dozens of records.
use crate::error::{DNSError, DNSResult};

/// Largest encoded name this codec will ever produce or decompress into.
/// RFC1035 §3.1 caps an encoded name at 255 octets; one byte of headroom
/// is kept for the reader not to need a separate bounds check.
pub const MAX_NAME_LEN: usize = 256;

/// A pointer chain longer than this is treated as malformed rather than
/// followed — real zone data never nests this deep, and an unbounded
/// follow would let a hostile packet spin a name decode forever.
const MAX_POINTER_HOPS: usize = 16;

/// Encodes `host` (e.g. `"www.example.com"`, with or without a trailing
/// dot) into `out` as a sequence of length-prefixed labels terminated by
/// a zero octet, returning the number of bytes written.
pub fn encode_hostname(host: &str, out: &mut [u8; MAX_NAME_LEN]) -> DNSResult<usize> {
    let host = host.strip_suffix('.').unwrap_or(host);
    if host.is_empty() {
        out[0] = 0;
        return Ok(1);
    }

    let mut pos = 0usize;
    for label in host.split('.') {
        if label.is_empty() {
            return Err(DNSError::EncodeInvalid(format!(
                "hostname {:?} has an empty label",
                host
            )));
        }
        if label.len() > 63 {
            return Err(DNSError::EncodeInvalid(format!(
                "label {:?} exceeds 63 octets",
                label
            )));
        }
        if pos + 1 + label.len() >= out.len() {
            return Err(DNSError::BufferTooSmall);
        }

        out[pos] = label.len() as u8;
        out[pos + 1..pos + 1 + label.len()].copy_from_slice(label.as_bytes());
        pos += 1 + label.len();
    }

    if pos >= out.len() {
        return Err(DNSError::BufferTooSmall);
    }
    out[pos] = 0;
    pos += 1;

    if pos > 255 {
        return Err(DNSError::EncodeInvalid(format!(
            "hostname {:?} encodes to more than 255 octets",
            host
        )));
    }

    Ok(pos)
}

/// Decompresses the name starting at `packet[start..]` into `out`, as a
/// sequence of length-prefixed labels terminated by a zero octet.
///
/// Returns `(consumed, written)`: `consumed` is how many bytes the name
/// occupied in `packet` starting at `start` (the caller's cursor should
/// advance by exactly this much, regardless of any pointer indirection);
/// `written` is the length of the decompressed name now sitting in `out`.
pub fn decompress_name(
    packet: &[u8],
    start: usize,
    out: &mut [u8; MAX_NAME_LEN],
) -> DNSResult<(usize, usize)> {
    let mut pos = start;
    let mut out_len = 0usize;
    let mut consumed = 0usize;
    let mut jumped = false;
    let mut hops = 0usize;

    loop {
        let len_byte = *packet
            .get(pos)
            .ok_or(DNSError::MalformedResponse("name ran past packet end"))?;

        if len_byte == 0 {
            if !jumped {
                consumed += 1;
            }
            if out_len >= out.len() {
                return Err(DNSError::BufferTooSmall);
            }
            out[out_len] = 0;
            out_len += 1;
            break;
        }

        if len_byte & 0xC0 == 0xC0 {
            let lo = *packet
                .get(pos + 1)
                .ok_or(DNSError::MalformedResponse("truncated compression pointer"))?;
            if !jumped {
                consumed += 2;
            }
            hops += 1;
            if hops > MAX_POINTER_HOPS {
                return Err(DNSError::MalformedResponse(
                    "too many compression pointer hops",
                ));
            }
            pos = (((len_byte as usize) & 0x3F) << 8) | lo as usize;
            jumped = true;
            continue;
        }

        if len_byte & 0xC0 != 0 {
            return Err(DNSError::MalformedResponse(
                "reserved bits set in label length",
            ));
        }

        let label_len = len_byte as usize;
        let label_start = pos + 1;
        let label_end = label_start + label_len;
        if label_end > packet.len() {
            return Err(DNSError::MalformedResponse("label ran past packet end"));
        }
        if out_len + 1 + label_len >= out.len() {
            return Err(DNSError::BufferTooSmall);
        }

        out[out_len] = len_byte;
        out[out_len + 1..out_len + 1 + label_len].copy_from_slice(&packet[label_start..label_end]);
        out_len += 1 + label_len;
        if !jumped {
            consumed += 1 + label_len;
        }
        pos = label_end;
    }

    Ok((consumed, out_len))
}

/// Renders a decompressed, length-prefixed label sequence (as produced by
/// [`decompress_name`]) back into dotted-string form, for logging and for
/// matching NS targets against ADDITIONAL glue.
pub fn labels_to_string(encoded: &[u8]) -> DNSResult<String> {
    let mut name = String::new();
    let mut pos = 0usize;

    while pos < encoded.len() {
        let len = encoded[pos] as usize;
        if len == 0 {
            break;
        }
        let start = pos + 1;
        let end = start + len;
        if end > encoded.len() {
            return Err(DNSError::MalformedResponse("label ran past name end"));
        }
        if !name.is_empty() {
            name.push('.');
        }
        name.push_str(std::str::from_utf8(&encoded[start..end])?);
        pos = end;
    }

    Ok(name)
}
