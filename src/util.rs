//! Small helpers that don't belong to any one module: wall-clock-derived
//! transaction ids, and a hex dump for `log::debug!`-ing a raw packet.
use std::time::{SystemTime, UNIX_EPOCH};

/// Derives a pseudo-random 16 bit value from the system clock: seconds
/// XORed with microseconds, truncated. Used both as the DNS transaction
/// id and as the root-server rotation seed (`original_source/lib/dns.c`
/// does the same — no CSPRNG needed for either, since neither is a
/// security boundary here).
pub fn clock_derived_u16() -> u16 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let secs = now.as_secs() as u16;
    let micros = now.subsec_micros() as u16;
    secs ^ micros
}

/// A fresh DNS transaction id, recomputed for every UDP exchange (see
/// `DESIGN.md`'s open-question note on per-query vs per-resolve ids).
pub fn query_id() -> u16 {
    clock_derived_u16()
}

/// The seed used to rotate the root server bootstrap order.
pub fn bootstrap_seed() -> u16 {
    clock_derived_u16()
}

/// Renders `bytes` as space-separated hex octets, 16 per line, for
/// logging a packet at `log::debug!` without flooding a single line.
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, chunk) in bytes.chunks(16).enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for byte in chunk {
            out.push_str(&format!("{:02x} ", byte));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_dump_formats_bytes() {
        assert_eq!(hex_dump(&[0x00, 0xff, 0x10]), "00 ff 10 ");
    }

    #[test]
    fn hex_dump_wraps_at_sixteen_bytes() {
        let bytes = [0u8; 17];
        let dump = hex_dump(&bytes);
        assert_eq!(dump.lines().count(), 2);
    }
}
