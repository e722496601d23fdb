//! A dedicated error for all possible errors in DNS queries: I/O, DNS packet
//! inconsistencies, etc.
use std::io;
use std::str;

/// The error kinds the resolver distinguishes internally. A caller of
/// [`crate::resolve`] only ever sees `Err(DNSError)` as an opaque failure —
/// these variants exist for logging and for the test suite, not for callers
/// to branch on (see spec §7's propagation policy).
#[derive(Debug)]
pub enum DNSError {
    /// A hostname had an empty label, an over-long label, or encoded to
    /// more than 255 octets.
    EncodeInvalid(String),
    /// A scratch buffer (encoded name, decompressed name, packet) would
    /// have overflowed.
    BufferTooSmall,
    /// Socket creation, send or receive failed, including timeouts.
    Socket(io::Error),
    /// A record walk ran past the packet bounds, or a compression pointer
    /// looped or ran off the end of the packet.
    MalformedResponse(&'static str),
    /// The authoritative response had no usable A record, referral or
    /// CNAME to continue on.
    NoAnswer,
    /// Recursion reached `DEPTH_LIMIT`.
    DepthExceeded,
    /// A label or character-string in a received packet was not valid
    /// UTF-8.
    Utf8(str::Utf8Error),
}

/// A specific custom `Result` for all functions
pub type DNSResult<T> = Result<T, DNSError>;

impl std::fmt::Display for DNSError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DNSError::EncodeInvalid(reason) => write!(f, "invalid hostname: {}", reason),
            DNSError::BufferTooSmall => write!(f, "scratch buffer too small"),
            DNSError::Socket(e) => write!(f, "socket error: {}", e),
            DNSError::MalformedResponse(reason) => write!(f, "malformed response: {}", reason),
            DNSError::NoAnswer => write!(f, "no usable answer, referral or alias"),
            DNSError::DepthExceeded => write!(f, "depth limit exceeded"),
            DNSError::Utf8(e) => write!(f, "invalid utf8 in packet: {}", e),
        }
    }
}

impl std::error::Error for DNSError {}

// All conversions for internal errors for DNSError
impl From<io::Error> for DNSError {
    fn from(err: io::Error) -> Self {
        DNSError::Socket(err)
    }
}

impl From<str::Utf8Error> for DNSError {
    fn from(err: str::Utf8Error) -> Self {
        DNSError::Utf8(err)
    }
}
