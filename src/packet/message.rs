//! Remoting packet units

use bytes::Bytes;

/// Request ids that mean "no reply expected"
const NO_REPLY_IDS: [&str; 3] = ["/", "", "null"];

/// Out-of-band header block
///
/// Consumed by its declared length to keep the body framing aligned. The
/// value region is kept as raw bytes and never interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBlock {
    pub name: String,
    pub must_understand: bool,
    pub length: u32,
    pub value: Bytes,
}

/// One RPC invocation (or reply) inside a packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    /// Target method name
    pub method: String,
    /// Caller-supplied response address, e.g. "/1"
    pub request_id: String,
    /// Declared payload length
    pub length: u32,
    /// Encoded argument payload
    pub payload: Bytes,
}

impl Body {
    /// Whether the caller addressed this body for a reply
    pub fn expects_reply(&self) -> bool {
        expects_reply(&self.request_id)
    }
}

/// Check a request id against the no-reply sentinels `/`, `""` and `null`
pub fn expects_reply(request_id: &str) -> bool {
    !NO_REPLY_IDS.contains(&request_id)
}

/// A parsed request packet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packet {
    pub version: u16,
    pub headers: Vec<HeaderBlock>,
    pub bodies: Vec<Body>,
    /// Body count declared in the packet, which may exceed `bodies.len()`
    /// when the input ends early
    pub declared_bodies: u16,
}
