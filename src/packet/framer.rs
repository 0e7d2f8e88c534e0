//! Packet framer
//!
//! Request layout:
//! ```text
//! version        u16
//! header count   u16
//! headers        name (counted) | must-understand u8 | length u32 | value
//! body count     u16
//! bodies         method (counted) | request id (counted) | length u32 | payload
//! ```
//!
//! Reply layout:
//! ```text
//! 00 00 00 00    version, client id, header count
//! reply count    u16
//! replies        target (counted) | response (counted) | ff ff ff ff | value
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use super::message::{Body, HeaderBlock, Packet};
use crate::amf::codec::{put_counted_string, PacketReader};
use crate::amf::encoder::ValueEncoder;
use crate::amf::value::Value;
use crate::error::PacketError;

/// Fixed reply preamble: version, client id and header count, all zero
pub const REPLY_PREAMBLE: [u8; 4] = [0x00; 4];

/// Placeholder length written in reply frames; clients do not check it
pub const UNKNOWN_LENGTH: [u8; 4] = [0xFF; 4];

/// Response slot written in reply frames
pub const NULL_RESPONSE: &str = "null";

/// Parse a raw request packet
///
/// Headers are skipped by their declared length. Bodies are read while the
/// declared count and the input both last; a body cut off part way through
/// fails with [`PacketError::Truncated`].
pub fn parse_packet(buf: &[u8]) -> Result<Packet, PacketError> {
    let mut reader = PacketReader::new(Bytes::copy_from_slice(buf));

    let version = reader.read_short()?;

    let header_count = reader.read_short()?;
    let mut headers = Vec::with_capacity(header_count.min(64) as usize);
    for _ in 0..header_count {
        headers.push(read_header(&mut reader)?);
    }

    let declared_bodies = reader.read_short()?;
    let mut bodies = Vec::with_capacity(declared_bodies.min(64) as usize);
    while bodies.len() < declared_bodies as usize && !reader.is_empty() {
        bodies.push(read_body(&mut reader)?);
    }

    Ok(Packet {
        version,
        headers,
        bodies,
        declared_bodies,
    })
}

fn read_header(reader: &mut PacketReader) -> Result<HeaderBlock, PacketError> {
    let name = reader.read_counted_string()?;
    let must_understand = reader.read_u8()? != 0;
    let length = reader.read_long()?;
    let value = reader.read_bytes(length as usize)?;
    Ok(HeaderBlock {
        name,
        must_understand,
        length,
        value,
    })
}

fn read_body(reader: &mut PacketReader) -> Result<Body, PacketError> {
    let method = reader.read_counted_string()?;
    let request_id = reader.read_counted_string()?;
    let length = reader.read_long()?;
    let payload = reader.read_bytes(length as usize)?;
    Ok(Body {
        method,
        request_id,
        length,
        payload,
    })
}

/// Append one reply frame to `buf`
pub fn put_reply_frame(buf: &mut BytesMut, target: &str, response: &str, value: &Value) {
    put_counted_string(buf, target);
    put_counted_string(buf, response);
    buf.put_slice(&UNKNOWN_LENGTH);

    let mut encoder = ValueEncoder::new();
    encoder.encode(value);
    buf.put_slice(&encoder.finish());
}

/// Encode one reply frame
pub fn encode_reply_frame(target: &str, response: &str, value: &Value) -> Bytes {
    let mut buf = BytesMut::with_capacity(64);
    put_reply_frame(&mut buf, target, response, value);
    buf.freeze()
}

/// Assemble the outer reply packet around already-encoded reply frames
pub fn build_reply_packet(replies: &[u8], count: u16) -> Bytes {
    let mut buf = BytesMut::with_capacity(REPLY_PREAMBLE.len() + 2 + replies.len());
    buf.put_slice(&REPLY_PREAMBLE);
    buf.put_u16(count);
    buf.put_slice(replies);
    buf.freeze()
}

/// Encode a request packet
///
/// Used by clients and tests; the gateway itself only parses requests.
pub fn build_request_packet(headers: &[HeaderBlock], bodies: &[Body]) -> Bytes {
    let mut buf = BytesMut::with_capacity(256);
    buf.put_u16(0);
    buf.put_u16(headers.len() as u16);
    for header in headers {
        put_counted_string(&mut buf, &header.name);
        buf.put_u8(header.must_understand as u8);
        buf.put_u32(header.value.len() as u32);
        buf.put_slice(&header.value);
    }
    buf.put_u16(bodies.len() as u16);
    for body in bodies {
        put_counted_string(&mut buf, &body.method);
        put_counted_string(&mut buf, &body.request_id);
        buf.put_u32(body.payload.len() as u32);
        buf.put_slice(&body.payload);
    }
    buf.freeze()
}
