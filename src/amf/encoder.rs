//! AMF0 value encoder
//!
//! Encodes [`Value`]s into tagged AMF0 bytes. Containers become ECMA
//! arrays and recurse into their entries; nesting depth is bounded only by
//! the value being encoded.

use bytes::{BufMut, Bytes, BytesMut};

use super::codec::put_counted_string;
use super::marker::{TypeMarker, OBJECT_END};
use super::value::Value;

/// AMF0 encoder
pub struct ValueEncoder {
    buf: BytesMut,
}

impl ValueEncoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(256),
        }
    }

    /// Create encoder with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Get the encoded bytes and reset encoder
    pub fn finish(&mut self) -> Bytes {
        self.buf.split().freeze()
    }

    /// Encode a single value
    pub fn encode(&mut self, value: &Value) {
        match value {
            Value::String(s) => {
                self.buf.put_u8(TypeMarker::String.as_u8());
                put_counted_string(&mut self.buf, s);
            }
            Value::Container(entries) => {
                // Count is the number of entries emitted, not the highest
                // integer key.
                self.buf.put_u8(TypeMarker::EcmaArray.as_u8());
                self.buf.put_u32(entries.len() as u32);
                for (key, val) in entries {
                    put_counted_string(&mut self.buf, key);
                    self.encode(val);
                }
                self.buf.put_slice(&OBJECT_END);
            }
            Value::Raw(bytes) => {
                self.buf.put_slice(bytes);
            }
        }
    }
}

impl Default for ValueEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to encode a single value
pub fn encode_value(value: &Value) -> Bytes {
    let mut encoder = ValueEncoder::new();
    encoder.encode(value);
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amf::codec::read_long;

    #[test]
    fn test_encode_string() {
        let encoded = encode_value(&Value::from("hi"));
        assert_eq!(&encoded[..], &[0x02, 0x00, 0x02, b'h', b'i']);
    }

    #[test]
    fn test_encode_empty_string() {
        let encoded = encode_value(&Value::from(""));
        assert_eq!(&encoded[..], &[0x02, 0x00, 0x00]);
    }

    #[test]
    fn test_encode_raw_is_verbatim() {
        let raw = Bytes::from_static(&[0x05, 0x01, 0x01]);
        let encoded = encode_value(&Value::Raw(raw.clone()));
        assert_eq!(encoded, raw);
    }

    #[test]
    fn test_encode_container() {
        let value = Value::container([("a", 1), ("b", 2)]);
        let encoded = encode_value(&value);

        #[rustfmt::skip]
        let expected: &[u8] = &[
            0x08, 0x00, 0x00, 0x00, 0x02,
            0x00, 0x01, b'a', 0x02, 0x00, 0x01, b'1',
            0x00, 0x01, b'b', 0x02, 0x00, 0x01, b'2',
            0x00, 0x00, 0x09,
        ];
        assert_eq!(&encoded[..], expected);
    }

    #[test]
    fn test_encode_empty_container() {
        let encoded = encode_value(&Value::Container(Vec::new()));
        assert_eq!(&encoded[..], &[0x08, 0, 0, 0, 0, 0x00, 0x00, 0x09]);
    }

    #[test]
    fn test_encode_nested_container() {
        let inner = Value::list(["x"]);
        let outer = Value::container([("inner", inner)]);
        let encoded = encode_value(&outer);

        assert_eq!(encoded[0], 0x08);
        assert_eq!(read_long(&encoded, 1).unwrap(), 1);
        // key "inner" then the nested array marker
        assert_eq!(&encoded[5..12], &[0x00, 0x05, b'i', b'n', b'n', b'e', b'r']);
        assert_eq!(encoded[12], 0x08);
        // two end markers close inner and outer
        assert_eq!(&encoded[encoded.len() - 6..], &[0, 0, 9, 0, 0, 9]);
    }

    #[test]
    fn test_encode_raw_inside_container() {
        let value = Value::container([("unsent", Value::Raw(Bytes::from_static(&[0x05])))]);
        let encoded = encode_value(&value);
        assert_eq!(
            &encoded[..],
            &[0x08, 0, 0, 0, 1, 0x00, 0x06, b'u', b'n', b's', b'e', b'n', b't', 0x05, 0, 0, 9]
        );
    }

    #[test]
    fn test_encoder_finish_resets() {
        let mut encoder = ValueEncoder::with_capacity(16);
        encoder.encode(&Value::from("a"));
        let first = encoder.finish();
        assert_eq!(first.len(), 4);
        assert!(encoder.finish().is_empty());
    }
}
