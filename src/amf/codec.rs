//! Primitive codec
//!
//! Big-endian integers and counted strings, the building blocks of the
//! remoting packet. Counted strings are a 16-bit length prefix followed by
//! the raw bytes, without a type marker.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::PacketError;

/// Longest string a 16-bit length prefix can describe
pub const MAX_COUNTED_STRING: usize = 0xFFFF;

/// Bounds-checked cursor over a packet buffer
///
/// Every read either returns the requested field and advances, or fails
/// with [`PacketError::Truncated`] and leaves the cursor untouched.
#[derive(Debug, Clone)]
pub struct PacketReader {
    buf: Bytes,
    total: usize,
}

impl PacketReader {
    /// Create a reader positioned at the start of `buf`
    pub fn new(buf: Bytes) -> Self {
        let total = buf.len();
        Self { buf, total }
    }

    /// Offset of the next unread byte
    pub fn position(&self) -> usize {
        self.total - self.buf.remaining()
    }

    /// Check whether every byte has been consumed
    pub fn is_empty(&self) -> bool {
        !self.buf.has_remaining()
    }

    fn ensure(&self, needed: usize) -> Result<(), PacketError> {
        if self.buf.remaining() < needed {
            return Err(PacketError::Truncated {
                offset: self.position(),
                needed,
                available: self.buf.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, PacketError> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    /// Read a 16-bit big-endian integer
    pub fn read_short(&mut self) -> Result<u16, PacketError> {
        self.ensure(2)?;
        Ok(self.buf.get_u16())
    }

    /// Read a 32-bit big-endian integer
    pub fn read_long(&mut self) -> Result<u32, PacketError> {
        self.ensure(4)?;
        Ok(self.buf.get_u32())
    }

    /// Read `len` bytes as a zero-copy slice of the underlying buffer
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes, PacketError> {
        self.ensure(len)?;
        Ok(self.buf.copy_to_bytes(len))
    }

    /// Read a counted string (16-bit length, then bytes)
    ///
    /// Invalid UTF-8 is replaced rather than rejected: names are carried
    /// through to the reply, never interpreted.
    pub fn read_counted_string(&mut self) -> Result<String, PacketError> {
        self.ensure(2)?;
        let len = u16::from_be_bytes([self.buf[0], self.buf[1]]) as usize;
        if self.buf.remaining() < 2 + len {
            return Err(PacketError::Truncated {
                offset: self.position() + 2,
                needed: len,
                available: self.buf.remaining() - 2,
            });
        }
        self.buf.advance(2);
        let raw = self.buf.copy_to_bytes(len);
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }
}

/// Read a 16-bit big-endian integer at `offset`
pub fn read_short(buf: &[u8], offset: usize) -> Result<u16, PacketError> {
    match buf.get(offset..offset.saturating_add(2)) {
        Some(b) if b.len() == 2 => Ok(u16::from_be_bytes([b[0], b[1]])),
        _ => Err(truncated_at(buf, offset, 2)),
    }
}

/// Read a 32-bit big-endian integer at `offset`
pub fn read_long(buf: &[u8], offset: usize) -> Result<u32, PacketError> {
    match buf.get(offset..offset.saturating_add(4)) {
        Some(b) if b.len() == 4 => Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]])),
        _ => Err(truncated_at(buf, offset, 4)),
    }
}

/// Read a counted string at `offset`, returning it with the offset just past it
pub fn read_counted_string(buf: &[u8], offset: usize) -> Result<(String, usize), PacketError> {
    let len = read_short(buf, offset)? as usize;
    let start = offset + 2;
    match buf.get(start..start + len) {
        Some(b) => Ok((String::from_utf8_lossy(b).into_owned(), start + len)),
        None => Err(truncated_at(buf, start, len)),
    }
}

fn truncated_at(buf: &[u8], offset: usize, needed: usize) -> PacketError {
    PacketError::Truncated {
        offset,
        needed,
        available: buf.len().saturating_sub(offset),
    }
}

/// Encode the low 32 bits of `n` big-endian
pub fn write_long(n: u64) -> [u8; 4] {
    ((n & 0xFFFF_FFFF) as u32).to_be_bytes()
}

/// Append a counted string to `buf`
///
/// Strings over 65535 bytes are cut to 65535 bytes so the length field
/// still describes what follows it.
pub fn put_counted_string(buf: &mut BytesMut, s: &str) {
    let len = s.len().min(MAX_COUNTED_STRING);
    buf.put_u16(len as u16);
    buf.put_slice(&s.as_bytes()[..len]);
}

/// Encode a counted string into a fresh buffer
pub fn counted_string(s: &str) -> Bytes {
    let mut buf = BytesMut::with_capacity(2 + s.len().min(MAX_COUNTED_STRING));
    put_counted_string(&mut buf, s);
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_short_and_long() {
        let buf = [0x12, 0x34, 0xDE, 0xAD, 0xBE, 0xEF];
        assert_eq!(read_short(&buf, 0).unwrap(), 0x1234);
        assert_eq!(read_long(&buf, 2).unwrap(), 0xDEADBEEF);
    }

    #[test]
    fn test_read_out_of_bounds() {
        let buf = [0x00, 0x01, 0x02];
        assert_eq!(
            read_short(&buf, 2),
            Err(PacketError::Truncated {
                offset: 2,
                needed: 2,
                available: 1
            })
        );
        assert!(read_long(&buf, 0).is_err());
        assert!(read_short(&buf, 10).is_err());
        assert!(read_long(&buf, usize::MAX).is_err());
    }

    #[test]
    fn test_write_long_masks_to_32_bits() {
        assert_eq!(write_long(1), [0, 0, 0, 1]);
        assert_eq!(write_long(0xFFFF_FFFF), [0xFF; 4]);
        assert_eq!(write_long(0x1_0000_0002), [0, 0, 0, 2]);
        assert_eq!(write_long(-1i64 as u64), [0xFF; 4]);
    }

    #[test]
    fn test_long_roundtrip() {
        for n in [0u32, 1, 0x7F, 0x8000_0000, 0xDEAD_BEEF, u32::MAX] {
            assert_eq!(read_long(&write_long(n as u64), 0).unwrap(), n);
        }
    }

    #[test]
    fn test_counted_string_roundtrip() {
        for s in ["", "echo", "/1/onResult", "héllo wörld"] {
            let encoded = counted_string(s);
            let (decoded, next) = read_counted_string(&encoded, 0).unwrap();
            assert_eq!(decoded, s);
            assert_eq!(next, encoded.len());
        }
    }

    #[test]
    fn test_counted_string_at_limit() {
        let s = "a".repeat(MAX_COUNTED_STRING);
        let encoded = counted_string(&s);
        assert_eq!(&encoded[..2], &[0xFF, 0xFF]);
        let (decoded, _) = read_counted_string(&encoded, 0).unwrap();
        assert_eq!(decoded, s);
    }

    #[test]
    fn test_counted_string_over_limit_stays_framed() {
        let s = "b".repeat(MAX_COUNTED_STRING + 10);
        let encoded = counted_string(&s);
        assert_eq!(encoded.len(), 2 + MAX_COUNTED_STRING);
    }

    #[test]
    fn test_counted_string_truncated() {
        // Declares 5 bytes, carries 2
        let buf = [0x00, 0x05, b'h', b'i'];
        assert_eq!(
            read_counted_string(&buf, 0),
            Err(PacketError::Truncated {
                offset: 2,
                needed: 5,
                available: 2
            })
        );
    }

    #[test]
    fn test_reader_advances() {
        let mut buf = BytesMut::new();
        buf.put_u16(3);
        put_counted_string(&mut buf, "echo");
        buf.put_u32(7);
        buf.put_u8(0x0a);

        let mut reader = PacketReader::new(buf.freeze());
        assert_eq!(reader.read_short().unwrap(), 3);
        assert_eq!(reader.position(), 2);
        assert_eq!(reader.read_counted_string().unwrap(), "echo");
        assert_eq!(reader.read_long().unwrap(), 7);
        assert_eq!(reader.read_u8().unwrap(), 0x0a);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_reader_failure_does_not_advance() {
        let mut reader = PacketReader::new(Bytes::from_static(&[0x00, 0x09, b'x']));
        let err = reader.read_counted_string().unwrap_err();
        assert_eq!(
            err,
            PacketError::Truncated {
                offset: 2,
                needed: 9,
                available: 1
            }
        );
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_short().unwrap(), 9);
        assert!(reader.read_long().is_err());
        assert!(reader.read_bytes(2).is_err());
        assert_eq!(&reader.read_bytes(1).unwrap()[..], b"x");
    }

    #[test]
    fn test_reader_lossy_utf8() {
        let mut reader = PacketReader::new(Bytes::from_static(&[0x00, 0x02, 0xFF, b'a']));
        let s = reader.read_counted_string().unwrap();
        assert!(s.ends_with('a'));
    }
}
