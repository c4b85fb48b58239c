//! A sequential, bounds-checked cursor over an SSZ byte buffer.
//!
//! This is a raw reader: no alignment, no framing, no lookahead beyond the
//! next read. Every read either returns exactly the bytes it promised or
//! fails with [`CodecError::Truncated`].

use alloy_primitives::U256;

use super::error::CodecError;

/// A sequential cursor over an immutable byte buffer.
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Wraps `buf` in a reader starting at position 0.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current cursor position, in bytes from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the wrapped buffer.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// `true` if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// `true` if the cursor has consumed the entire buffer.
    pub fn is_complete(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// Reads the next `n` bytes, advancing the cursor.
    pub fn read_fixed(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let available = self.buf.len().saturating_sub(self.pos);
        if available < n {
            return Err(CodecError::Truncated {
                needed: n,
                available,
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Reads a 32-byte hash.
    pub fn read_hash(&mut self) -> Result<[u8; 32], CodecError> {
        let slice = self.read_fixed(32)?;
        let mut out = [0u8; 32];
        out.copy_from_slice(slice);
        Ok(out)
    }

    /// Reads a 20-byte address.
    pub fn read_address(&mut self) -> Result<[u8; 20], CodecError> {
        let slice = self.read_fixed(20)?;
        let mut out = [0u8; 20];
        out.copy_from_slice(slice);
        Ok(out)
    }

    /// Reads a little-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        let slice = self.read_fixed(4)?;
        let mut out = [0u8; 4];
        out.copy_from_slice(slice);
        Ok(u32::from_le_bytes(out))
    }

    /// Reads a little-endian `u64`.
    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        let slice = self.read_fixed(8)?;
        let mut out = [0u8; 8];
        out.copy_from_slice(slice);
        Ok(u64::from_le_bytes(out))
    }

    /// Reads a little-endian 256-bit unsigned integer.
    pub fn read_u256(&mut self) -> Result<U256, CodecError> {
        let slice = self.read_fixed(32)?;
        Ok(U256::from_le_slice(slice))
    }

    /// Returns the remaining, unconsumed bytes without advancing the cursor.
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_fixed_width_fields_in_order() {
        let buf = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let mut r = Reader::new(&buf);
        assert_eq!(r.read_fixed(3).unwrap(), &[1, 2, 3]);
        assert_eq!(r.position(), 3);
        assert_eq!(r.read_fixed(5).unwrap(), &[4, 5, 6, 7, 8]);
        assert!(r.is_complete());
    }

    #[test]
    fn rejects_reads_past_the_end() {
        let buf = [1u8, 2, 3];
        let mut r = Reader::new(&buf);
        let err = r.read_fixed(4).unwrap_err();
        assert_eq!(
            err,
            CodecError::Truncated {
                needed: 4,
                available: 3
            }
        );
    }

    #[test]
    fn decodes_little_endian_integers() {
        let buf = [0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let mut r = Reader::new(&buf);
        assert_eq!(r.read_u32().unwrap(), 1);
        assert_eq!(r.read_u64().unwrap(), 2);
    }

    #[test]
    fn decodes_u256_little_endian() {
        let mut buf = [0u8; 32];
        buf[0] = 0xff;
        buf[1] = 0x01;
        let mut r = Reader::new(&buf);
        assert_eq!(r.read_u256().unwrap(), U256::from(0x1ffu64));
    }

    #[test]
    fn is_complete_reflects_cursor_position() {
        let buf = [1u8, 2];
        let mut r = Reader::new(&buf);
        assert!(!r.is_complete());
        r.read_fixed(2).unwrap();
        assert!(r.is_complete());
    }
}
