use byteorder::{BigEndian, ByteOrder};

use crate::BlockIssue;

/// Bounds-checked big-endian reader over a borrowed payload.
///
/// Every read that would run past the end of the buffer fails with a
/// [`BlockIssue::DecodeFailed`] naming the field, so decoders can use `?` and let
/// the block engine fall back to the raw bytes.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}
impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Borrows the next `len` bytes and advances past them.
    pub fn take(&mut self, len: usize, field: &str) -> Result<&'a [u8], BlockIssue> {
        if len > self.remaining() {
            return Err(BlockIssue::decode(format!(
                "{field}: needs {len} bytes at offset {}, {} available",
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Borrows everything left and moves to the end.
    pub fn rest(&mut self) -> &'a [u8] {
        let slice = &self.data[self.pos..];
        self.pos = self.data.len();
        slice
    }

    pub fn read_u8(&mut self, field: &str) -> Result<u8, BlockIssue> {
        Ok(self.take(1, field)?[0])
    }

    pub fn read_u32(&mut self, field: &str) -> Result<u32, BlockIssue> {
        Ok(BigEndian::read_u32(self.take(4, field)?))
    }

    pub fn read_array<const N: usize>(&mut self, field: &str) -> Result<[u8; N], BlockIssue> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N, field)?);
        Ok(array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_reads() {
        let data = [7u8, 0, 0, 1, 2, 0xAA, 0xBB, 0xCC];
        let mut cursor = Cursor::new(&data);
        assert_eq!(cursor.read_u8("tag").unwrap(), 7);
        assert_eq!(cursor.read_u32("len").unwrap(), 258);
        assert_eq!(cursor.position(), 5);
        assert_eq!(cursor.read_array::<2>("pair").unwrap(), [0xAA, 0xBB]);
        assert_eq!(cursor.rest(), &[0xCC]);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_overrun_names_field() {
        let data = [1u8, 2];
        let mut cursor = Cursor::new(&data);
        let err = cursor.read_u32("region length").unwrap_err();
        match err {
            BlockIssue::DecodeFailed(msg) => assert!(msg.contains("region length")),
            other => panic!("unexpected issue {other:?}"),
        }
        // failed reads do not advance
        assert_eq!(cursor.position(), 0);
    }
}
