//! Byte-level reader with bounded operations.

use crate::error::{BufferError, BufferResult};

/// A byte-level reader for decoding protocol primitives.
///
/// All read operations are bounds-checked and return errors on failure.
/// The reader never panics on malformed input.
#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` from a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the number of bytes remaining to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> BufferResult<u8> {
        let bytes = self.take(1)?;
        Ok(bytes[0])
    }

    /// Reads a boolean byte; any value other than 0 or 1 is an error.
    pub fn read_bool(&mut self) -> BufferResult<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(BufferError::InvalidBool { value }),
        }
    }

    /// Reads a signed 16-bit integer, big-endian.
    pub fn read_i16(&mut self) -> BufferResult<i16> {
        Ok(i16::from_be_bytes(self.take_array::<2>()?))
    }

    /// Reads a signed 32-bit integer, big-endian.
    pub fn read_i32(&mut self) -> BufferResult<i32> {
        Ok(i32::from_be_bytes(self.take_array::<4>()?))
    }

    /// Reads a signed 64-bit integer, big-endian.
    pub fn read_i64(&mut self) -> BufferResult<i64> {
        Ok(i64::from_be_bytes(self.take_array::<8>()?))
    }

    /// Reads a 32-bit float, big-endian.
    pub fn read_f32(&mut self) -> BufferResult<f32> {
        Ok(f32::from_be_bytes(self.take_array::<4>()?))
    }

    /// Reads a 64-bit float, big-endian.
    pub fn read_f64(&mut self) -> BufferResult<f64> {
        Ok(f64::from_be_bytes(self.take_array::<8>()?))
    }

    /// Reads a UTF-8 string with a signed 16-bit length prefix.
    pub fn read_str(&mut self) -> BufferResult<String> {
        let length = self.read_i16()?;
        if length < 0 {
            return Err(BufferError::NegativeLength {
                length: i64::from(length),
            });
        }
        let bytes = self.take(length as usize)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| BufferError::InvalidUtf8)
    }

    /// Reads a byte array with a signed 32-bit length prefix.
    pub fn read_bytes(&mut self) -> BufferResult<Vec<u8>> {
        let length = self.read_i32()?;
        if length < 0 {
            return Err(BufferError::NegativeLength {
                length: i64::from(length),
            });
        }
        Ok(self.take(length as usize)?.to_vec())
    }

    /// Reads exactly `count` raw bytes without a length prefix.
    pub fn read_raw(&mut self, count: usize) -> BufferResult<&'a [u8]> {
        self.take(count)
    }

    fn take(&mut self, count: usize) -> BufferResult<&'a [u8]> {
        if count > self.remaining() {
            return Err(BufferError::UnexpectedEof {
                requested: count,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> BufferResult<[u8; N]> {
        let slice = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reader() {
        let reader = ByteReader::new(&[]);
        assert!(reader.is_empty());
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn read_from_empty_fails() {
        let mut reader = ByteReader::new(&[]);
        let err = reader.read_u8().unwrap_err();
        assert!(matches!(err, BufferError::UnexpectedEof { .. }));
    }

    #[test]
    fn read_i32_big_endian() {
        let mut reader = ByteReader::new(&[0x12, 0x34, 0x56, 0x78]);
        assert_eq!(reader.read_i32().unwrap(), 0x1234_5678);
        assert!(reader.is_empty());
    }

    #[test]
    fn read_i16_negative() {
        let mut reader = ByteReader::new(&[0xFF, 0xFE]);
        assert_eq!(reader.read_i16().unwrap(), -2);
    }

    #[test]
    fn read_i64() {
        let mut reader = ByteReader::new(&[0xFF; 8]);
        assert_eq!(reader.read_i64().unwrap(), -1);
    }

    #[test]
    fn read_bool_values() {
        let mut reader = ByteReader::new(&[0, 1, 2]);
        assert!(!reader.read_bool().unwrap());
        assert!(reader.read_bool().unwrap());
        let err = reader.read_bool().unwrap_err();
        assert_eq!(err, BufferError::InvalidBool { value: 2 });
    }

    #[test]
    fn read_f32_infinity() {
        let bytes = f32::INFINITY.to_be_bytes();
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_f32().unwrap(), f32::INFINITY);
    }

    #[test]
    fn read_f64_neg_infinity() {
        let bytes = f64::NEG_INFINITY.to_be_bytes();
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_f64().unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    fn read_str_exact_bytes() {
        let mut reader = ByteReader::new(&[0x00, 0x02, b'h', b'i', 0xEE]);
        assert_eq!(reader.read_str().unwrap(), "hi");
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn read_str_truncated_fails() {
        let mut reader = ByteReader::new(&[0x00, 0x05, b'h', b'i']);
        let err = reader.read_str().unwrap_err();
        assert_eq!(
            err,
            BufferError::UnexpectedEof {
                requested: 5,
                available: 2
            }
        );
    }

    #[test]
    fn read_str_negative_length_fails() {
        let mut reader = ByteReader::new(&[0xFF, 0xFF]);
        let err = reader.read_str().unwrap_err();
        assert_eq!(err, BufferError::NegativeLength { length: -1 });
    }

    #[test]
    fn read_str_invalid_utf8_fails() {
        let mut reader = ByteReader::new(&[0x00, 0x01, 0xFF]);
        let err = reader.read_str().unwrap_err();
        assert_eq!(err, BufferError::InvalidUtf8);
    }

    #[test]
    fn read_bytes_exact() {
        let mut reader = ByteReader::new(&[0, 0, 0, 3, 1, 2, 3, 4]);
        assert_eq!(reader.read_bytes().unwrap(), vec![1, 2, 3]);
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn read_bytes_negative_length_fails() {
        let mut reader = ByteReader::new(&[0xFF, 0xFF, 0xFF, 0xFF]);
        let err = reader.read_bytes().unwrap_err();
        assert_eq!(err, BufferError::NegativeLength { length: -1 });
    }

    #[test]
    fn read_bytes_truncated_fails() {
        let mut reader = ByteReader::new(&[0, 0, 0, 9, 1]);
        let err = reader.read_bytes().unwrap_err();
        assert!(matches!(err, BufferError::UnexpectedEof { .. }));
    }

    #[test]
    fn read_raw_advances() {
        let mut reader = ByteReader::new(&[1, 2, 3]);
        assert_eq!(reader.read_raw(2).unwrap(), &[1, 2]);
        assert_eq!(reader.position(), 2);
    }
}
