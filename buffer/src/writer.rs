//! Byte-level writer producing network byte order output.

use crate::error::{BufferError, BufferResult};
use crate::MAX_STRING_BYTES;

/// A byte-level writer for encoding protocol primitives.
///
/// All multi-byte values are written big-endian. Writes are accumulated in
/// an internal growable buffer; call [`finish`](Self::finish) to take the
/// final bytes, or [`clear`](Self::clear) to reuse the writer as scratch.
#[derive(Debug, Default)]
pub struct ByteWriter {
    bytes: Vec<u8>,
}

impl ByteWriter {
    /// Creates a new empty `ByteWriter`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `ByteWriter` with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
        }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the written bytes without consuming the writer.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Clears the writer for reuse, keeping its allocation.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Writes a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    /// Writes a boolean as a single byte (1 for true, 0 for false).
    pub fn write_bool(&mut self, value: bool) {
        self.bytes.push(u8::from(value));
    }

    /// Writes a signed 16-bit integer, big-endian.
    pub fn write_i16(&mut self, value: i16) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes a signed 32-bit integer, big-endian.
    pub fn write_i32(&mut self, value: i32) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes a signed 64-bit integer, big-endian.
    pub fn write_i64(&mut self, value: i64) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes a 32-bit float, big-endian.
    pub fn write_f32(&mut self, value: f32) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes a 64-bit float, big-endian.
    pub fn write_f64(&mut self, value: f64) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes a UTF-8 string with a signed 16-bit length prefix.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::StringTooLong`] if the UTF-8 byte length
    /// exceeds [`MAX_STRING_BYTES`].
    pub fn write_str(&mut self, value: &str) -> BufferResult<()> {
        let utf8 = value.as_bytes();
        if utf8.len() > MAX_STRING_BYTES {
            return Err(BufferError::StringTooLong { length: utf8.len() });
        }
        // Length fits in i16 after the check above.
        self.write_i16(utf8.len() as i16);
        self.bytes.extend_from_slice(utf8);
        Ok(())
    }

    /// Writes a byte array with a signed 32-bit length prefix.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::ArrayTooLong`] if the length exceeds `i32::MAX`.
    pub fn write_bytes(&mut self, value: &[u8]) -> BufferResult<()> {
        let length =
            i32::try_from(value.len()).map_err(|_| BufferError::ArrayTooLong {
                length: value.len(),
            })?;
        self.write_i32(length);
        self.bytes.extend_from_slice(value);
        Ok(())
    }

    /// Appends raw bytes without a length prefix.
    pub fn write_raw(&mut self, value: &[u8]) {
        self.bytes.extend_from_slice(value);
    }

    /// Finishes writing and returns the byte buffer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_writer() {
        let writer = ByteWriter::new();
        assert_eq!(writer.len(), 0);
        assert!(writer.is_empty());
        assert!(writer.finish().is_empty());
    }

    #[test]
    fn write_u8_bytes() {
        let mut writer = ByteWriter::new();
        writer.write_u8(0x12);
        writer.write_u8(0xFF);
        assert_eq!(writer.finish(), vec![0x12, 0xFF]);
    }

    #[test]
    fn write_bool_bytes() {
        let mut writer = ByteWriter::new();
        writer.write_bool(true);
        writer.write_bool(false);
        assert_eq!(writer.finish(), vec![1, 0]);
    }

    #[test]
    fn write_i16_big_endian() {
        let mut writer = ByteWriter::new();
        writer.write_i16(0x1234);
        assert_eq!(writer.finish(), vec![0x12, 0x34]);
    }

    #[test]
    fn write_i16_negative() {
        let mut writer = ByteWriter::new();
        writer.write_i16(-2);
        assert_eq!(writer.finish(), vec![0xFF, 0xFE]);
    }

    #[test]
    fn write_i32_big_endian() {
        let mut writer = ByteWriter::new();
        writer.write_i32(0x1234_5678);
        assert_eq!(writer.finish(), vec![0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn write_i64_big_endian() {
        let mut writer = ByteWriter::new();
        writer.write_i64(0x0102_0304_0506_0708);
        assert_eq!(writer.finish(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn write_f32_big_endian() {
        let mut writer = ByteWriter::new();
        writer.write_f32(1.0);
        assert_eq!(writer.finish(), vec![0x3F, 0x80, 0x00, 0x00]);
    }

    #[test]
    fn write_f64_big_endian() {
        let mut writer = ByteWriter::new();
        writer.write_f64(1.0);
        assert_eq!(
            writer.finish(),
            vec![0x3F, 0xF0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn write_str_prefix_and_bytes() {
        let mut writer = ByteWriter::new();
        writer.write_str("ab").unwrap();
        assert_eq!(writer.finish(), vec![0x00, 0x02, b'a', b'b']);
    }

    #[test]
    fn write_str_multibyte_utf8_counts_bytes() {
        let mut writer = ByteWriter::new();
        // é is two UTF-8 bytes
        writer.write_str("é").unwrap();
        assert_eq!(writer.finish(), vec![0x00, 0x02, 0xC3, 0xA9]);
    }

    #[test]
    fn write_str_at_limit_succeeds() {
        let value = "a".repeat(MAX_STRING_BYTES);
        let mut writer = ByteWriter::new();
        writer.write_str(&value).unwrap();
        assert_eq!(writer.len(), 2 + MAX_STRING_BYTES);
    }

    #[test]
    fn write_str_over_limit_fails() {
        let value = "a".repeat(MAX_STRING_BYTES + 1);
        let mut writer = ByteWriter::new();
        let err = writer.write_str(&value).unwrap_err();
        assert_eq!(
            err,
            BufferError::StringTooLong {
                length: MAX_STRING_BYTES + 1
            }
        );
    }

    #[test]
    fn write_bytes_prefix_and_payload() {
        let mut writer = ByteWriter::new();
        writer.write_bytes(&[0xAA, 0xBB]).unwrap();
        assert_eq!(writer.finish(), vec![0, 0, 0, 2, 0xAA, 0xBB]);
    }

    #[test]
    fn write_raw_has_no_prefix() {
        let mut writer = ByteWriter::new();
        writer.write_raw(&[1, 2, 3]);
        assert_eq!(writer.finish(), vec![1, 2, 3]);
    }

    #[test]
    fn clear_resets_for_reuse() {
        let mut writer = ByteWriter::new();
        writer.write_i32(42);
        writer.clear();
        assert!(writer.is_empty());
        writer.write_u8(1);
        assert_eq!(writer.as_slice(), &[1]);
    }

    #[test]
    fn with_capacity_starts_empty() {
        let writer = ByteWriter::with_capacity(64);
        assert!(writer.is_empty());
    }
}
