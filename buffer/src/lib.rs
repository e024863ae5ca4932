//! Big-endian byte buffer primitives for the tagnet protocol.
//!
//! This crate provides [`ByteWriter`] and [`ByteReader`] for encoding and
//! decoding the protocol's fixed primitive set: bool, byte, short, int,
//! long, float, double, length-prefixed UTF-8 strings and length-prefixed
//! byte arrays. All multi-byte values are written in network byte order
//! (big-endian) regardless of host endianness.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked; reading past the
//!   end of a buffer is an error, never a silent zero fill.
//! - **No domain knowledge** - This crate knows nothing about type tags,
//!   entities, or players.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use buffer::{ByteWriter, ByteReader};
//!
//! let mut writer = ByteWriter::new();
//! writer.write_i32(-7);
//! writer.write_str("héllo").unwrap();
//!
//! let bytes = writer.finish();
//!
//! let mut reader = ByteReader::new(&bytes);
//! assert_eq!(reader.read_i32().unwrap(), -7);
//! assert_eq!(reader.read_str().unwrap(), "héllo");
//! ```

mod error;
mod reader;
mod writer;

pub use error::{BufferError, BufferResult};
pub use reader::ByteReader;
pub use writer::ByteWriter;

/// Maximum UTF-8 byte length of an encoded string.
///
/// Strings carry a signed 16-bit length prefix, so the byte length must fit
/// in `i16`.
pub const MAX_STRING_BYTES: usize = i16::MAX as usize;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roundtrip() {
        let writer = ByteWriter::new();
        let bytes = writer.finish();
        assert!(bytes.is_empty());

        let reader = ByteReader::new(&bytes);
        assert!(reader.is_empty());
    }

    #[test]
    fn mixed_roundtrip() {
        let mut writer = ByteWriter::new();
        writer.write_bool(true);
        writer.write_u8(0xAB);
        writer.write_i16(-300);
        writer.write_i32(1_000_000);
        writer.write_i64(-9_000_000_000);
        writer.write_f32(1.5);
        writer.write_f64(-2.25);
        writer.write_str("päyload").unwrap();
        writer.write_bytes(&[9, 8, 7]).unwrap();
        let bytes = writer.finish();

        let mut reader = ByteReader::new(&bytes);
        assert!(reader.read_bool().unwrap());
        assert_eq!(reader.read_u8().unwrap(), 0xAB);
        assert_eq!(reader.read_i16().unwrap(), -300);
        assert_eq!(reader.read_i32().unwrap(), 1_000_000);
        assert_eq!(reader.read_i64().unwrap(), -9_000_000_000);
        assert_eq!(reader.read_f32().unwrap(), 1.5);
        assert_eq!(reader.read_f64().unwrap(), -2.25);
        assert_eq!(reader.read_str().unwrap(), "päyload");
        assert_eq!(reader.read_bytes().unwrap(), vec![9, 8, 7]);
        assert!(reader.is_empty());
    }

    #[test]
    fn doctest_example() {
        let mut writer = ByteWriter::new();
        writer.write_i32(-7);
        writer.write_str("héllo").unwrap();

        let bytes = writer.finish();

        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_i32().unwrap(), -7);
        assert_eq!(reader.read_str().unwrap(), "héllo");
    }

    #[test]
    fn max_string_bytes_matches_prefix_width() {
        assert_eq!(MAX_STRING_BYTES, 32767);
    }
}
