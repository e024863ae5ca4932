//! Error types for buffer operations.

use std::fmt;

/// Result type for buffer operations.
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during byte-level encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    UnexpectedEof {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// String UTF-8 byte length exceeds the signed 16-bit length prefix.
    StringTooLong {
        /// The UTF-8 byte length of the offending string.
        length: usize,
    },

    /// Byte-array length exceeds the signed 32-bit length prefix.
    ArrayTooLong {
        /// The byte length of the offending array.
        length: usize,
    },

    /// A decoded length prefix was negative.
    NegativeLength {
        /// The decoded prefix value.
        length: i64,
    },

    /// Decoded string bytes were not valid UTF-8.
    InvalidUtf8,

    /// A decoded boolean byte was neither 0 nor 1.
    InvalidBool {
        /// The offending byte.
        value: u8,
    },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bytes but only {available} bytes available"
                )
            }
            Self::StringTooLong { length } => {
                write!(
                    f,
                    "string of {length} UTF-8 bytes exceeds the 32767-byte limit"
                )
            }
            Self::ArrayTooLong { length } => {
                write!(f, "byte array of {length} bytes exceeds the i32 limit")
            }
            Self::NegativeLength { length } => {
                write!(f, "decoded negative length prefix {length}")
            }
            Self::InvalidUtf8 => write!(f, "decoded string bytes are not valid UTF-8"),
            Self::InvalidBool { value } => {
                write!(f, "decoded boolean byte {value} is neither 0 nor 1")
            }
        }
    }
}

impl std::error::Error for BufferError {}
