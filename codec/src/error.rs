//! Error types for codec operations.

use std::fmt;

use buffer::BufferError;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during tagged (de)serialization and registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Underlying buffer error.
    Buffer(BufferError),

    /// Decoded a tag byte with no assigned meaning.
    UnknownTag {
        /// The offending tag byte.
        tag: u8,
    },

    /// Attempted to serialize a value whose type has no registration.
    UnknownType {
        /// Name of the offending type.
        type_name: &'static str,
    },

    /// The type is already registered under another code.
    TypeAlreadyRegistered {
        /// Name of the offending type.
        type_name: &'static str,
        /// The code it is already registered under.
        code: u8,
    },

    /// The explicit code is already assigned to another type.
    CodeInUse {
        /// The contested code.
        code: u8,
        /// Name of the type currently holding the code.
        type_name: &'static str,
    },

    /// The explicit code lies outside the custom tag range.
    CodeOutOfRange {
        /// The offending code.
        code: u8,
    },

    /// The custom tag space (50..=254) is exhausted.
    RegistrationFull,

    /// A message had bytes left over after its value was decoded.
    TrailingBytes {
        /// Number of unread bytes.
        remaining: usize,
    },

    /// An element count on the wire was negative.
    NegativeCount {
        /// The decoded count.
        count: i32,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffer(err) => write!(f, "buffer error: {err}"),
            Self::UnknownTag { tag } => write!(f, "unknown type tag {tag}"),
            Self::UnknownType { type_name } => {
                write!(f, "type {type_name} has no registration")
            }
            Self::TypeAlreadyRegistered { type_name, code } => {
                write!(f, "type {type_name} is already registered under code {code}")
            }
            Self::CodeInUse { code, type_name } => {
                write!(f, "code {code} is already assigned to type {type_name}")
            }
            Self::CodeOutOfRange { code } => {
                write!(f, "code {code} is outside the custom tag range 50..=254")
            }
            Self::RegistrationFull => {
                write!(f, "too many custom types: tag space 50..=254 exhausted")
            }
            Self::TrailingBytes { remaining } => {
                write!(f, "{remaining} trailing bytes after decoded value")
            }
            Self::NegativeCount { count } => {
                write!(f, "decoded negative element count {count}")
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Buffer(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BufferError> for CodecError {
    fn from(err: BufferError) -> Self {
        Self::Buffer(err)
    }
}
