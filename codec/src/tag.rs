//! One-byte type tags discriminating serialized values.

use crate::error::{CodecError, CodecResult};

/// First tag byte assignable to a custom type.
pub const CUSTOM_TAG_MIN: u8 = 50;

/// Last tag byte assignable to a custom type.
pub const CUSTOM_TAG_MAX: u8 = 254;

/// Reserved tag byte, never assigned.
pub const RESERVED_TAG: u8 = 255;

/// One-byte discriminator identifying how the following bytes decode.
///
/// Values 0-15 are reserved built-ins. Values 50-254 identify custom types
/// registered with a [`TypeRegistry`](crate::TypeRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Null,
    Byte,
    Bool,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    /// Array of one registered custom type; the element's tag follows.
    TypedArray,
    ByteArray,
    /// Heterogeneous array; every element carries its own tag.
    ObjectArray,
    /// A registered custom type identified by its assigned code.
    Custom(u8),
}

impl TypeTag {
    /// Parses a tag from a raw byte.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownTag`] for unassigned built-in values and
    /// the reserved byte 255.
    pub fn parse(tag: u8) -> CodecResult<Self> {
        match tag {
            0 => Ok(Self::Null),
            1 => Ok(Self::Byte),
            2 => Ok(Self::Bool),
            3 => Ok(Self::Short),
            4 => Ok(Self::Int),
            5 => Ok(Self::Long),
            6 => Ok(Self::Float),
            7 => Ok(Self::Double),
            8 => Ok(Self::String),
            10 => Ok(Self::TypedArray),
            11 => Ok(Self::ByteArray),
            15 => Ok(Self::ObjectArray),
            CUSTOM_TAG_MIN..=CUSTOM_TAG_MAX => Ok(Self::Custom(tag)),
            _ => Err(CodecError::UnknownTag { tag }),
        }
    }

    /// Returns the raw tag byte.
    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Byte => 1,
            Self::Bool => 2,
            Self::Short => 3,
            Self::Int => 4,
            Self::Long => 5,
            Self::Float => 6,
            Self::Double => 7,
            Self::String => 8,
            Self::TypedArray => 10,
            Self::ByteArray => 11,
            Self::ObjectArray => 15,
            Self::Custom(code) => code,
        }
    }
}
