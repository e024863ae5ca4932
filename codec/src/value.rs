//! Polymorphic values and the custom type traits.

use std::any::{Any, TypeId};
use std::fmt;

use buffer::{ByteReader, ByteWriter};

use crate::error::CodecResult;

/// A user-defined type serializable under a registered tag.
///
/// Implementations must be a pure function of current value: encoding the
/// same state twice must produce identical bytes, since the replication
/// layer's change detection compares serialized output byte-for-byte.
pub trait CustomType: Any + fmt::Debug + Clone + PartialEq + Sized {
    /// Encodes the payload (without the tag byte).
    fn encode(&self, out: &mut ByteWriter) -> CodecResult<()>;

    /// Decodes the payload (the tag byte has already been consumed).
    fn decode(input: &mut ByteReader<'_>) -> CodecResult<Self>;
}

/// Object-safe facade over [`CustomType`] used inside [`Value`].
pub trait CustomValue: Any + fmt::Debug {
    /// Name of the concrete type, for diagnostics.
    fn type_name(&self) -> &'static str;

    /// Encodes the payload (without the tag byte).
    fn encode_value(&self, out: &mut ByteWriter) -> CodecResult<()>;

    /// Clones into a new box.
    fn clone_boxed(&self) -> Box<dyn CustomValue>;

    /// Compares against another erased value of possibly different type.
    fn eq_value(&self, other: &dyn CustomValue) -> bool;

    /// Upcasts to `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T: CustomType> CustomValue for T {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn encode_value(&self, out: &mut ByteWriter) -> CodecResult<()> {
        self.encode(out)
    }

    fn clone_boxed(&self) -> Box<dyn CustomValue> {
        Box::new(self.clone())
    }

    fn eq_value(&self, other: &dyn CustomValue) -> bool {
        other.as_any().downcast_ref::<T>() == Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Clone for Box<dyn CustomValue> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

/// A homogeneous array of one registered custom type.
///
/// The element type is captured at construction so that empty arrays still
/// serialize with the correct element tag.
#[derive(Debug, Clone)]
pub struct CustomArray {
    element_type: TypeId,
    element_name: &'static str,
    items: Vec<Box<dyn CustomValue>>,
}

impl CustomArray {
    /// Creates an array from concrete elements.
    #[must_use]
    pub fn new<T: CustomType>(items: Vec<T>) -> Self {
        Self {
            element_type: TypeId::of::<T>(),
            element_name: std::any::type_name::<T>(),
            items: items
                .into_iter()
                .map(|item| Box::new(item) as Box<dyn CustomValue>)
                .collect(),
        }
    }

    pub(crate) fn from_parts(
        element_type: TypeId,
        element_name: &'static str,
        items: Vec<Box<dyn CustomValue>>,
    ) -> Self {
        Self {
            element_type,
            element_name,
            items,
        }
    }

    /// Returns the `TypeId` of the element type.
    #[must_use]
    pub const fn element_type(&self) -> TypeId {
        self.element_type
    }

    /// Returns the element type name, for diagnostics.
    #[must_use]
    pub const fn element_name(&self) -> &'static str {
        self.element_name
    }

    /// Returns the erased elements.
    #[must_use]
    pub fn items(&self) -> &[Box<dyn CustomValue>] {
        &self.items
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the array has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Downcasts the element at `index` to its concrete type.
    #[must_use]
    pub fn get<T: CustomType>(&self, index: usize) -> Option<&T> {
        self.items.get(index)?.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for CustomArray {
    fn eq(&self, other: &Self) -> bool {
        self.element_type == other.element_type
            && self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(&other.items)
                .all(|(a, b)| a.eq_value(b.as_ref()))
    }
}

/// A polymorphic value carried by a tagged payload.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Byte(u8),
    Bool(bool),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    ByteArray(Vec<u8>),
    ObjectArray(Vec<Value>),
    Custom(Box<dyn CustomValue>),
    CustomArray(CustomArray),
}

impl Value {
    /// Wraps a concrete custom type value.
    #[must_use]
    pub fn custom<T: CustomType>(value: T) -> Self {
        Self::Custom(Box::new(value))
    }

    /// Downcasts a custom value to its concrete type.
    #[must_use]
    pub fn downcast_custom<T: CustomType>(&self) -> Option<&T> {
        match self {
            Self::Custom(value) => value.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Returns a short name of the value kind, for diagnostics and tooling.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Byte(_) => "byte",
            Self::Bool(_) => "bool",
            Self::Short(_) => "short",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::ByteArray(_) => "byte_array",
            Self::ObjectArray(_) => "object_array",
            Self::Custom(_) => "custom",
            Self::CustomArray(_) => "custom_array",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Byte(a), Self::Byte(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Short(a), Self::Short(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::ByteArray(a), Self::ByteArray(b)) => a == b,
            (Self::ObjectArray(a), Self::ObjectArray(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => a.eq_value(b.as_ref()),
            (Self::CustomArray(a), Self::CustomArray(b)) => a == b,
            _ => false,
        }
    }
}
