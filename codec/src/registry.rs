//! Bidirectional custom type registry.

use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};

use buffer::ByteReader;

use crate::error::{CodecError, CodecResult};
use crate::tag::{CUSTOM_TAG_MAX, CUSTOM_TAG_MIN};
use crate::value::{CustomType, CustomValue};

type DecodeFn = fn(&mut ByteReader<'_>) -> CodecResult<Box<dyn CustomValue>>;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Registration {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) decode: DecodeFn,
}

/// Maps custom types to one-byte tags and back.
///
/// Both directions are kept bijective: a type registers at most once and a
/// code is assigned at most once. Registration failures leave the registry
/// unchanged. Each registry is owned by exactly one
/// [`Serializer`](crate::Serializer) instance; there is no process-wide
/// state.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    by_type: HashMap<TypeId, u8>,
    by_code: BTreeMap<u8, Registration>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under the first free code at or above
    /// [`CUSTOM_TAG_MIN`], returning the assigned code.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::TypeAlreadyRegistered`] if `T` is registered,
    /// or [`CodecError::RegistrationFull`] once the tag space is exhausted.
    pub fn register<T: CustomType>(&mut self) -> CodecResult<u8> {
        if let Some(&code) = self.by_type.get(&TypeId::of::<T>()) {
            return Err(CodecError::TypeAlreadyRegistered {
                type_name: std::any::type_name::<T>(),
                code,
            });
        }
        let code = (CUSTOM_TAG_MIN..=CUSTOM_TAG_MAX)
            .find(|code| !self.by_code.contains_key(code))
            .ok_or(CodecError::RegistrationFull)?;
        self.insert::<T>(code);
        Ok(code)
    }

    /// Registers `T` under an explicit code.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::CodeOutOfRange`], [`CodecError::TypeAlreadyRegistered`]
    /// or [`CodecError::CodeInUse`]; a failure leaves no partial registration.
    pub fn register_with_code<T: CustomType>(&mut self, code: u8) -> CodecResult<()> {
        if !(CUSTOM_TAG_MIN..=CUSTOM_TAG_MAX).contains(&code) {
            return Err(CodecError::CodeOutOfRange { code });
        }
        if let Some(&existing) = self.by_type.get(&TypeId::of::<T>()) {
            return Err(CodecError::TypeAlreadyRegistered {
                type_name: std::any::type_name::<T>(),
                code: existing,
            });
        }
        if let Some(registration) = self.by_code.get(&code) {
            return Err(CodecError::CodeInUse {
                code,
                type_name: registration.type_name,
            });
        }
        self.insert::<T>(code);
        Ok(())
    }

    /// Returns the code assigned to a type, if registered.
    #[must_use]
    pub fn code_of(&self, type_id: TypeId) -> Option<u8> {
        self.by_type.get(&type_id).copied()
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    pub(crate) fn registration(&self, code: u8) -> Option<&Registration> {
        self.by_code.get(&code)
    }

    // Both maps are written together; validation happens before this point
    // so a failed registration never mutates either side.
    fn insert<T: CustomType>(&mut self, code: u8) {
        self.by_type.insert(TypeId::of::<T>(), code);
        self.by_code.insert(
            code,
            Registration {
                type_id: TypeId::of::<T>(),
                type_name: std::any::type_name::<T>(),
                decode: decode_erased::<T>,
            },
        );
    }
}

fn decode_erased<T: CustomType>(input: &mut ByteReader<'_>) -> CodecResult<Box<dyn CustomValue>> {
    Ok(Box::new(T::decode(input)?))
}
