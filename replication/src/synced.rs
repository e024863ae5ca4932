//! Change-tracked field wrappers for component implementors.
//!
//! [`SyncedValue`] is a convenience on top of the byte-level change cache:
//! components built from synced fields get cheap dirty flags and positional
//! bulk serialization through [`encode_synced`] / [`apply_synced`]. The
//! slot order returned by [`SyncedFields::synced_slots`] is the wire layout —
//! it must be fixed, deterministic, and identical on every peer.

use buffer::{ByteReader, ByteWriter};

use crate::error::ReplicationResult;

/// A primitive that knows how to write and read itself.
pub trait SyncedEncode: Sized {
    fn encode(&self, out: &mut ByteWriter) -> ReplicationResult<()>;
    fn decode(input: &mut ByteReader<'_>) -> ReplicationResult<Self>;
}

macro_rules! impl_synced_encode {
    ($($ty:ty => $write:ident, $read:ident;)*) => {
        $(
            impl SyncedEncode for $ty {
                fn encode(&self, out: &mut ByteWriter) -> ReplicationResult<()> {
                    out.$write(*self);
                    Ok(())
                }

                fn decode(input: &mut ByteReader<'_>) -> ReplicationResult<Self> {
                    Ok(input.$read()?)
                }
            }
        )*
    };
}

impl_synced_encode! {
    bool => write_bool, read_bool;
    u8 => write_u8, read_u8;
    i16 => write_i16, read_i16;
    i32 => write_i32, read_i32;
    i64 => write_i64, read_i64;
    f32 => write_f32, read_f32;
    f64 => write_f64, read_f64;
}

impl SyncedEncode for String {
    fn encode(&self, out: &mut ByteWriter) -> ReplicationResult<()> {
        out.write_str(self)?;
        Ok(())
    }

    fn decode(input: &mut ByteReader<'_>) -> ReplicationResult<Self> {
        Ok(input.read_str()?)
    }
}

/// A field that tracks whether it changed since the flag was last taken.
///
/// `set` with an equal value is a no-op and leaves the flag untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncedValue<T> {
    value: T,
    changed: bool,
}

impl<T: SyncedEncode + PartialEq + Clone> SyncedValue<T> {
    /// Wraps an initial value with the changed flag clear.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self {
            value,
            changed: false,
        }
    }

    /// The current value.
    #[must_use]
    pub const fn get(&self) -> &T {
        &self.value
    }

    /// Stores `value` and marks the field changed, unless it is equal to
    /// the current value.
    pub fn set(&mut self, value: T) {
        if self.value != value {
            self.value = value;
            self.changed = true;
        }
    }

    /// Returns the changed flag and clears it.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}

impl<T: SyncedEncode + PartialEq + Clone + Default> Default for SyncedValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Object-safe view over one synced field.
pub trait SyncedSlot {
    fn encode_slot(&self, out: &mut ByteWriter) -> ReplicationResult<()>;
    fn apply_slot(&mut self, input: &mut ByteReader<'_>) -> ReplicationResult<()>;
    fn changed(&self) -> bool;
}

impl<T: SyncedEncode + PartialEq + Clone> SyncedSlot for SyncedValue<T> {
    fn encode_slot(&self, out: &mut ByteWriter) -> ReplicationResult<()> {
        self.value.encode(out)
    }

    fn apply_slot(&mut self, input: &mut ByteReader<'_>) -> ReplicationResult<()> {
        self.value = T::decode(input)?;
        Ok(())
    }

    fn changed(&self) -> bool {
        self.changed
    }
}

/// A component whose replicated state is an ordered list of synced fields.
///
/// Implementors declare the order once, and both accessors must return the
/// same fields in the same order; there are no field names on the wire, so
/// reordering the list is a protocol break.
pub trait SyncedFields {
    fn synced_slots(&self) -> Vec<&dyn SyncedSlot>;
    fn synced_slots_mut(&mut self) -> Vec<&mut dyn SyncedSlot>;
}

/// Encodes every slot in declaration order.
pub fn encode_synced(fields: &dyn SyncedFields, out: &mut ByteWriter) -> ReplicationResult<()> {
    for slot in fields.synced_slots() {
        slot.encode_slot(out)?;
    }
    Ok(())
}

/// Applies a payload produced by [`encode_synced`], positionally.
pub fn apply_synced(
    fields: &mut dyn SyncedFields,
    input: &mut ByteReader<'_>,
) -> ReplicationResult<()> {
    for slot in fields.synced_slots_mut() {
        slot.apply_slot(input)?;
    }
    Ok(())
}
