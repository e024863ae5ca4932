//! Tagged serialization dispatch and the event envelope.

use buffer::{BufferError, ByteReader, ByteWriter};

use crate::error::{CodecError, CodecResult};
use crate::registry::TypeRegistry;
use crate::tag::TypeTag;
use crate::types::{ClientId, EventCode};
use crate::value::{CustomArray, Value};

/// The event envelope: sender, code, and a tagged payload.
///
/// Ephemeral — constructed per send/receive, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkEvent {
    pub sender: ClientId,
    pub code: EventCode,
    pub data: Value,
}

/// Serializes and deserializes tagged values and event envelopes.
///
/// Owns the custom type registry and an internal scratch buffer. The
/// scratch buffer is cleared and refilled across `encode_*` calls, but the
/// returned bytes are always an independent copy — successive calls never
/// alias each other's output.
#[derive(Debug, Default)]
pub struct Serializer {
    registry: TypeRegistry,
    scratch: ByteWriter,
}

impl Serializer {
    /// Creates a serializer with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a serializer around a pre-populated registry.
    #[must_use]
    pub fn with_registry(registry: TypeRegistry) -> Self {
        Self {
            registry,
            scratch: ByteWriter::new(),
        }
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Returns the registry mutably, for registration calls.
    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    /// Writes one tag byte followed by the tagged payload.
    pub fn serialize(&self, value: &Value, out: &mut ByteWriter) -> CodecResult<()> {
        write_value(&self.registry, value, out)
    }

    /// Reads a tag byte and dispatches to the matching payload decoder.
    pub fn deserialize(&self, input: &mut ByteReader<'_>) -> CodecResult<Value> {
        read_value(&self.registry, input)
    }

    /// Encodes a tagged value into an owned byte vector.
    pub fn encode_value(&mut self, value: &Value) -> CodecResult<Vec<u8>> {
        self.scratch.clear();
        write_value(&self.registry, value, &mut self.scratch)?;
        Ok(self.scratch.as_slice().to_vec())
    }

    /// Decodes a tagged value, rejecting trailing bytes.
    pub fn decode_value(&self, bytes: &[u8]) -> CodecResult<Value> {
        let mut reader = ByteReader::new(bytes);
        let value = read_value(&self.registry, &mut reader)?;
        ensure_drained(&reader)?;
        Ok(value)
    }

    /// Encodes a full envelope: sender id, event code, tagged payload.
    pub fn encode_event(&mut self, event: &NetworkEvent) -> CodecResult<Vec<u8>> {
        self.scratch.clear();
        self.scratch.write_i32(event.sender.raw());
        self.scratch.write_u8(event.code.raw());
        write_value(&self.registry, &event.data, &mut self.scratch)?;
        Ok(self.scratch.as_slice().to_vec())
    }

    /// Decodes a full envelope, rejecting trailing bytes.
    pub fn decode_event(&self, bytes: &[u8]) -> CodecResult<NetworkEvent> {
        let mut reader = ByteReader::new(bytes);
        let sender = ClientId::new(reader.read_i32()?);
        let code = EventCode::from_raw(reader.read_u8()?);
        let data = read_value(&self.registry, &mut reader)?;
        ensure_drained(&reader)?;
        Ok(NetworkEvent { sender, code, data })
    }
}

fn ensure_drained(reader: &ByteReader<'_>) -> CodecResult<()> {
    if reader.is_empty() {
        Ok(())
    } else {
        Err(CodecError::TrailingBytes {
            remaining: reader.remaining(),
        })
    }
}

fn write_count(count: usize, out: &mut ByteWriter) -> CodecResult<()> {
    let count = i32::try_from(count)
        .map_err(|_| CodecError::Buffer(BufferError::ArrayTooLong { length: count }))?;
    out.write_i32(count);
    Ok(())
}

fn read_count(input: &mut ByteReader<'_>) -> CodecResult<usize> {
    let count = input.read_i32()?;
    if count < 0 {
        return Err(CodecError::NegativeCount { count });
    }
    Ok(count as usize)
}

fn write_value(registry: &TypeRegistry, value: &Value, out: &mut ByteWriter) -> CodecResult<()> {
    match value {
        Value::Null => out.write_u8(TypeTag::Null.raw()),
        Value::Byte(v) => {
            out.write_u8(TypeTag::Byte.raw());
            out.write_u8(*v);
        }
        Value::Bool(v) => {
            out.write_u8(TypeTag::Bool.raw());
            out.write_bool(*v);
        }
        Value::Short(v) => {
            out.write_u8(TypeTag::Short.raw());
            out.write_i16(*v);
        }
        Value::Int(v) => {
            out.write_u8(TypeTag::Int.raw());
            out.write_i32(*v);
        }
        Value::Long(v) => {
            out.write_u8(TypeTag::Long.raw());
            out.write_i64(*v);
        }
        Value::Float(v) => {
            out.write_u8(TypeTag::Float.raw());
            out.write_f32(*v);
        }
        Value::Double(v) => {
            out.write_u8(TypeTag::Double.raw());
            out.write_f64(*v);
        }
        Value::String(v) => {
            out.write_u8(TypeTag::String.raw());
            out.write_str(v)?;
        }
        // Byte arrays skip per-element tagging, the common-case optimization.
        Value::ByteArray(v) => {
            out.write_u8(TypeTag::ByteArray.raw());
            out.write_bytes(v)?;
        }
        Value::ObjectArray(items) => {
            out.write_u8(TypeTag::ObjectArray.raw());
            write_count(items.len(), out)?;
            for item in items {
                write_value(registry, item, out)?;
            }
        }
        Value::CustomArray(array) => {
            let code = registry.code_of(array.element_type()).ok_or(
                CodecError::UnknownType {
                    type_name: array.element_name(),
                },
            )?;
            out.write_u8(TypeTag::TypedArray.raw());
            out.write_u8(code);
            write_count(array.len(), out)?;
            // All elements share one known type, so none carries a tag.
            for item in array.items() {
                item.encode_value(out)?;
            }
        }
        Value::Custom(v) => {
            let code =
                registry
                    .code_of(v.as_any().type_id())
                    .ok_or(CodecError::UnknownType {
                        type_name: v.type_name(),
                    })?;
            out.write_u8(code);
            v.encode_value(out)?;
        }
    }
    Ok(())
}

fn read_value(registry: &TypeRegistry, input: &mut ByteReader<'_>) -> CodecResult<Value> {
    let tag = TypeTag::parse(input.read_u8()?)?;
    match tag {
        TypeTag::Null => Ok(Value::Null),
        TypeTag::Byte => Ok(Value::Byte(input.read_u8()?)),
        TypeTag::Bool => Ok(Value::Bool(input.read_bool()?)),
        TypeTag::Short => Ok(Value::Short(input.read_i16()?)),
        TypeTag::Int => Ok(Value::Int(input.read_i32()?)),
        TypeTag::Long => Ok(Value::Long(input.read_i64()?)),
        TypeTag::Float => Ok(Value::Float(input.read_f32()?)),
        TypeTag::Double => Ok(Value::Double(input.read_f64()?)),
        TypeTag::String => Ok(Value::String(input.read_str()?)),
        TypeTag::ByteArray => Ok(Value::ByteArray(input.read_bytes()?)),
        TypeTag::ObjectArray => {
            let count = read_count(input)?;
            let mut items = Vec::with_capacity(count.min(1024));
            for _ in 0..count {
                items.push(read_value(registry, input)?);
            }
            Ok(Value::ObjectArray(items))
        }
        TypeTag::TypedArray => {
            let code = input.read_u8()?;
            let registration = registry
                .registration(code)
                .ok_or(CodecError::UnknownTag { tag: code })?;
            let count = read_count(input)?;
            let mut items = Vec::with_capacity(count.min(1024));
            for _ in 0..count {
                items.push((registration.decode)(input)?);
            }
            Ok(Value::CustomArray(CustomArray::from_parts(
                registration.type_id,
                registration.type_name,
                items,
            )))
        }
        TypeTag::Custom(code) => {
            let registration = registry
                .registration(code)
                .ok_or(CodecError::UnknownTag { tag: code })?;
            Ok(Value::Custom((registration.decode)(input)?))
        }
    }
}
