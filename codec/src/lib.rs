//! Tagged value serializer and custom type registry for the tagnet protocol.
//!
//! Every serialized value is prefixed by a one-byte [`TypeTag`]: tags 0-15
//! are reserved for the built-in primitive set, tags 50-254 are assigned to
//! user-registered [`CustomType`]s at registration time. A [`Serializer`]
//! owns one [`TypeRegistry`] and provides the top-level entry points for the
//! protocol: tagged value (de)serialization and the
//! `senderId / eventCode / payload` event envelope.
//!
//! # Design Principles
//!
//! - **Self-describing** - a decoder needs only the registry, never schema
//!   negotiation; an unknown tag byte hard-fails the whole message.
//! - **Instance-scoped registries** - no process-wide singletons; independent
//!   sessions (and tests) never share or pollute registration state.
//! - **Replay-safe scratch** - the envelope encoder reuses an internal
//!   buffer, but callers always receive an independent copy.
//!
//! # Example
//!
//! ```
//! use codec::{ClientId, EventCode, NetworkEvent, Serializer, Value};
//!
//! let mut serializer = Serializer::new();
//! let event = NetworkEvent {
//!     sender: ClientId::new(3),
//!     code: EventCode::application(7).unwrap(),
//!     data: Value::ObjectArray(vec![Value::Int(1), Value::String("hi".into())]),
//! };
//!
//! let bytes = serializer.encode_event(&event).unwrap();
//! let decoded = serializer.decode_event(&bytes).unwrap();
//! assert_eq!(decoded, event);
//! ```

mod error;
mod registry;
mod serializer;
mod tag;
mod types;
mod value;

pub use error::{CodecError, CodecResult};
pub use registry::TypeRegistry;
pub use serializer::{NetworkEvent, Serializer};
pub use tag::{TypeTag, CUSTOM_TAG_MAX, CUSTOM_TAG_MIN, RESERVED_TAG};
pub use types::{ClientId, EventCode};
pub use value::{CustomArray, CustomType, CustomValue, Value};
