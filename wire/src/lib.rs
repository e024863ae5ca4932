//! Replication event bodies and reserved codes for the tagnet protocol.
//!
//! This crate defines the byte layouts of the reserved replication events:
//! entity create/destroy/update, component add/remove, and the player
//! directory messages. It knows nothing about entity state or transports —
//! only how the event bodies are framed.
//!
//! # Design Principles
//!
//! - **Bounded decoding** - Length fields are validated against [`Limits`]
//!   before any allocation.
//! - **No domain knowledge** - Component and player payloads pass through
//!   as opaque byte arrays; interpreting them is the replication layer's job.
//! - **Exact framing** - Every decoder rejects trailing bytes.

mod body;
mod error;
mod event_code;
mod limits;
mod target;
mod types;

pub use body::{
    ComponentAddBody, ComponentRemoveBody, ComponentUpdate, EntityCreateBody, EntityDestroyBody,
    EntityUpdateBody, PlayerListBody, PlayerUpdateBody,
};
pub use codec::{ClientId, EventCode};
pub use error::{LimitKind, WireError, WireResult};
pub use event_code::{
    COMPONENT_ADD, COMPONENT_REMOVE, ENTITY_CREATE, ENTITY_DESTROY, ENTITY_UPDATE, PLAYER_JOIN,
    PLAYER_LIST, PLAYER_UPDATE, RPC,
};
pub use limits::Limits;
pub use target::MessageTarget;
pub use types::{ComponentId, EntityId};
