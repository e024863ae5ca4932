//! Error types for the replication layer.

use std::fmt;

use buffer::BufferError;
use codec::{ClientId, CodecError};
use transport::TransportError;
use wire::{ComponentId, EntityId, WireError};

/// Result type for replication operations.
pub type ReplicationResult<T> = Result<T, ReplicationError>;

/// Errors raised by the replication manager.
///
/// Local API misuse (`NotOwner`, `EntityNotFound`, ...) is reported to the
/// caller; malformed remote traffic surfaces as the wrapped decode errors;
/// semantically impossible remote traffic is a [`ProtocolViolation`]. Stale
/// remote references are not errors at all — they are logged and dropped.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ReplicationError {
    /// A primitive read or write failed.
    Buffer(BufferError),

    /// Tagged value encoding or decoding failed.
    Codec(CodecError),

    /// An event body failed to decode.
    Wire(WireError),

    /// The transport rejected a send.
    Transport(TransportError),

    /// A peer sent something the protocol forbids.
    Protocol(ProtocolViolation),

    /// The owner's entity ID partition has no free slot left.
    IdSpaceExhausted { owner: ClientId },

    /// The player list did not arrive before the configured timeout.
    InitTimeout { waited_ms: u64 },

    /// A mutating call on an entity owned by another client.
    NotOwner {
        entity: EntityId,
        owner: ClientId,
        local: ClientId,
    },

    /// A local call referenced an entity that does not exist.
    EntityNotFound { entity: EntityId },

    /// A component ID is already occupied on this entity.
    DuplicateComponentId {
        entity: EntityId,
        component: ComponentId,
    },

    /// A type name was registered twice in the catalog.
    DuplicateTypeName { type_name: String },

    /// A local call referenced a type name missing from the catalog.
    UnknownTypeName { type_name: String },

    /// The session has not reached the ready phase yet.
    NotReady,

    /// `initialize` was called twice, or after the phase advanced.
    AlreadyInitialized,

    /// `initialize` requires a local player to be set first.
    MissingLocalPlayer,

    /// Scene-owned instantiation is restricted to the authoritative peer.
    SceneOwnedRequiresServer,

    /// Scene entity IDs must sit below the scene threshold.
    SceneIdOutOfRange { entity: EntityId },

    /// The entity ID is already registered.
    EntityAlreadyExists { entity: EntityId },

    /// An application event used a code from the reserved band.
    ReservedEventCode { code: u8 },
}

/// Remote traffic that no conforming peer produces.
///
/// These are fatal: the session state can no longer be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolViolation {
    /// A peer wrote to an entity this client owns.
    RemoteWriteToOwnedEntity { entity: EntityId, sender: ClientId },

    /// A player payload arrived but no player type is registered, or the
    /// payload does not match the registered type.
    PlayerTypeMismatch { client: ClientId },
}

impl fmt::Display for ReplicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffer(err) => write!(f, "buffer error: {err}"),
            Self::Codec(err) => write!(f, "codec error: {err}"),
            Self::Wire(err) => write!(f, "wire error: {err}"),
            Self::Transport(err) => write!(f, "transport error: {err}"),
            Self::Protocol(violation) => write!(f, "protocol violation: {violation}"),
            Self::IdSpaceExhausted { owner } => {
                write!(f, "entity ID partition exhausted for owner {}", owner.raw())
            }
            Self::InitTimeout { waited_ms } => {
                write!(f, "no player list after {waited_ms} ms")
            }
            Self::NotOwner {
                entity,
                owner,
                local,
            } => {
                write!(
                    f,
                    "entity {} is owned by {}, not by local client {}",
                    entity.raw(),
                    owner.raw(),
                    local.raw()
                )
            }
            Self::EntityNotFound { entity } => {
                write!(f, "entity {} not found", entity.raw())
            }
            Self::DuplicateComponentId { entity, component } => {
                write!(
                    f,
                    "component {} already exists on entity {}",
                    component.raw(),
                    entity.raw()
                )
            }
            Self::DuplicateTypeName { type_name } => {
                write!(f, "type name already registered: {type_name}")
            }
            Self::UnknownTypeName { type_name } => {
                write!(f, "type name not in catalog: {type_name}")
            }
            Self::NotReady => write!(f, "session is not ready"),
            Self::AlreadyInitialized => write!(f, "session already initialized"),
            Self::MissingLocalPlayer => {
                write!(f, "set a local player before initializing")
            }
            Self::SceneOwnedRequiresServer => {
                write!(f, "only the authoritative peer may create scene-owned entities")
            }
            Self::SceneIdOutOfRange { entity } => {
                write!(f, "{} is not a valid scene entity ID", entity.raw())
            }
            Self::EntityAlreadyExists { entity } => {
                write!(f, "entity {} already exists", entity.raw())
            }
            Self::ReservedEventCode { code } => {
                write!(f, "event code {code} is reserved for the protocol")
            }
        }
    }
}

impl fmt::Display for ProtocolViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoteWriteToOwnedEntity { entity, sender } => {
                write!(
                    f,
                    "client {} wrote to locally owned entity {}",
                    sender.raw(),
                    entity.raw()
                )
            }
            Self::PlayerTypeMismatch { client } => {
                write!(f, "player payload from client {} has no matching type", client.raw())
            }
        }
    }
}

impl std::error::Error for ReplicationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Buffer(err) => Some(err),
            Self::Codec(err) => Some(err),
            Self::Wire(err) => Some(err),
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BufferError> for ReplicationError {
    fn from(err: BufferError) -> Self {
        Self::Buffer(err)
    }
}

impl From<CodecError> for ReplicationError {
    fn from(err: CodecError) -> Self {
        Self::Codec(err)
    }
}

impl From<WireError> for ReplicationError {
    fn from(err: WireError) -> Self {
        Self::Wire(err)
    }
}

impl From<TransportError> for ReplicationError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}

impl From<ProtocolViolation> for ReplicationError {
    fn from(violation: ProtocolViolation) -> Self {
        Self::Protocol(violation)
    }
}
