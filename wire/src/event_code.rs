//! Reserved event codes for the replication protocol.
//!
//! Application events use codes below [`EventCode::RESERVED_MIN`]; these
//! constants occupy the reserved band and are produced and consumed only by
//! the replication layer.

use codec::EventCode;

/// Announces a new entity: id, owner, entity type name.
pub const ENTITY_CREATE: EventCode = EventCode::from_raw(201);

/// Removes an entity: id.
pub const ENTITY_DESTROY: EventCode = EventCode::from_raw(202);

/// Carries changed component payloads for one entity.
pub const ENTITY_UPDATE: EventCode = EventCode::from_raw(203);

/// Attaches a component to an existing entity.
pub const COMPONENT_ADD: EventCode = EventCode::from_raw(204);

/// Detaches a component from an entity.
pub const COMPONENT_REMOVE: EventCode = EventCode::from_raw(205);

/// A joiner announcing itself with its serialized player state.
pub const PLAYER_JOIN: EventCode = EventCode::from_raw(206);

/// The authoritative peer's roster snapshot, unicast to a joiner.
pub const PLAYER_LIST: EventCode = EventCode::from_raw(207);

/// A per-tick player state delta.
pub const PLAYER_UPDATE: EventCode = EventCode::from_raw(208);

/// Remote procedure call envelope. Dispatch lives outside this stack.
pub const RPC: EventCode = EventCode::from_raw(209);
