//! Notifications surfaced by [`update`](crate::ReplicationManager::update).

use codec::{ClientId, EventCode, Value};
use wire::{ComponentId, EntityId};

/// Something observable happened this tick.
///
/// Local operations and remote traffic both surface here, so gameplay code
/// reacts to one stream regardless of which side initiated a change.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ReplicationEvent {
    /// The session reached the ready phase.
    SessionReady,

    /// An entity appeared (locally instantiated or announced by its owner).
    EntityCreated { entity: EntityId, owner: ClientId },

    /// An entity was removed.
    EntityDestroyed { entity: EntityId },

    /// A component was attached to an existing entity.
    ComponentAdded {
        entity: EntityId,
        component: ComponentId,
    },

    /// A component was detached.
    ComponentRemoved {
        entity: EntityId,
        component: ComponentId,
    },

    /// An entity changed owners.
    OwnershipTransferred {
        entity: EntityId,
        previous: ClientId,
        owner: ClientId,
    },

    /// A player entered the directory.
    PlayerJoined { client: ClientId },

    /// A player left the directory.
    PlayerLeft { client: ClientId },

    /// An application-level event (code below the reserved band).
    Application {
        sender: ClientId,
        code: EventCode,
        data: Value,
    },
}
