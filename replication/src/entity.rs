//! Replicated entities and their component slots.

use std::collections::BTreeMap;

use codec::ClientId;
use wire::{ComponentId, EntityId};

use crate::component::Component;
use crate::error::{ReplicationError, ReplicationResult};

/// Per-slot state: the component plus its change-detection cache.
///
/// The cache holds the bytes of the last broadcast (for local entities) or
/// the last applied payload (for remote ones).
pub(crate) struct ComponentSlot {
    pub(crate) component: Box<dyn Component>,
    pub(crate) cache: Vec<u8>,
}

/// Creation options for [`instantiate`](crate::ReplicationManager::instantiate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstantiateOptions {
    /// Record the scene sentinel as owner instead of the local client.
    pub scene_owned: bool,

    /// Request reliable delivery for this entity's update events.
    pub reliable: bool,

    /// Send only changed components per tick. Off means every component is
    /// sent every tick regardless of the cache.
    pub update_when_changed: bool,
}

impl Default for InstantiateOptions {
    fn default() -> Self {
        Self {
            scene_owned: false,
            reliable: false,
            update_when_changed: true,
        }
    }
}

/// One replicated entity: identity, ownership, and component slots.
///
/// Slots are keyed by [`ComponentId`] in a `BTreeMap` so serialization and
/// update emission follow a stable ascending order.
pub struct Entity {
    id: EntityId,
    owner: ClientId,
    type_name: String,
    active: bool,
    reliable: bool,
    update_when_changed: bool,
    pub(crate) slots: BTreeMap<ComponentId, ComponentSlot>,
}

impl Entity {
    pub(crate) fn new(
        id: EntityId,
        owner: ClientId,
        type_name: String,
        options: InstantiateOptions,
    ) -> Self {
        Self {
            id,
            owner,
            type_name,
            active: true,
            reliable: options.reliable,
            update_when_changed: options.update_when_changed,
            slots: BTreeMap::new(),
        }
    }

    /// The entity's session-unique ID.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// The owning client, or the scene sentinel.
    #[must_use]
    pub const fn owner(&self) -> ClientId {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: ClientId) {
        self.owner = owner;
    }

    /// The catalog type name this entity was constructed from.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Inactive entities are skipped by the per-tick delta pass.
    #[must_use]
    pub const fn active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Whether update events for this entity request reliable delivery.
    #[must_use]
    pub const fn reliable(&self) -> bool {
        self.reliable
    }

    /// Whether the per-tick pass sends only changed components.
    #[must_use]
    pub const fn update_when_changed(&self) -> bool {
        self.update_when_changed
    }

    /// Returns `true` if this peer is the authoritative writer.
    ///
    /// Scene-owned entities are written by the authoritative peer only.
    #[must_use]
    pub fn is_local(&self, local: ClientId, is_server: bool) -> bool {
        if self.owner.is_scene() {
            is_server
        } else {
            self.owner == local
        }
    }

    /// The component IDs present on this entity, ascending.
    #[must_use]
    pub fn component_ids(&self) -> Vec<ComponentId> {
        self.slots.keys().copied().collect()
    }

    /// Returns `true` if the slot is occupied.
    #[must_use]
    pub fn has_component(&self, component: ComponentId) -> bool {
        self.slots.contains_key(&component)
    }

    /// Downcasts the component in `slot` to its concrete type.
    #[must_use]
    pub fn component<C: Component>(&self, slot: ComponentId) -> Option<&C> {
        self.slots.get(&slot)?.component.as_any().downcast_ref::<C>()
    }

    /// Mutable downcast of the component in `slot`.
    pub fn component_mut<C: Component>(&mut self, slot: ComponentId) -> Option<&mut C> {
        self.slots
            .get_mut(&slot)?
            .component
            .as_any_mut()
            .downcast_mut::<C>()
    }

    pub(crate) fn add_slot(
        &mut self,
        component_id: ComponentId,
        component: Box<dyn Component>,
        cache: Vec<u8>,
    ) -> ReplicationResult<()> {
        if self.slots.contains_key(&component_id) {
            return Err(ReplicationError::DuplicateComponentId {
                entity: self.id,
                component: component_id,
            });
        }
        self.slots
            .insert(component_id, ComponentSlot { component, cache });
        Ok(())
    }

    pub(crate) fn remove_slot(&mut self, component_id: ComponentId) -> Option<ComponentSlot> {
        self.slots.remove(&component_id)
    }
}
