//! Factory tables for remote construction.

use std::collections::HashMap;

use wire::ComponentId;

use crate::component::Component;
use crate::error::{ReplicationError, ReplicationResult};
use crate::players::Player;

/// Builds the default component set for one entity type.
pub type EntityFactory = fn() -> Vec<(ComponentId, Box<dyn Component>)>;

/// Builds one component in its default state.
pub type ComponentFactory = fn() -> Box<dyn Component>;

/// Builds the session's player type in its default state.
pub type PlayerFactory = fn() -> Box<dyn Player>;

/// Maps wire type names to constructors.
///
/// Every peer populates the same catalog up front; remote creation then
/// resolves names against this table and nothing else. Factories must
/// produce identical default state on every peer — a freshly constructed
/// entity's serialized bytes are the change-detection baseline on both
/// sides.
#[derive(Default)]
pub struct TypeCatalog {
    entities: HashMap<String, EntityFactory>,
    components: HashMap<String, ComponentFactory>,
    player: Option<(String, PlayerFactory)>,
}

impl TypeCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity type.
    ///
    /// # Errors
    ///
    /// Returns [`ReplicationError::DuplicateTypeName`] if the name is taken.
    pub fn register_entity(&mut self, name: &str, factory: EntityFactory) -> ReplicationResult<()> {
        if self.entities.contains_key(name) {
            return Err(ReplicationError::DuplicateTypeName {
                type_name: name.to_string(),
            });
        }
        self.entities.insert(name.to_string(), factory);
        Ok(())
    }

    /// Registers a component type for late attachment.
    ///
    /// # Errors
    ///
    /// Returns [`ReplicationError::DuplicateTypeName`] if the name is taken.
    pub fn register_component(
        &mut self,
        name: &str,
        factory: ComponentFactory,
    ) -> ReplicationResult<()> {
        if self.components.contains_key(name) {
            return Err(ReplicationError::DuplicateTypeName {
                type_name: name.to_string(),
            });
        }
        self.components.insert(name.to_string(), factory);
        Ok(())
    }

    /// Registers the session's single player type.
    ///
    /// # Errors
    ///
    /// Returns [`ReplicationError::DuplicateTypeName`] if a player type is
    /// already registered.
    pub fn register_player(&mut self, name: &str, factory: PlayerFactory) -> ReplicationResult<()> {
        if let Some((existing, _)) = &self.player {
            return Err(ReplicationError::DuplicateTypeName {
                type_name: existing.clone(),
            });
        }
        self.player = Some((name.to_string(), factory));
        Ok(())
    }

    pub(crate) fn entity_factory(&self, name: &str) -> Option<EntityFactory> {
        self.entities.get(name).copied()
    }

    pub(crate) fn component_factory(&self, name: &str) -> Option<ComponentFactory> {
        self.components.get(name).copied()
    }

    pub(crate) fn player_factory(&self) -> Option<PlayerFactory> {
        self.player.as_ref().map(|(_, factory)| *factory)
    }
}
