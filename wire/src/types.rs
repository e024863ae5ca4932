//! Identifier newtypes for entities and components.

/// A session-unique entity identifier.
///
/// IDs below 1000 name pre-placed scene entities; everything above is
/// allocated from the owning client's partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(i32);

impl EntityId {
    /// Creates an entity ID from a raw value.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl From<i32> for EntityId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<EntityId> for i32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// A component slot identifier, unique within one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(i16);

impl ComponentId {
    /// Creates a component ID from a raw value.
    #[must_use]
    pub const fn new(id: i16) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> i16 {
        self.0
    }
}

impl From<i16> for ComponentId {
    fn from(id: i16) -> Self {
        Self(id)
    }
}

impl From<ComponentId> for i16 {
    fn from(id: ComponentId) -> Self {
        id.0
    }
}
