//! Core identifier types shared across the protocol stack.

/// A session-scoped client identifier assigned by the transport.
///
/// The value −1 is the scene sentinel: entities owned by the authoritative
/// server rather than an individual client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ClientId(i32);

impl ClientId {
    /// Owner sentinel for scene-owned entities.
    pub const SCENE: Self = Self(-1);

    /// Creates a new client ID.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw client ID value.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Returns `true` if this is the scene owner sentinel.
    #[must_use]
    pub const fn is_scene(self) -> bool {
        self.0 == Self::SCENE.0
    }
}

impl From<i32> for ClientId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<ClientId> for i32 {
    fn from(id: ClientId) -> Self {
        id.0
    }
}

/// A one-byte event code identifying the meaning of an event payload.
///
/// Codes at or above [`EventCode::RESERVED_MIN`] belong to the replication
/// protocol and must not be used by application events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventCode(u8);

impl EventCode {
    /// First code of the reserved band.
    pub const RESERVED_MIN: u8 = 200;

    /// Creates an event code from a raw byte without a range check.
    #[must_use]
    pub const fn from_raw(code: u8) -> Self {
        Self(code)
    }

    /// Creates an application-level event code.
    ///
    /// Returns `None` if the code collides with the reserved band.
    #[must_use]
    pub const fn application(code: u8) -> Option<Self> {
        if code >= Self::RESERVED_MIN {
            None
        } else {
            Some(Self(code))
        }
    }

    /// Returns the raw code byte.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Returns `true` if this code belongs to the reserved band.
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        self.0 >= Self::RESERVED_MIN
    }
}
