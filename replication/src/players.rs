//! Player state and the session directory.

use std::any::Any;
use std::collections::BTreeMap;

use buffer::{ByteReader, ByteWriter};
use codec::ClientId;

use crate::error::ReplicationResult;

/// Per-client session state replicated through the player directory.
///
/// Like components, `serialize` must be a pure function of current state;
/// the per-tick player broadcast is suppressed whenever the bytes match the
/// last broadcast.
pub trait Player: Any {
    /// The catalog name peers use to construct this player type.
    fn type_name(&self) -> &'static str;

    /// Writes the full player state.
    fn serialize(&self, out: &mut ByteWriter) -> ReplicationResult<()>;

    /// Overwrites state from a serialized payload.
    fn apply(&mut self, input: &mut ByteReader<'_>) -> ReplicationResult<()>;

    /// Upcasts for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Remote players known to this session, keyed by client ID.
///
/// The local player never appears here; it lives on the manager.
#[derive(Default)]
pub struct PlayerDirectory {
    players: BTreeMap<ClientId, Box<dyn Player>>,
}

impl PlayerDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, client: ClientId, player: Box<dyn Player>) {
        self.players.insert(client, player);
    }

    pub(crate) fn remove(&mut self, client: ClientId) -> Option<Box<dyn Player>> {
        self.players.remove(&client)
    }

    pub(crate) fn get_dyn_mut(&mut self, client: ClientId) -> Option<&mut Box<dyn Player>> {
        self.players.get_mut(&client)
    }

    /// Returns `true` if a player is recorded for `client`.
    #[must_use]
    pub fn contains(&self, client: ClientId) -> bool {
        self.players.contains_key(&client)
    }

    /// Downcasts the player for `client` to its concrete type.
    #[must_use]
    pub fn get<P: Player>(&self, client: ClientId) -> Option<&P> {
        self.players.get(&client)?.as_any().downcast_ref::<P>()
    }

    /// Mutable downcast of the player for `client`.
    pub fn get_mut<P: Player>(&mut self, client: ClientId) -> Option<&mut P> {
        self.players
            .get_mut(&client)?
            .as_any_mut()
            .downcast_mut::<P>()
    }

    /// The recorded client IDs, ascending.
    #[must_use]
    pub fn clients(&self) -> Vec<ClientId> {
        self.players.keys().copied().collect()
    }

    /// Number of recorded players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns `true` if no players are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (ClientId, &dyn Player)> {
        self.players
            .iter()
            .map(|(client, player)| (*client, player.as_ref()))
    }
}
