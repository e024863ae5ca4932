//! Manager configuration.

use std::time::Duration;

use wire::Limits;

/// Tunables for a [`ReplicationManager`](crate::ReplicationManager).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Drop a departed client's player from the directory.
    pub remove_player_on_leave: bool,

    /// Unregister a departed client's entities locally (no re-broadcast;
    /// every surviving peer performs the same cleanup).
    pub destroy_entities_on_leave: bool,

    /// How long a joiner waits for the roster snapshot before
    /// initialization fails.
    pub player_list_timeout: Duration,

    /// Request reliable delivery for per-tick update events.
    pub reliable_updates: bool,

    /// Decode limits applied to incoming event bodies.
    pub limits: Limits,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            remove_player_on_leave: true,
            destroy_entities_on_leave: true,
            player_list_timeout: Duration::from_secs(10),
            reliable_updates: false,
            limits: Limits::default(),
        }
    }
}

impl ManagerConfig {
    /// Creates a configuration suitable for tests: small limits and a short
    /// roster timeout.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            remove_player_on_leave: true,
            destroy_entities_on_leave: true,
            player_list_timeout: Duration::from_millis(50),
            reliable_updates: false,
            limits: Limits::for_testing(),
        }
    }
}
