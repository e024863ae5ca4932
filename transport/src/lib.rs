//! Transport contract and in-process loopback for the tagnet protocol.
//!
//! The replication layer consumes the [`Transport`] trait and never touches
//! sockets directly. The [`LoopbackHub`] delivers between endpoints in the
//! same process, which is enough for tests and single-machine simulation;
//! real network transports implement the same trait elsewhere.
//!
//! The model is single-threaded and cooperative: incoming events and
//! join/leave notifications sit in per-endpoint queues until the owner
//! drains them from its own tick.

mod error;
mod loopback;

pub use error::{TransportError, TransportResult};
pub use loopback::{LoopbackEndpoint, LoopbackHub};
pub use wire::{ClientId, EventCode, MessageTarget};

/// An event delivered to an endpoint, sender already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingEvent {
    pub sender: ClientId,
    pub code: EventCode,
    pub payload: Vec<u8>,
}

/// The sending/receiving surface the replication layer is written against.
///
/// All methods are non-blocking. `poll_*` drain per-endpoint queues one
/// element at a time; a `None` means the queue is empty for this tick.
pub trait Transport {
    /// The client ID this endpoint speaks as.
    fn local_client(&self) -> ClientId;

    /// The authoritative peer of the session.
    fn server_client(&self) -> ClientId;

    /// Returns `true` if this endpoint is the authoritative peer.
    fn is_server(&self) -> bool {
        self.local_client() == self.server_client()
    }

    /// Currently connected clients, in stable ascending order.
    fn connected_clients(&self) -> Vec<ClientId>;

    /// Sends an event payload to the addressed clients.
    fn send(
        &mut self,
        code: EventCode,
        payload: &[u8],
        target: &MessageTarget,
        reliable: bool,
    ) -> TransportResult<()>;

    /// Takes the next received event, if any.
    fn poll_event(&mut self) -> Option<IncomingEvent>;

    /// Takes the next join notification, if any.
    fn poll_joined(&mut self) -> Option<ClientId>;

    /// Takes the next leave notification, if any.
    fn poll_left(&mut self) -> Option<ClientId>;
}
