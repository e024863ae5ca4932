//! In-process loopback transport.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use wire::{ClientId, EventCode, MessageTarget};

use crate::error::{TransportError, TransportResult};
use crate::{IncomingEvent, Transport};

#[derive(Debug, Default)]
struct EndpointQueues {
    events: VecDeque<IncomingEvent>,
    joined: VecDeque<ClientId>,
    left: VecDeque<ClientId>,
}

#[derive(Debug, Default)]
struct HubState {
    server: Option<ClientId>,
    endpoints: BTreeMap<ClientId, EndpointQueues>,
}

/// Connects loopback endpoints within one process.
///
/// The first client to connect becomes the authoritative peer. Delivery is
/// immediate and ordered per receiver; the `reliable` flag is accepted for
/// API parity and has no effect in-process.
#[derive(Debug, Clone, Default)]
pub struct LoopbackHub {
    state: Rc<RefCell<HubState>>,
}

impl LoopbackHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects a client and returns its endpoint.
    ///
    /// Existing endpoints receive a join notification for the newcomer.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::AlreadyConnected`] if the ID is in use.
    pub fn connect(&self, client: ClientId) -> TransportResult<LoopbackEndpoint> {
        let mut state = self.state.borrow_mut();
        if state.endpoints.contains_key(&client) {
            return Err(TransportError::AlreadyConnected { client });
        }
        for queues in state.endpoints.values_mut() {
            queues.joined.push_back(client);
        }
        state.endpoints.insert(client, EndpointQueues::default());
        if state.server.is_none() {
            state.server = Some(client);
            log::debug!("loopback: client {} connected as server", client.raw());
        } else {
            log::debug!("loopback: client {} connected", client.raw());
        }
        Ok(LoopbackEndpoint {
            state: Rc::clone(&self.state),
            client,
        })
    }

    /// Disconnects a client; remaining endpoints get a leave notification.
    pub fn disconnect(&self, client: ClientId) {
        let mut state = self.state.borrow_mut();
        if state.endpoints.remove(&client).is_none() {
            return;
        }
        log::debug!("loopback: client {} disconnected", client.raw());
        for queues in state.endpoints.values_mut() {
            queues.left.push_back(client);
        }
    }

    /// Returns the connected client IDs in ascending order.
    #[must_use]
    pub fn connected(&self) -> Vec<ClientId> {
        self.state.borrow().endpoints.keys().copied().collect()
    }
}

/// One client's view of a [`LoopbackHub`].
#[derive(Debug)]
pub struct LoopbackEndpoint {
    state: Rc<RefCell<HubState>>,
    client: ClientId,
}

impl Transport for LoopbackEndpoint {
    fn local_client(&self) -> ClientId {
        self.client
    }

    fn server_client(&self) -> ClientId {
        // A hub with any endpoint always has a server recorded.
        self.state.borrow().server.unwrap_or(self.client)
    }

    fn connected_clients(&self) -> Vec<ClientId> {
        self.state.borrow().endpoints.keys().copied().collect()
    }

    fn send(
        &mut self,
        code: EventCode,
        payload: &[u8],
        target: &MessageTarget,
        reliable: bool,
    ) -> TransportResult<()> {
        let mut state = self.state.borrow_mut();
        if !state.endpoints.contains_key(&self.client) {
            return Err(TransportError::NotConnected);
        }
        let server = state.server.unwrap_or(self.client);

        // Explicit addressing fails loudly on a stale client reference;
        // broadcast targets just skip absentees.
        if let MessageTarget::Clients(clients) = target {
            for client in clients {
                if !state.endpoints.contains_key(client) {
                    return Err(TransportError::UnknownClient { client: *client });
                }
            }
        }

        log::trace!(
            "loopback: {} -> {:?} code {} ({} bytes, reliable={reliable})",
            self.client.raw(),
            target,
            code.raw(),
            payload.len(),
        );
        let sender = self.client;
        for (client, queues) in &mut state.endpoints {
            if target.addresses(*client, sender, server) {
                queues.events.push_back(IncomingEvent {
                    sender,
                    code,
                    payload: payload.to_vec(),
                });
            }
        }
        Ok(())
    }

    fn poll_event(&mut self) -> Option<IncomingEvent> {
        self.state
            .borrow_mut()
            .endpoints
            .get_mut(&self.client)?
            .events
            .pop_front()
    }

    fn poll_joined(&mut self) -> Option<ClientId> {
        self.state
            .borrow_mut()
            .endpoints
            .get_mut(&self.client)?
            .joined
            .pop_front()
    }

    fn poll_left(&mut self) -> Option<ClientId> {
        self.state
            .borrow_mut()
            .endpoints
            .get_mut(&self.client)?
            .left
            .pop_front()
    }
}
