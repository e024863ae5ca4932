//! Addressing for outgoing events.

use codec::ClientId;

/// Who should receive an outgoing event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageTarget {
    /// Every connected client except the sender.
    Others,

    /// Every connected client including the sender (loopback delivery).
    All,

    /// The authoritative peer only.
    Server,

    /// An explicit set of clients.
    Clients(Vec<ClientId>),
}

impl MessageTarget {
    /// Returns `true` if `client` is addressed by this target.
    ///
    /// `sender` and `server` identify the sending client and the
    /// authoritative peer within the session.
    #[must_use]
    pub fn addresses(&self, client: ClientId, sender: ClientId, server: ClientId) -> bool {
        match self {
            Self::Others => client != sender,
            Self::All => true,
            Self::Server => client == server,
            Self::Clients(clients) => clients.contains(&client),
        }
    }
}
