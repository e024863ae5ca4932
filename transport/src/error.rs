//! Error types for transport operations.

use std::fmt;

use wire::ClientId;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors raised by a transport endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportError {
    /// The endpoint is no longer connected to its hub.
    NotConnected,

    /// An explicitly addressed client is not connected.
    UnknownClient { client: ClientId },

    /// A client ID was connected twice.
    AlreadyConnected { client: ClientId },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "endpoint is not connected"),
            Self::UnknownClient { client } => {
                write!(f, "unknown client: {}", client.raw())
            }
            Self::AlreadyConnected { client } => {
                write!(f, "client already connected: {}", client.raw())
            }
        }
    }
}

impl std::error::Error for TransportError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            TransportError::NotConnected.to_string(),
            "endpoint is not connected"
        );
        assert!(TransportError::UnknownClient {
            client: ClientId::new(9)
        }
        .to_string()
        .contains('9'));
    }
}
