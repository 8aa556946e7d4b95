//! Events the connection delivers into the application inbox.

use huddle_proto::ServerEvent;

use crate::connection::ConnectionStatus;

/// Something the connection layer observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// Connectivity changed.
    Status(ConnectionStatus),
    /// Server pushed a subscribed event.
    Server(ServerEvent),
    /// Server pushed a subscribed event whose payload failed to decode.
    Malformed {
        /// Event name.
        event: String,
        /// Decode error.
        reason: String,
    },
}
