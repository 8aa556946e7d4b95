//! Client error types.

use std::time::Duration;

use huddle_core::ConnectionError;
use huddle_proto::ProtocolError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Socket transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Server URL cannot be turned into a WebSocket endpoint.
    #[error("invalid server url: {0}")]
    InvalidUrl(String),

    /// WebSocket layer failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// Peer sent an unparseable packet.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Engine.IO / Socket.IO handshake did not complete.
    #[error("handshake failed: {0}")]
    Handshake(String),

    /// Server refused the namespace connection.
    #[error("connection rejected: {0}")]
    Rejected(String),

    /// Server went silent.
    #[error("heartbeat timeout after {0:?}")]
    HeartbeatTimeout(Duration),

    /// Socket or connection task is gone.
    #[error("connection closed: {0}")]
    Closed(String),
}

impl From<TransportError> for ConnectionError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::InvalidUrl(_) | TransportError::Protocol(_) => Self::Protocol(err.to_string()),
            TransportError::WebSocket(tungstenite::Error::Url(_)) => Self::Protocol(err.to_string()),
            TransportError::Rejected(reason) => Self::Rejected(reason),
            TransportError::HeartbeatTimeout(elapsed) => Self::HeartbeatTimeout { elapsed },
            TransportError::WebSocket(_) | TransportError::Handshake(_) | TransportError::Closed(_) => {
                Self::Transport(err.to_string())
            },
        }
    }
}

/// REST directory errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Server answered with a non-success status.
    #[error("Failed to {operation}: {status}")]
    Status {
        /// What was attempted (`fetch rooms`, `login`).
        operation: &'static str,
        /// HTTP status code.
        status: u16,
    },

    /// Request could not be sent or the body could not be decoded.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}
