//! Error types for the connection layer.

use std::time::Duration;

use thiserror::Error;

use crate::connection::ConnectionState;

/// Errors that can occur while driving the connection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// Invalid state transition attempted
    #[error("invalid state transition: cannot {operation} from {state:?}")]
    InvalidState {
        /// Current state when error occurred
        state: ConnectionState,
        /// Operation that was attempted
        operation: &'static str,
    },

    /// Server stopped sending heartbeats
    #[error("heartbeat timeout after {elapsed:?}")]
    HeartbeatTimeout {
        /// How long the link was silent
        elapsed: Duration,
    },

    /// Server refused the namespace connection
    #[error("connection rejected: {0}")]
    Rejected(String),

    /// Peer sent something we cannot parse
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Underlying transport error
    #[error("transport error: {0}")]
    Transport(String),
}

impl ConnectionError {
    /// Returns true if this error is transient and may succeed on retry.
    ///
    /// Network failures and heartbeat loss are transient. A server that
    /// rejects us or speaks a protocol we cannot parse will keep doing so.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::HeartbeatTimeout { .. } | Self::Transport(_))
    }
}

impl From<huddle_proto::ProtocolError> for ConnectionError {
    fn from(err: huddle_proto::ProtocolError) -> Self {
        Self::Protocol(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_are_transient() {
        assert!(ConnectionError::HeartbeatTimeout { elapsed: Duration::from_secs(45) }.is_transient());
        assert!(ConnectionError::Transport("connection refused".to_string()).is_transient());
    }

    #[test]
    fn protocol_violations_are_fatal() {
        assert!(
            !ConnectionError::InvalidState { state: ConnectionState::Idle, operation: "opened" }.is_transient()
        );
        assert!(!ConnectionError::Rejected("not authorized".to_string()).is_transient());
        assert!(!ConnectionError::from(huddle_proto::ProtocolError::EmptyPacket).is_transient());
    }
}
