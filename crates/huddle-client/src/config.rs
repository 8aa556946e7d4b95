//! Client configuration.

use std::time::Duration;

use huddle_core::BackoffConfig;

use crate::error::TransportError;

/// Default chat server (socket) URL.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Default REST directory URL.
pub const DEFAULT_API_URL: &str = "http://localhost:4000";

/// Socket connection settings.
#[derive(Debug, Clone)]
pub struct SocketConfig {
    /// Server base URL (`http`, `https`, `ws` or `wss`).
    pub server_url: String,
    /// Reconnect schedule.
    pub reconnect: BackoffConfig,
    /// Time allowed from dial to Socket.IO connect acknowledgment.
    pub handshake_timeout: Duration,
    /// Capacity of the inbox channel handed to the application.
    pub inbox_capacity: usize,
}

impl SocketConfig {
    /// Engine.IO WebSocket endpoint for [`Self::server_url`].
    ///
    /// # Errors
    ///
    /// - `TransportError::InvalidUrl` for schemes other than http(s)/ws(s)
    pub fn websocket_url(&self) -> Result<String, TransportError> {
        let url = self.server_url.trim().trim_end_matches('/');
        let (scheme, rest) =
            url.split_once("://").ok_or_else(|| TransportError::InvalidUrl(self.server_url.clone()))?;

        let scheme = match scheme.to_ascii_lowercase().as_str() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            _ => return Err(TransportError::InvalidUrl(self.server_url.clone())),
        };
        if rest.is_empty() {
            return Err(TransportError::InvalidUrl(self.server_url.clone()));
        }

        Ok(format!("{scheme}://{rest}/socket.io/?EIO=4&transport=websocket"))
    }
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_owned(),
            reconnect: BackoffConfig::default(),
            handshake_timeout: Duration::from_secs(20),
            inbox_capacity: 256,
        }
    }
}

/// Everything the client needs to reach the chat service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Socket connection settings.
    pub socket: SocketConfig,
    /// REST directory base URL.
    pub api_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { socket: SocketConfig::default(), api_url: DEFAULT_API_URL.to_owned() }
    }
}
