//! Protocol error types.

use thiserror::Error;

/// Errors produced while encoding or decoding wire data.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Received an empty text frame.
    #[error("empty packet")]
    EmptyPacket,

    /// Leading type digit is not a known packet type.
    #[error("unknown {layer} packet type {found:?}")]
    UnknownPacketType {
        /// Which framing layer rejected the packet (`engine.io` / `socket.io`).
        layer: &'static str,
        /// Offending character.
        found: char,
    },

    /// Packet kind this client does not speak (binary attachments, etc.).
    #[error("unsupported packet: {0}")]
    Unsupported(&'static str),

    /// Packet structure is invalid.
    #[error("malformed packet: {0}")]
    Malformed(String),

    /// JSON body failed to encode or decode.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
