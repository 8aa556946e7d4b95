//! Wire types for the Huddle chat client.
//!
//! Everything the client exchanges with the chat server lives here:
//!
//! - [`model`]: records the server owns ([`User`], [`Room`], [`Message`]).
//! - [`events`]: typed socket events in both directions ([`ClientEvent`],
//!   [`ServerEvent`]) plus the REST [`LoginRequest`].
//! - [`packet`]: Engine.IO / Socket.IO v4 text framing ([`EnginePacket`],
//!   [`SocketPacket`]).
//!
//! The crate does no I/O. Decoding is total: malformed input becomes a
//! [`ProtocolError`], never a panic.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
pub mod events;
mod ids;
pub mod model;
pub mod packet;

pub use errors::{ProtocolError, Result};
pub use events::{ClientEvent, CreateRoom, JoinRoom, LoginRequest, RoomJoined, SendMessage, ServerEvent};
pub use ids::{MessageId, RoomId, UserId};
pub use model::{Message, Room, User};
pub use packet::{EnginePacket, Handshake, PacketKind, SocketPacket};
