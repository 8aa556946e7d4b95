//! Network I/O for the Huddle chat client.
//!
//! Two thin layers over the pure types in `huddle-core` and `huddle-proto`:
//!
//! - [`ConnectionManager`]: owns the single Socket.IO connection. A background
//!   task dials, handshakes, answers heartbeats, reconnects with backoff and
//!   delivers [`SocketEvent`](huddle_core::SocketEvent)s into an inbox.
//! - [`DirectoryClient`]: the REST calls (`GET /rooms`, `POST /users`).

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod directory;
mod error;
mod socket;

pub use config::{ClientConfig, DEFAULT_API_URL, DEFAULT_SERVER_URL, SocketConfig};
pub use directory::DirectoryClient;
pub use error::{ApiError, TransportError};
pub use socket::ConnectionManager;
