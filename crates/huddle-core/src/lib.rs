//! Core logic for the Huddle chat client.
//!
//! Everything here is free of network I/O so it can run unchanged in
//! production and in deterministic simulation:
//!
//! - [`Environment`]: clock, sleep and randomness ([`SystemEnv`] in
//!   production).
//! - [`Backoff`]: reconnect delay schedule.
//! - [`Connection`]: connection lifecycle state machine. Methods take inputs
//!   and return [`ConnectionAction`]s for the transport to execute.
//! - [`SocketEvent`]: what the transport delivers into the application inbox.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod backoff;
pub mod connection;
pub mod env;
pub mod error;
mod event;

pub use backoff::{Backoff, BackoffConfig};
pub use connection::{Connection, ConnectionAction, ConnectionState, ConnectionStatus};
pub use env::{Environment, SystemEnv};
pub use error::ConnectionError;
pub use event::SocketEvent;
