//! Application input events.
//!
//! This module defines [`AppEvent`], the complete set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from three sources:
//! - User interactions (keyboard) and system ticks.
//! - The connection inbox (status changes and server-pushed events).
//! - Completed REST calls started by [`crate::AppAction`]s.

use huddle_core::SocketEvent;
use huddle_proto::{Room, User};

use crate::KeyInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Periodic tick.
    Tick,

    /// Terminal resized (columns, rows).
    Resize(u16, u16),

    /// Something arrived from the connection.
    Socket(SocketEvent),

    /// Directory fetch completed.
    RoomsFetched(Vec<Room>),

    /// Directory fetch failed.
    RoomsFetchFailed {
        /// Error description.
        reason: String,
    },

    /// Login completed.
    LoginSucceeded(User),

    /// Login failed.
    LoginFailed {
        /// Error description.
        reason: String,
    },

    /// An emit could not be handed to the connection.
    EmitFailed {
        /// Event name.
        event: String,
        /// Error description.
        reason: String,
    },
}
