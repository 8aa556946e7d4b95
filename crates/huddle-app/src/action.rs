//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use huddle_proto::{ClientEvent, LoginRequest};

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Fetch the room directory. Completes with
    /// [`AppEvent::RoomsFetched`](crate::AppEvent::RoomsFetched) or
    /// [`AppEvent::RoomsFetchFailed`](crate::AppEvent::RoomsFetchFailed).
    FetchRooms,

    /// Log in. Completes with
    /// [`AppEvent::LoginSucceeded`](crate::AppEvent::LoginSucceeded) or
    /// [`AppEvent::LoginFailed`](crate::AppEvent::LoginFailed).
    Login(LoginRequest),

    /// Emit a socket event.
    Emit(ClientEvent),
}
