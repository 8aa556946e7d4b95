//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::future::Future;

use huddle_core::Environment;
use huddle_proto::{ClientEvent, LoginRequest};

use crate::{App, AppEvent};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in the terminal and in simulation.
///
/// # Implementations
///
/// - **TUI**: crossterm key events, the connection inbox and REST calls on
///   spawned tasks
/// - **Simulation**: a scripted event queue that records every request
///
/// Requests ([`fetch_rooms`](Driver::fetch_rooms), [`login`](Driver::login))
/// must not block. Their results come back later through
/// [`next_event`](Driver::next_event).
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next inbox event.
    ///
    /// Returns `None` once the inbox is exhausted and the runtime should stop.
    fn next_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Start the room directory fetch.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be started.
    fn fetch_rooms(&mut self) -> Result<(), Self::Error>;

    /// Start a login call.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be started.
    fn login(&mut self, request: LoginRequest) -> Result<(), Self::Error>;

    /// Hand an event to the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is gone. The runtime reports it to
    /// the App instead of stopping.
    fn emit(&mut self, event: ClientEvent) -> Result<(), Self::Error>;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render<E: Environment>(&mut self, app: &App<E>) -> Result<(), Self::Error>;

    /// Close the connection and clean up resources.
    fn stop(&mut self);
}
