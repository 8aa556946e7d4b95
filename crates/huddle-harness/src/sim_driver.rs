//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as `TerminalDriver` but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`huddle_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! Inbox events are scripted up front; every request the runtime makes is
//! recorded for assertions. When invariants are enabled they are checked on
//! every render, which the App requests after each transition.

use std::collections::VecDeque;

use huddle_app::{App, AppEvent, Driver, KeyInput};
use huddle_core::{ConnectionStatus, Environment, SocketEvent};
use huddle_proto::{ClientEvent, LoginRequest, ServerEvent};

use crate::invariants::{InvariantRegistry, SessionSnapshot, SystemSnapshot, Violation};

/// Error type for simulation driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimDriverError {
    /// Emits are set to fail.
    Disconnected,
    /// An invariant failed after a transition.
    Invariant(String),
}

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "connection closed"),
            Self::Invariant(detail) => write!(f, "invariant violation: {detail}"),
        }
    }
}

impl std::error::Error for SimDriverError {}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] trait so the same [`huddle_app::Runtime`]
/// orchestration code runs in both the terminal and simulation tests.
#[derive(Debug, Default)]
pub struct SimDriver {
    pending_events: VecDeque<AppEvent>,
    emits: Vec<ClientEvent>,
    logins: Vec<LoginRequest>,
    fetches: usize,
    renders: usize,
    fail_emits: bool,
    stopped: bool,
    invariants: Option<InvariantRegistry>,
    last_snapshot: Option<SessionSnapshot>,
}

impl SimDriver {
    /// Create a new simulation driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable invariant checking.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    /// Queue an `AppEvent` for processing.
    pub fn inject_event(&mut self, event: AppEvent) {
        self.pending_events.push_back(event);
    }

    /// Queue a key press.
    pub fn inject_key(&mut self, key: KeyInput) {
        self.inject_event(AppEvent::Key(key));
    }

    /// Queue one key press per character of `text`.
    pub fn inject_text(&mut self, text: &str) {
        for c in text.chars() {
            self.inject_key(KeyInput::Char(c));
        }
    }

    /// Queue a server-pushed event.
    pub fn inject_server(&mut self, event: ServerEvent) {
        self.inject_event(AppEvent::Socket(SocketEvent::Server(event)));
    }

    /// Queue a connection status change.
    pub fn inject_status(&mut self, status: ConnectionStatus) {
        self.inject_event(AppEvent::Socket(SocketEvent::Status(status)));
    }

    /// Make subsequent emits fail.
    pub fn fail_emits(&mut self, fail: bool) {
        self.fail_emits = fail;
    }

    /// Check if there are pending events to process.
    pub fn has_pending(&self) -> bool {
        !self.pending_events.is_empty()
    }

    /// Take all captured emits.
    pub fn take_emits(&mut self) -> Vec<ClientEvent> {
        std::mem::take(&mut self.emits)
    }

    /// Take all captured login requests.
    pub fn take_logins(&mut self) -> Vec<LoginRequest> {
        std::mem::take(&mut self.logins)
    }

    /// Number of directory fetches requested.
    pub fn fetches(&self) -> usize {
        self.fetches
    }

    /// Number of renders requested.
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// Whether the runtime stopped the driver.
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    /// Check invariants against App state, remembering it for the next check.
    ///
    /// # Errors
    ///
    /// Returns every violated invariant.
    pub fn check_invariants<E: Environment>(&mut self, app: &App<E>) -> Result<(), Vec<Violation>> {
        let Some(registry) = &self.invariants else {
            return Ok(());
        };

        let current = SessionSnapshot::from_app(app);
        let snapshot = match self.last_snapshot.replace(current.clone()) {
            Some(previous) => SystemSnapshot::transition(previous, current),
            None => SystemSnapshot::single(current),
        };
        registry.check_all(&snapshot)
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn next_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        Ok(self.pending_events.pop_front())
    }

    fn fetch_rooms(&mut self) -> Result<(), Self::Error> {
        self.fetches = self.fetches.saturating_add(1);
        Ok(())
    }

    fn login(&mut self, request: LoginRequest) -> Result<(), Self::Error> {
        self.logins.push(request);
        Ok(())
    }

    fn emit(&mut self, event: ClientEvent) -> Result<(), Self::Error> {
        if self.fail_emits {
            return Err(SimDriverError::Disconnected);
        }
        self.emits.push(event);
        Ok(())
    }

    fn render<E: Environment>(&mut self, app: &App<E>) -> Result<(), Self::Error> {
        self.renders = self.renders.saturating_add(1);
        self.check_invariants(app).map_err(|violations| {
            let detail: Vec<_> = violations.iter().map(ToString::to_string).collect();
            SimDriverError::Invariant(detail.join("; "))
        })
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
