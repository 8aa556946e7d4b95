//! Connection lifecycle state machine.
//!
//! Owns the reconnect policy for the single server connection. Uses the action
//! pattern: methods take inputs (including random samples) and return actions
//! for the transport to execute. No I/O happens here.
//!
//! # State Machine
//!
//! ```text
//! ┌──────┐ start ┌────────────┐  opened   ┌───────────┐
//! │ Idle │──────>│ Connecting │──────────>│ Connected │
//! └──────┘       └────────────┘           └───────────┘
//!                   ↑      │ failed             │ disconnected
//!     retry_elapsed │      ↓                    │
//!                ┌─────────────┐                │
//!                │   Waiting   │<───────────────┘
//!                └─────────────┘
//!
//!        shutdown (from any state) ──> Closed
//! ```

use std::time::Duration;

use crate::{
    backoff::{Backoff, BackoffConfig},
    error::ConnectionError,
};

/// Actions returned by the connection state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionAction {
    /// Open the WebSocket and run the handshake.
    Dial {
        /// Retry number, zero for the first dial.
        attempt: u32,
    },
    /// Sleep, then call [`Connection::retry_elapsed`].
    Wait {
        /// How long to wait.
        delay: Duration,
    },
    /// Tear down the open socket.
    Close,
}

/// Connection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Created, not yet started.
    Idle,
    /// Dial in progress.
    Connecting {
        /// Retry number, zero for the first dial.
        attempt: u32,
    },
    /// Handshake complete.
    Connected {
        /// Server-assigned session id.
        sid: String,
    },
    /// Backing off before the next dial.
    Waiting {
        /// Retry number of the upcoming dial.
        attempt: u32,
        /// Delay handed to the transport.
        delay: Duration,
    },
    /// Shut down for good.
    Closed,
}

/// Read-only connection snapshot exposed to the rest of the application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionStatus {
    /// Whether the socket is connected.
    pub connected: bool,
    /// Server-assigned session id while connected.
    pub sid: Option<String>,
}

impl ConnectionStatus {
    /// Connected snapshot.
    pub fn connected(sid: impl Into<String>) -> Self {
        Self { connected: true, sid: Some(sid.into()) }
    }

    /// Disconnected snapshot.
    pub fn disconnected() -> Self {
        Self::default()
    }
}

/// Connection state machine.
#[derive(Debug, Clone)]
pub struct Connection {
    state: ConnectionState,
    backoff: Backoff,
    last_error: Option<String>,
}

impl Connection {
    /// Create a connection in [`ConnectionState::Idle`].
    pub fn new(backoff: BackoffConfig) -> Self {
        Self { state: ConnectionState::Idle, backoff: Backoff::new(backoff), last_error: None }
    }

    /// Current state.
    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Snapshot for consumers.
    pub fn status(&self) -> ConnectionStatus {
        match &self.state {
            ConnectionState::Connected { sid } => ConnectionStatus::connected(sid.clone()),
            _ => ConnectionStatus::disconnected(),
        }
    }

    /// Most recent failure or disconnect reason.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Begin the first dial.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::InvalidState` unless idle
    pub fn start(&mut self) -> Result<Vec<ConnectionAction>, ConnectionError> {
        if self.state != ConnectionState::Idle {
            return Err(self.invalid("start"));
        }

        self.state = ConnectionState::Connecting { attempt: 0 };
        Ok(vec![ConnectionAction::Dial { attempt: 0 }])
    }

    /// Handshake completed with session id `sid`. Resets the backoff.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::InvalidState` unless connecting
    pub fn opened(&mut self, sid: impl Into<String>) -> Result<Vec<ConnectionAction>, ConnectionError> {
        if !matches!(self.state, ConnectionState::Connecting { .. }) {
            return Err(self.invalid("opened"));
        }

        self.backoff.reset();
        self.last_error = None;
        self.state = ConnectionState::Connected { sid: sid.into() };
        Ok(Vec::new())
    }

    /// Dial or handshake failed. Schedules a retry.
    ///
    /// `sample` is a uniform random value in `[0, 1)` used for jitter.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::InvalidState` unless connecting
    pub fn failed(&mut self, reason: &str, sample: f64) -> Result<Vec<ConnectionAction>, ConnectionError> {
        let ConnectionState::Connecting { attempt } = self.state else {
            return Err(self.invalid("failed"));
        };

        self.last_error = Some(reason.to_owned());
        Ok(self.schedule_retry(attempt.saturating_add(1), sample))
    }

    /// Established connection dropped. Schedules a reconnect.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::InvalidState` unless connected
    pub fn disconnected(&mut self, reason: &str, sample: f64) -> Result<Vec<ConnectionAction>, ConnectionError> {
        if !matches!(self.state, ConnectionState::Connected { .. }) {
            return Err(self.invalid("disconnected"));
        }

        self.last_error = Some(reason.to_owned());
        Ok(self.schedule_retry(1, sample))
    }

    /// Backoff delay has passed. Dial again.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::InvalidState` unless waiting
    pub fn retry_elapsed(&mut self) -> Result<Vec<ConnectionAction>, ConnectionError> {
        let ConnectionState::Waiting { attempt, .. } = self.state else {
            return Err(self.invalid("retry_elapsed"));
        };

        self.state = ConnectionState::Connecting { attempt };
        Ok(vec![ConnectionAction::Dial { attempt }])
    }

    /// Stop for good. Idempotent.
    pub fn shutdown(&mut self) -> Vec<ConnectionAction> {
        let was_connected = matches!(self.state, ConnectionState::Connected { .. });
        self.state = ConnectionState::Closed;

        if was_connected { vec![ConnectionAction::Close] } else { Vec::new() }
    }

    fn schedule_retry(&mut self, attempt: u32, sample: f64) -> Vec<ConnectionAction> {
        let delay = self.backoff.next_delay(sample);
        self.state = ConnectionState::Waiting { attempt, delay };
        vec![ConnectionAction::Wait { delay }]
    }

    fn invalid(&self, operation: &'static str) -> ConnectionError {
        ConnectionError::InvalidState { state: self.state.clone(), operation }
    }
}

impl Default for Connection {
    fn default() -> Self {
        Self::new(BackoffConfig::default())
    }
}
