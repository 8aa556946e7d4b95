//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. The chat server is reached
//! through the [`ConnectionManager`] (socket events) and the
//! [`DirectoryClient`] (REST calls on spawned tasks).

use std::{
    io::{self, Stdout, stdout},
    time::Duration,
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use huddle_app::{App, AppEvent, Driver, KeyInput};
use huddle_client::{ClientConfig, ConnectionManager, DirectoryClient, TransportError};
use huddle_core::{Environment, SocketEvent, SystemEnv};
use huddle_proto::{ClientEvent, LoginRequest};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::ui;

/// Interval between ticks when nothing else happens.
const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Connection error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Multiplexes key presses, the connection inbox and completed REST calls
/// into one stream of [`AppEvent`]s.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    connection: Option<ConnectionManager>,
    inbox: mpsc::Receiver<SocketEvent>,
    inbox_open: bool,
    directory: DirectoryClient,
    results_tx: mpsc::UnboundedSender<AppEvent>,
    results_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl TerminalDriver {
    /// Enter raw mode, switch to the alternate screen and start connecting.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(config: &ClientConfig) -> Result<Self, TerminalError> {
        Self::with_env(config, SystemEnv::new())
    }

    /// Like [`TerminalDriver::new`] with a custom connection environment.
    pub fn with_env<E: Environment>(config: &ClientConfig, env: E) -> Result<Self, TerminalError> {
        let (connection, inbox) = ConnectionManager::spawn(config.socket.clone(), env);
        let (results_tx, results_rx) = mpsc::unbounded_channel();

        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            event_stream: EventStream::new(),
            connection: Some(connection),
            inbox,
            inbox_open: true,
            directory: DirectoryClient::new(config.api_url.clone()),
            results_tx,
            results_rx,
        })
    }

    /// Close the connection gracefully.
    ///
    /// The terminal is restored when the driver drops.
    pub async fn shutdown(mut self) {
        if let Some(connection) = self.connection.take() {
            connection.shutdown().await;
        }
    }

    fn handle_terminal_event(event: Event) -> Option<AppEvent> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => convert_key(key).map(AppEvent::Key),
            Event::Resize(cols, rows) => Some(AppEvent::Resize(cols, rows)),
            _ => None,
        }
    }
}

/// Convert a crossterm key event to a [`KeyInput`].
pub fn convert_key(key: KeyEvent) -> Option<KeyInput> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char(c) => Some(KeyInput::Ctrl(c.to_ascii_lowercase())),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(c) => Some(KeyInput::Char(c)),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Delete => Some(KeyInput::Delete),
        KeyCode::Tab => Some(KeyInput::Tab),
        KeyCode::Esc => Some(KeyInput::Esc),
        KeyCode::Left => Some(KeyInput::Left),
        KeyCode::Right => Some(KeyInput::Right),
        KeyCode::Up => Some(KeyInput::Up),
        KeyCode::Down => Some(KeyInput::Down),
        KeyCode::Home => Some(KeyInput::Home),
        KeyCode::End => Some(KeyInput::End),
        _ => None,
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn next_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        loop {
            let event = tokio::select! {
                biased;

                // Terminal events
                maybe_event = self.event_stream.next() => match maybe_event {
                    Some(Ok(event)) => Self::handle_terminal_event(event),
                    Some(Err(e)) => return Err(TerminalError::Io(e)),
                    None => return Ok(None),
                },

                // Completed REST calls
                Some(result) = self.results_rx.recv() => Some(result),

                // Connection inbox
                maybe_event = self.inbox.recv(), if self.inbox_open => match maybe_event {
                    Some(event) => Some(AppEvent::Socket(event)),
                    None => {
                        tracing::warn!("connection task ended, running without a socket");
                        self.inbox_open = false;
                        None
                    },
                },

                // Tick timeout
                () = tokio::time::sleep(TICK_INTERVAL) => Some(AppEvent::Tick),
            };

            if let Some(event) = event {
                return Ok(Some(event));
            }
        }
    }

    fn fetch_rooms(&mut self) -> Result<(), Self::Error> {
        let directory = self.directory.clone();
        let results = self.results_tx.clone();
        tokio::spawn(async move {
            let event = match directory.fetch_rooms().await {
                Ok(rooms) => AppEvent::RoomsFetched(rooms),
                Err(error) => AppEvent::RoomsFetchFailed { reason: error.to_string() },
            };
            let _ = results.send(event);
        });
        Ok(())
    }

    fn login(&mut self, request: LoginRequest) -> Result<(), Self::Error> {
        let directory = self.directory.clone();
        let results = self.results_tx.clone();
        tokio::spawn(async move {
            let event = match directory.login(&request).await {
                Ok(user) => AppEvent::LoginSucceeded(user),
                Err(error) => AppEvent::LoginFailed { reason: error.to_string() },
            };
            let _ = results.send(event);
        });
        Ok(())
    }

    fn emit(&mut self, event: ClientEvent) -> Result<(), Self::Error> {
        match &self.connection {
            Some(connection) => Ok(connection.emit(event)?),
            None => Err(TransportError::Closed("connection stopped".into()).into()),
        }
    }

    fn render<E: Environment>(&mut self, app: &App<E>) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| ui::render(frame, app))?;
        Ok(())
    }

    fn stop(&mut self) {
        tracing::debug!("terminal driver stopping");
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
