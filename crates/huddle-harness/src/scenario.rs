//! Synchronous scenario runner.
//!
//! Wraps the production [`Runtime`] around a [`SimDriver`] and feeds events
//! straight into it, so scenario and property tests need no async runtime.
//! Invariants are checked after every transition.

use std::cmp::Ordering;

use huddle_app::{App, AppAction, AppEvent, Focus, KeyInput, Runtime};
use huddle_core::{Environment, SocketEvent};
use huddle_proto::{ClientEvent, Room, RoomId, RoomJoined, ServerEvent, User};

use crate::{InvariantRegistry, SimDriver, SimDriverError, SimEnv};

/// One simulated client session.
pub struct Scenario {
    runtime: Runtime<SimDriver, SimEnv>,
    env: SimEnv,
    quit: bool,
}

impl Scenario {
    /// Start a session with the standard invariants and the given seed.
    ///
    /// # Errors
    ///
    /// Returns an error if an invariant fails during startup.
    pub fn start(seed: u64) -> Result<Self, SimDriverError> {
        let env = SimEnv::with_seed(seed);
        let driver = SimDriver::new().with_invariants(InvariantRegistry::standard());
        let mut runtime = Runtime::new(driver, env.clone());
        let quit = runtime.start()?;
        Ok(Self { runtime, env, quit })
    }

    /// Feed one event through the runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if an invariant fails.
    pub fn apply(&mut self, event: AppEvent) -> Result<(), SimDriverError> {
        if self.runtime.dispatch(event)? {
            self.quit = true;
        }
        Ok(())
    }

    /// Call an App intent and execute its actions.
    ///
    /// # Errors
    ///
    /// Returns an error if an invariant fails.
    pub fn intent(
        &mut self,
        intent: impl FnOnce(&mut App<SimEnv>) -> Vec<AppAction>,
    ) -> Result<(), SimDriverError> {
        let actions = intent(self.runtime.app_mut());
        if self.runtime.process_actions(actions)? {
            self.quit = true;
        }
        Ok(())
    }

    /// Press a key.
    ///
    /// # Errors
    ///
    /// Returns an error if an invariant fails.
    pub fn key(&mut self, key: KeyInput) -> Result<(), SimDriverError> {
        self.apply(AppEvent::Key(key))
    }

    /// Type `text` one character at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if an invariant fails.
    pub fn type_text(&mut self, text: &str) -> Result<(), SimDriverError> {
        text.chars().try_for_each(|c| self.key(KeyInput::Char(c)))
    }

    /// Deliver a server-pushed event.
    ///
    /// # Errors
    ///
    /// Returns an error if an invariant fails.
    pub fn server(&mut self, event: ServerEvent) -> Result<(), SimDriverError> {
        self.apply(AppEvent::Socket(SocketEvent::Server(event)))
    }

    /// Complete the startup directory fetch.
    ///
    /// # Errors
    ///
    /// Returns an error if an invariant fails.
    pub fn rooms_fetched(&mut self, rooms: Vec<Room>) -> Result<(), SimDriverError> {
        self.apply(AppEvent::RoomsFetched(rooms))
    }

    /// Fill in the login form, submit it and complete the call with `user`.
    ///
    /// Admin users also fill in `password`.
    ///
    /// # Errors
    ///
    /// Returns an error if an invariant fails.
    pub fn login(&mut self, user: User, password: &str) -> Result<(), SimDriverError> {
        self.type_text(&user.name)?;
        if user.is_admin {
            self.key(KeyInput::Ctrl('a'))?;
            self.key(KeyInput::Tab)?;
            self.type_text(password)?;
        }
        self.key(KeyInput::Enter)?;
        self.apply(AppEvent::LoginSucceeded(user))
    }

    /// Acknowledge a join of `room` with `history`.
    ///
    /// # Errors
    ///
    /// Returns an error if an invariant fails.
    pub fn acknowledge_join(
        &mut self,
        room: Room,
        history: Vec<huddle_proto::Message>,
    ) -> Result<(), SimDriverError> {
        self.server(ServerEvent::RoomJoined(RoomJoined { room, messages: history }))
    }

    /// Focus the room list, move the cursor onto `room_id` and press Enter.
    ///
    /// Unknown rooms are ignored. An open overlay or alert swallows the keys.
    ///
    /// # Errors
    ///
    /// Returns an error if an invariant fails.
    pub fn pick_room(&mut self, room_id: &RoomId) -> Result<(), SimDriverError> {
        let Some(target) = self.app().rooms().iter().position(|room| &room.id == room_id) else {
            return Ok(());
        };
        if self.app().focus() == Focus::Composer {
            self.key(KeyInput::Tab)?;
        }
        loop {
            let cursor = self.app().room_cursor();
            let key = match cursor.cmp(&target) {
                Ordering::Greater => KeyInput::Up,
                Ordering::Less => KeyInput::Down,
                Ordering::Equal => break,
            };
            self.key(key)?;
            if self.app().room_cursor() == cursor {
                break;
            }
        }
        self.key(KeyInput::Enter)
    }

    /// Take everything the App emitted so far.
    pub fn take_emits(&mut self) -> Vec<ClientEvent> {
        self.runtime.driver_mut().take_emits()
    }

    /// Whether the App asked to quit.
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Application state.
    pub fn app(&self) -> &App<SimEnv> {
        self.runtime.app()
    }

    /// Simulation driver.
    pub fn driver(&self) -> &SimDriver {
        self.runtime.driver()
    }

    /// Mutable simulation driver.
    pub fn driver_mut(&mut self) -> &mut SimDriver {
        self.runtime.driver_mut()
    }

    /// Shared virtual environment.
    pub fn env(&self) -> &SimEnv {
        &self.env
    }

    /// Current virtual time.
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.env.now()
    }
}
