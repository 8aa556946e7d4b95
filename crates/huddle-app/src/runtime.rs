//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: session state machine
//! - [`Driver`]: Platform-specific I/O

use huddle_core::Environment;

use crate::{App, AppAction, AppEvent, Driver};

/// Generic runtime that orchestrates App and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment for timestamps
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    app: App<E>,
    started: bool,
}

impl<D, E> Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    /// Create a new runtime with the given driver and environment.
    pub fn new(driver: D, env: E) -> Self {
        Self { driver, app: App::new(env), started: false }
    }

    /// Run the main event loop.
    ///
    /// 1. Renders and issues the startup directory fetch
    /// 2. Feeds each inbox event to the App
    /// 3. Executes the resulting actions through the driver
    ///
    /// Stops on [`AppAction::Quit`] or when the inbox is exhausted, then
    /// returns the stopped driver so the caller can finish async cleanup.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<D, D::Error> {
        let outcome = self.run_loop().await;
        self.driver.stop();
        outcome.map(|()| self.driver)
    }

    async fn run_loop(&mut self) -> Result<(), D::Error> {
        if self.start()? {
            return Ok(());
        }

        while self.step().await? {}
        Ok(())
    }

    /// Issue the startup actions. Idempotent.
    ///
    /// Returns `true` if the application should quit.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails.
    pub fn start(&mut self) -> Result<bool, D::Error> {
        if self.started {
            return Ok(false);
        }
        self.started = true;

        self.driver.render(&self.app)?;
        let actions = self.app.start();
        self.process_actions(actions)
    }

    /// Process one inbox event.
    ///
    /// Returns `false` when the loop should end, either because the App quit
    /// or the inbox is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails.
    pub async fn step(&mut self) -> Result<bool, D::Error> {
        let Some(event) = self.driver.next_event().await? else {
            tracing::debug!("inbox exhausted");
            return Ok(false);
        };

        let should_quit = self.dispatch(event)?;
        Ok(!should_quit)
    }

    /// Feed an event to the App and execute the resulting actions.
    ///
    /// Returns `true` if the application should quit.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails.
    pub fn dispatch(&mut self, event: AppEvent) -> Result<bool, D::Error> {
        let actions = self.app.handle(event);
        self.process_actions(actions)
    }

    /// Execute actions returned by the App.
    ///
    /// Emit failures are fed back to the App as [`AppEvent::EmitFailed`],
    /// whose actions join the queue.
    ///
    /// Returns `true` if should quit.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails.
    pub fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),
                    AppAction::FetchRooms => self.driver.fetch_rooms()?,
                    AppAction::Login(request) => self.driver.login(request)?,
                    AppAction::Emit(event) => {
                        let name = event.name();
                        if let Err(error) = self.driver.emit(event) {
                            tracing::warn!(event = name, %error, "emit failed");
                            let failed = AppEvent::EmitFailed { event: name.to_owned(), reason: error.to_string() };
                            pending_actions.extend(self.app.handle(failed));
                        }
                    },
                }
            }
        }
        Ok(false)
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App<E> {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App<E> {
        &mut self.app
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a mutable reference to the Driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
