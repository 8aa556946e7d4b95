//! Application layer for Huddle
//!
//! Pure session state machine and generic runtime, enabling deterministic
//! simulation testing with the same code that runs in the terminal.
//!
//! # Components
//!
//! - [`App`]: session state machine (login, room selection, joins, messages)
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver
//! - [`TextInput`]: cursor-aware single-line editor used by every text field

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod debug_log;
mod driver;
mod event;
mod input;
mod runtime;
mod state;
mod text_input;

pub use action::AppAction;
pub use app::App;
pub use debug_log::{DebugEntry, DebugLog};
pub use driver::Driver;
pub use event::AppEvent;
pub use input::KeyInput;
pub use runtime::Runtime;
pub use state::{Focus, LoginField, LoginForm, Overlay, Session};
pub use text_input::TextInput;
