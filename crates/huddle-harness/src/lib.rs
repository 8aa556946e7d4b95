//! Deterministic simulation harness for the Huddle session state machine.
//!
//! Runs the production [`huddle_app::Runtime`] against a scripted
//! [`SimDriver`] with a virtual clock and seeded RNG ([`SimEnv`]), so every
//! scenario is reproducible.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the session
//! invariants; [`Scenario`] checks them after every transition.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod invariants;
pub mod scenario;
pub mod sim_driver;
pub mod sim_env;

pub use invariants::{
    AdminAlwaysSendsAsAdmin, Invariant, InvariantRegistry, InvariantResult, MessagesMatchSelection,
    NoMessagesWithoutRoom, PromptOnlyForUnjoined, SessionSnapshot, SingleJoinNotice, SystemSnapshot, Violation,
};
pub use scenario::Scenario;
pub use sim_driver::{SimDriver, SimDriverError};
pub use sim_env::SimEnv;
