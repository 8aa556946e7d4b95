//! Environment abstraction for deterministic testing.
//!
//! Decouples client logic from system resources (wall clock, sleeping,
//! randomness). Production uses [`SystemEnv`]; the simulation harness supplies
//! a virtual clock and a seeded RNG.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::RngCore;

/// Abstract environment providing time, randomness, and async primitives.
///
/// Implementations MUST guarantee that `now()` never goes backwards within a
/// single execution context.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Current wall-clock time.
    ///
    /// Used for debug-trace timestamps and synthetic message ids.
    fn now(&self) -> DateTime<Utc>;

    /// Sleeps for the specified duration.
    ///
    /// Only driver code awaits this; state machines never do.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;

    /// Fills the provided buffer with random bytes.
    ///
    /// Given the same seed, simulated environments produce the same sequence.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random `u64`.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }

    /// Generates a uniformly distributed value in `[0, 1)`.
    ///
    /// Backoff jitter consumes this.
    fn random_unit(&self) -> f64 {
        // 53 bits fill an f64 mantissa exactly.
        (self.random_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Production environment backed by the system clock, tokio timers and OS
/// randomness.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        if let Err(error) = getrandom::fill(buffer) {
            // Randomness here only spreads reconnect timing; a userspace CSPRNG
            // is an acceptable substitute.
            tracing::warn!(%error, "OS randomness unavailable, falling back to thread RNG");
            rand::thread_rng().fill_bytes(buffer);
        }
    }
}
