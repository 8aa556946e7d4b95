//! Reconnect delay schedule.
//!
//! Exponential backoff with randomization, matching the socket.io client
//! defaults: the n-th retry waits `initial * 2^n`, shifted up or down by up to
//! `jitter` of itself, and never longer than `max`.

use std::time::Duration;

/// Default delay before the first retry.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1_000);

/// Default upper bound on any single retry delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(10_000);

/// Default randomization factor.
pub const DEFAULT_JITTER: f64 = 0.5;

/// Backoff parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffConfig {
    /// Delay before the first retry.
    pub initial: Duration,
    /// Upper bound on any single delay.
    pub max: Duration,
    /// Randomization factor in `[0, 1]`. Zero disables jitter.
    pub jitter: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self { initial: DEFAULT_INITIAL_DELAY, max: DEFAULT_MAX_DELAY, jitter: DEFAULT_JITTER }
    }
}

/// Retry counter producing successive delays.
///
/// Pure: the caller supplies the random sample so simulated runs are
/// reproducible.
#[derive(Debug, Clone)]
pub struct Backoff {
    config: BackoffConfig,
    attempts: u32,
}

impl Backoff {
    /// Create a backoff with zero attempts recorded.
    pub fn new(config: BackoffConfig) -> Self {
        Self { config, attempts: 0 }
    }

    /// Number of delays handed out since the last reset.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Delay for the next retry. `sample` must be in `[0, 1)`.
    pub fn next_delay(&mut self, sample: f64) -> Duration {
        let exponent = i32::try_from(self.attempts).unwrap_or(i32::MAX);
        self.attempts = self.attempts.saturating_add(1);

        let max_ms = self.config.max.as_millis() as f64;
        let mut ms = self.config.initial.as_millis() as f64 * 2f64.powi(exponent);

        let jitter = self.config.jitter.clamp(0.0, 1.0);
        if jitter > 0.0 {
            let sample = sample.clamp(0.0, 1.0);
            let deviation = (sample * jitter * ms).floor();
            // Odd tenths push the delay up, even tenths pull it down.
            if (sample * 10.0).floor() as u64 % 2 == 0 {
                ms -= deviation;
            } else {
                ms += deviation;
            }
        }

        Duration::from_millis(ms.min(max_ms).max(0.0) as u64)
    }

    /// Forget previous attempts. Called after a successful connection.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(BackoffConfig::default())
    }
}
