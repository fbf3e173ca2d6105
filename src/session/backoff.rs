//! Reconnect delays: capped exponential growth with jitter.

use std::time::Duration;

use rand::Rng;

use crate::config::ReconnectConfig;

/// Delay schedule between reconnect attempts.
///
/// Each call to [`next_delay`](Self::next_delay) returns a random delay in
/// `[base / 2, base]` and then grows `base` by the multiplier, up to `max`.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    multiplier: f64,
    base: Duration,
    attempts: u32,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration, multiplier: f64) -> Self {
        Self {
            initial,
            max,
            multiplier,
            base: initial.min(max),
            attempts: 0,
        }
    }

    pub fn from_config(config: &ReconnectConfig) -> Self {
        Self::new(
            Duration::from_millis(config.initial_delay_ms),
            Duration::from_secs(config.max_delay_secs),
            config.multiplier,
        )
    }

    /// Un-jittered delay the next attempt is drawn from.
    pub fn base(&self) -> Duration {
        self.base
    }

    /// Attempts since the last reset.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn next_delay(&mut self) -> Duration {
        let base = self.base;
        self.attempts = self.attempts.saturating_add(1);
        self.base = Duration::try_from_secs_f64(base.as_secs_f64() * self.multiplier)
            .map_or(self.max, |next| next.min(self.max));

        let factor = rand::thread_rng().gen_range(0.5..=1.0);
        base.mul_f64(factor)
    }

    /// Back to the initial delay; called once a connection is fully joined.
    pub fn reset(&mut self) {
        self.base = self.initial.min(self.max);
        self.attempts = 0;
    }
}
