//! Retry policy for download attempts
//!
//! By default an operation is retried until it succeeds, with no delay between
//! attempts. A policy can instead cap the number of attempts and wait between
//! them, growing the delay by a backoff multiplier up to a maximum.
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroU32;
//! use workshop_sync::retry::{Attempt, RetryPolicy};
//!
//! let policy = RetryPolicy::bounded(NonZeroU32::new(3).unwrap());
//! let mut codes = vec![0, 7, 7].into_iter().rev();
//! let retried = policy
//!     .run(|_| {
//!         let code = codes.next().unwrap_or(0);
//!         Ok::<_, std::io::Error>(if code == 0 { Attempt::Done(code) } else { Attempt::Retry(code) })
//!     })
//!     .unwrap();
//! assert_eq!(retried.attempts, 3);
//! assert!(!retried.exhausted);
//! ```

use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;

use log::debug;

/// Longest delay the backoff will grow to.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(300);

/// Factor applied to the delay after each failed attempt.
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// How often and how patiently an operation is retried.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, `None` for unbounded
    pub max_attempts: Option<NonZeroU32>,
    /// Delay before the second attempt
    pub initial_delay: Duration,
    /// Upper bound for the delay between attempts
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each failure
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Outcome of a single attempt, as seen by [`RetryPolicy::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    /// The attempt succeeded; stop retrying.
    Done(T),
    /// The attempt failed in a way worth retrying.
    Retry(T),
}

/// Final value of a retried operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retried<T> {
    /// Value of the last attempt
    pub value: T,
    /// Number of attempts made
    pub attempts: u32,
    /// True when the policy gave up on a retryable failure
    pub exhausted: bool,
}

impl RetryPolicy {
    /// Retry forever, immediately.
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            initial_delay: Duration::ZERO,
            max_delay: DEFAULT_MAX_DELAY,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }

    /// Give up after `max_attempts` attempts.
    pub fn bounded(max_attempts: NonZeroU32) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            ..Self::unbounded()
        }
    }

    /// Wait `delay` before the second attempt, backing off from there.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_attempts.is_none()
    }

    /// Whether another attempt may follow `attempts_made` attempts.
    pub fn allows_another(&self, attempts_made: u32) -> bool {
        match self.max_attempts {
            None => true,
            Some(max) => attempts_made < max.get(),
        }
    }

    /// Delay to wait after the `failed_attempts`-th consecutive failure.
    pub fn delay_after(&self, failed_attempts: u32) -> Duration {
        if self.initial_delay.is_zero() || failed_attempts == 0 {
            return Duration::ZERO;
        }
        let exponent = (failed_attempts - 1).min(i32::MAX as u32) as i32;
        let secs = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        if !secs.is_finite() || secs >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        // a negative multiplier flips the sign on odd exponents
        Duration::from_secs_f64(secs.max(0.0))
    }

    /// Run `operation` until it reports [`Attempt::Done`] or the policy gives up.
    ///
    /// The closure receives the 1-based attempt number. Errors returned by the
    /// closure are not retried; they end the run immediately.
    pub fn run<T, E, F>(&self, mut operation: F) -> Result<Retried<T>, E>
    where
        F: FnMut(u32) -> Result<Attempt<T>, E>,
    {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match operation(attempts)? {
                Attempt::Done(value) => {
                    return Ok(Retried {
                        value,
                        attempts,
                        exhausted: false,
                    })
                }
                Attempt::Retry(value) => {
                    if !self.allows_another(attempts) {
                        return Ok(Retried {
                            value,
                            attempts,
                            exhausted: true,
                        });
                    }
                    let delay = self.delay_after(attempts);
                    if !delay.is_zero() {
                        debug!("Waiting {:?} before attempt {}", delay, attempts + 1);
                        thread::sleep(delay);
                    }
                }
            }
        }
    }
}
