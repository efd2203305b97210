//! Retry and backoff for PDF fetches.
//!
//! Every failure is retried: a cause list link either works after a short
//! wait or the run reports it missing. The delay doubles after each failed
//! attempt, starting from `base_delay`.

use std::fmt;
use std::time::Duration;

/// Failure of a single fetch attempt.
#[derive(Debug)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, DNS, ...).
    Curl(curl::Error),
    /// Response had a non-2xx status.
    Http(u32),
    /// Body could not be written to the destination.
    Storage(std::io::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Curl(e) => write!(f, "{}", e),
            FetchError::Http(code) => write!(f, "HTTP {}", code),
            FetchError::Storage(e) => write!(f, "storage: {}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Curl(e) => Some(e),
            FetchError::Storage(e) => Some(e),
            FetchError::Http(_) => None,
        }
    }
}

impl From<curl::Error> for FetchError {
    fn from(e: curl::Error) -> Self {
        FetchError::Curl(e)
    }
}

/// Attempt cap and doubling backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). 0 behaves as 1.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Wait after the failed attempt with 0-based index `index`:
    /// `base_delay * 2^index`, saturating.
    pub fn delay_after(&self, index: u32) -> Duration {
        let factor = 1u32.checked_shl(index).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

/// Outcome of [`run_with_retry`].
#[derive(Debug)]
pub enum Retried<T> {
    /// Succeeded on the given 1-based attempt.
    Done { value: T, attempt: u32 },
    /// Every attempt failed; `last` is the final error.
    Exhausted { attempts: u32, last: FetchError },
}

/// Runs `f` until it succeeds or the policy's attempts are used up.
///
/// `on_retry` is called with (1-based attempt, error, wait) before each
/// sleep. No sleep follows the final attempt.
pub fn run_with_retry<T, F, R>(policy: &RetryPolicy, mut f: F, mut on_retry: R) -> Retried<T>
where
    F: FnMut() -> Result<T, FetchError>,
    R: FnMut(u32, &FetchError, Duration),
{
    let attempts = policy.attempts();
    let mut index = 0u32;
    loop {
        match f() {
            Ok(value) => {
                return Retried::Done {
                    value,
                    attempt: index + 1,
                }
            }
            Err(e) if index + 1 < attempts => {
                let wait = policy.delay_after(index);
                on_retry(index + 1, &e, wait);
                std::thread::sleep(wait);
                index += 1;
            }
            Err(last) => return Retried::Exhausted { attempts, last },
        }
    }
}
