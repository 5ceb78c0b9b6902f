//! Retry and circuit breaking around single outbound calls.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use super::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
use super::error::{RateError, UnavailableCause};

/// Fixed-delay retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    /// Pause between consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(600),
        }
    }
}

/// Frees a half-open probe slot if the attempt is dropped before it
/// reports an outcome.
struct AttemptGuard<'a> {
    breaker: &'a CircuitBreaker,
    settled: bool,
}

impl AttemptGuard<'_> {
    fn success(mut self) {
        self.settled = true;
        self.breaker.record_success();
    }

    fn failure(mut self) {
        self.settled = true;
        self.breaker.record_failure();
    }
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker.release_probe();
        }
    }
}

/// Bounded retry plus a circuit breaker, shared by every request that goes
/// through the same provider.
#[derive(Debug, Default)]
pub struct ResiliencePolicy {
    retry: RetryConfig,
    breaker: CircuitBreaker,
}

impl ResiliencePolicy {
    pub fn new(retry: RetryConfig, breaker: CircuitBreakerConfig) -> Self {
        Self {
            retry,
            breaker: CircuitBreaker::new(breaker),
        }
    }

    pub fn circuit_state(&self) -> CircuitState {
        self.breaker.state()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.breaker.consecutive_failures()
    }

    /// Runs `operation` until it succeeds, attempts run out, or the
    /// breaker refuses. Every failed attempt is counted once by the breaker.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, RateError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, UnavailableCause>>,
    {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            if !self.breaker.allow_request() {
                debug!(attempt, "Circuit open, failing fast");
                return Err(RateError::unavailable(UnavailableCause::CircuitOpen));
            }

            let guard = AttemptGuard {
                breaker: &self.breaker,
                settled: false,
            };
            match operation().await {
                Ok(value) => {
                    guard.success();
                    return Ok(value);
                }
                Err(cause) => {
                    guard.failure();
                    if attempt >= max_attempts {
                        warn!(attempts = attempt, %cause, "Upstream call failed, giving up");
                        return Err(RateError::unavailable(cause));
                    }
                    debug!(
                        "Attempt {}/{} failed: {}. Retrying...",
                        attempt, max_attempts, cause
                    );
                    attempt += 1;
                    tokio::time::sleep(self.retry.delay).await;
                }
            }
        }
    }
}
