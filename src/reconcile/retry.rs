//! Rate-limit retry and pacing policy shared by both reconciliation
//! strategies.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{BotError, Result};

/// Policy wrapping every remote call issued during a reconciliation run.
///
/// The pacing delay is awaited after every attempt, success or not, to stay
/// under the API rate limit. A 429 from the API is not a failure: the same
/// call is replayed until it goes through. Replays are unbounded by default;
/// a cap can be configured to bail out against a persistently throttling
/// remote.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pacing: Duration,
    max_rate_limit_retries: Option<u32>,
}

impl RetryPolicy {
    pub fn new(pacing: Duration) -> Self {
        Self {
            pacing,
            max_rate_limit_retries: None,
        }
    }

    /// Cap the number of rate-limit replays per call.
    pub fn with_max_rate_limit_retries(mut self, max: Option<u32>) -> Self {
        self.max_rate_limit_retries = max;
        self
    }

    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    /// Execute a remote call under this policy.
    ///
    /// `context` identifies the call (the date or the fiscal code) in log
    /// lines and in the error raised when a configured retry cap runs out.
    /// Errors other than the rate-limit signal propagate immediately; that
    /// includes `NotFound`, which the slow strategy consumes as a
    /// classification outcome.
    pub async fn execute<F, Fut, T>(&self, context: &str, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut retries: u32 = 0;
        loop {
            let outcome = call().await;

            if !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }

            match outcome {
                Ok(value) => {
                    if retries > 0 {
                        debug!(context, retries, "call succeeded after rate-limit retries");
                    }
                    return Ok(value);
                }
                Err(error) if error.is_rate_limit() => {
                    retries += 1;
                    if let Some(max) = self.max_rate_limit_retries {
                        if retries > max {
                            warn!(context, retries, "giving up on persistently throttled call");
                            return Err(BotError::RetriesExhausted(context.to_string()));
                        }
                    }
                    debug!(context, retries, "rate limited, replaying call");
                }
                Err(error) => return Err(error),
            }
        }
    }
}
