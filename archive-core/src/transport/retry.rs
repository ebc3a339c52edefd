use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ArchiveError;

use super::{ArchiveRequest, Transport};

/// Exponential backoff for transient failures.
///
/// Retry `n` (1-based) waits `backoff_factor * 2^(n-1)` seconds, capped at
/// [`RetryPolicy::BACKOFF_MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff_factor: 0.2,
        }
    }
}

impl RetryPolicy {
    pub const BACKOFF_MAX: Duration = Duration::from_secs(120);

    pub fn backoff(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
        let secs = self.backoff_factor * 2f64.powi(exponent);
        if !secs.is_finite() || secs <= 0.0 {
            return if secs.is_infinite() { Self::BACKOFF_MAX } else { Duration::ZERO };
        }
        Duration::from_secs_f64(secs.min(Self::BACKOFF_MAX.as_secs_f64()))
    }
}

#[derive(Debug, Clone)]
pub struct RetryTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: Transport> RetryTransport<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<T: Transport> Transport for RetryTransport<T> {
    async fn execute(&self, request: &ArchiveRequest) -> Result<String, ArchiveError> {
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            let err = match self.inner.execute(request).await {
                Ok(body) => return Ok(body),
                Err(err) if err.is_transient() => err,
                Err(err) => return Err(err),
            };

            if attempt > self.policy.max_retries {
                return Err(ArchiveError::RetriesExhausted {
                    attempts: attempt,
                    source: Box::new(err),
                });
            }

            let delay = self.policy.backoff(attempt);
            warn!(
                attempt,
                max_retries = self.policy.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "transient archive failure, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
