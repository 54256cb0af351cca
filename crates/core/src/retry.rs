// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry strategies and the driver that applies them
//!
//! A [`RetryStrategy`] only answers one question: given that `retry` retries
//! have now been requested, how long to wait before the next attempt (or
//! `None` to stop). Strategies hold no counters, so one instance can be
//! shared by any number of lock handles and every [`retry`] call starts from
//! the first interval again.

use crate::context::LockContext;
use crate::error::{ConfigError, LockError};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

/// Backoff decision function consumed by [`retry`]
pub trait RetryStrategy: Debug + Send + Sync {
    /// Wait before retry number `retry` (1-based), or `None` when exhausted
    fn next_interval(&self, retry: u32) -> Option<Duration>;
}

/// Doubling intervals from `initial`, capped at `max`, for at most `max_retries` retries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExponentialBackoff {
    initial: Duration,
    max: Duration,
    max_retries: u32,
}

impl ExponentialBackoff {
    pub fn new(initial: Duration, max: Duration, max_retries: u32) -> Result<Self, ConfigError> {
        if initial.is_zero() {
            return Err(ConfigError::invalid("retry.initial", "must be greater than zero"));
        }
        if max < initial {
            return Err(ConfigError::invalid(
                "retry.max",
                format!("{max:?} is shorter than initial interval {initial:?}"),
            ));
        }
        Ok(Self {
            initial,
            max,
            max_retries,
        })
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

impl Default for ExponentialBackoff {
    /// 100ms doubling up to 1s, 8 retries
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(100),
            max: Duration::from_secs(1),
            max_retries: 8,
        }
    }
}

impl RetryStrategy for ExponentialBackoff {
    fn next_interval(&self, retry: u32) -> Option<Duration> {
        if retry == 0 || retry > self.max_retries {
            return None;
        }
        let factor = 1u32.checked_shl(retry - 1).unwrap_or(u32::MAX);
        let interval = self.initial.checked_mul(factor).unwrap_or(self.max);
        Some(interval.min(self.max))
    }
}

/// Same interval between every attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedInterval {
    interval: Duration,
    max_retries: u32,
}

impl FixedInterval {
    pub fn new(interval: Duration, max_retries: u32) -> Self {
        Self {
            interval,
            max_retries,
        }
    }
}

impl RetryStrategy for FixedInterval {
    fn next_interval(&self, retry: u32) -> Option<Duration> {
        (1..=self.max_retries).contains(&retry).then_some(self.interval)
    }
}

/// Single attempt, no retries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoRetry;

impl RetryStrategy for NoRetry {
    fn next_interval(&self, _retry: u32) -> Option<Duration> {
        None
    }
}

/// Which acquisition failures consume retry budget.
///
/// Contention (the lock is held by another token, or the attempt timed out)
/// is always retried. Store failures such as a dropped connection are only
/// retried under [`RetryOn::ContentionAndTransport`]; otherwise the first one
/// is returned to the caller as is.
///
/// On exhaustion the last error is returned. Under `Contention` that is
/// always [`LockError::LockHeld`]; under `ContentionAndTransport` it is a
/// [`LockError::Store`] error when the final attempt failed in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryOn {
    #[default]
    Contention,
    ContentionAndTransport,
}

impl RetryOn {
    pub fn should_retry(self, err: &LockError) -> bool {
        match err {
            LockError::LockHeld { .. } => true,
            LockError::Store(_) => self == RetryOn::ContentionAndTransport,
            _ => false,
        }
    }
}

/// Run `action` until it succeeds, the strategy is exhausted, or `ctx` ends.
///
/// Errors rejected by `retryable` are returned immediately, as are context
/// errors regardless of `retryable`. On exhaustion the last error is returned.
/// Backoff waits race against `ctx`.
pub async fn retry<T, F, Fut, P>(
    ctx: &LockContext,
    strategy: &dyn RetryStrategy,
    retryable: P,
    mut action: F,
) -> Result<T, LockError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LockError>>,
    P: Fn(&LockError) -> bool,
{
    let mut retries = 0u32;
    loop {
        let err = match action().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if err.is_context() || !retryable(&err) {
            return Err(err);
        }

        retries = retries.saturating_add(1);
        let Some(interval) = strategy.next_interval(retries) else {
            tracing::debug!(retries = retries - 1, error = %err, "retries exhausted");
            return Err(err);
        };
        tracing::debug!(
            retry = retries,
            interval_ms = interval.as_millis() as u64,
            error = %err,
            "retrying"
        );
        ctx.sleep(interval).await?;
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
