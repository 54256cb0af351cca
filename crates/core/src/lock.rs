// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock handle for token-based exclusive access
//!
//! A [`Lock`] binds a key to an ownership token drawn once at construction.
//! Whether the handle "holds" the lock is decided solely by the store: the
//! record for the key must exist, be unexpired, and carry this token. The
//! handle keeps no holding flag of its own, so a record that expired behind
//! its back is detected on the next [`Lock::unlock`] or [`Lock::refresh`].

use crate::context::LockContext;
use crate::error::{LockError, LockOp};
use crate::retry::{self, RetryOn, RetryStrategy};
use crate::store::{LockStore, ReleaseOutcome};
use std::sync::Arc;
use std::time::Duration;

/// Distributed lock handle
pub struct Lock<S: LockStore> {
    store: S,
    key: String,
    token: String,
    ttl: Duration,
    attempt_timeout: Duration,
    retry_strategy: Arc<dyn RetryStrategy>,
    retry_on: RetryOn,
}

impl<S: LockStore> std::fmt::Debug for Lock<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lock")
            .field("key", &self.key)
            .field("token", &self.token)
            .field("ttl", &self.ttl)
            .field("attempt_timeout", &self.attempt_timeout)
            .field("retry_strategy", &self.retry_strategy)
            .field("retry_on", &self.retry_on)
            .finish()
    }
}

impl<S: LockStore> Lock<S> {
    pub(crate) fn new(
        store: S,
        key: String,
        token: String,
        ttl: Duration,
        attempt_timeout: Duration,
        retry_strategy: Arc<dyn RetryStrategy>,
        retry_on: RetryOn,
    ) -> Self {
        Self {
            store,
            key,
            token,
            ttl,
            attempt_timeout,
            retry_strategy,
            retry_on,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Ownership token written alongside the record; fixed for the handle's lifetime
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Acquire the lock, retrying on contention per the handle's strategy.
    ///
    /// Calling this while already holding the lock succeeds and restarts the
    /// TTL. Returns [`LockError::LockHeld`] once retries are exhausted, or the
    /// context error as soon as `ctx` ends.
    pub async fn try_lock(&self, ctx: &LockContext) -> Result<(), LockError> {
        let retry_on = self.retry_on;
        let result = retry::retry(
            ctx,
            self.retry_strategy.as_ref(),
            |err| retry_on.should_retry(err),
            || self.acquire_once(ctx),
        )
        .await;

        match &result {
            Ok(()) => tracing::debug!(
                key = %self.key,
                ttl_ms = self.ttl.as_millis() as u64,
                "lock acquired"
            ),
            Err(e) => tracing::debug!(key = %self.key, error = %e, "lock not acquired"),
        }
        result
    }

    /// Release the lock. Single attempt, never retried.
    ///
    /// Fails with [`LockError::NotHeld`] if the record is gone or owned by
    /// another token; in that case nothing is deleted.
    pub async fn unlock(&self, ctx: &LockContext) -> Result<(), LockError> {
        let outcome = ctx
            .run(async {
                self.store
                    .release(&self.key, &self.token)
                    .await
                    .map_err(LockError::from)
            })
            .await?;

        match outcome {
            ReleaseOutcome::Released => {
                tracing::debug!(key = %self.key, "lock released");
                Ok(())
            }
            ReleaseOutcome::Mismatch | ReleaseOutcome::NotFound => {
                tracing::warn!(key = %self.key, ?outcome, "release of lock not held");
                Err(self.not_held(LockOp::Release))
            }
        }
    }

    /// Reset the record's TTL. Single attempt, never retried.
    ///
    /// Success means this token owned the record at the instant of the call,
    /// not that ownership was continuous since acquisition. Any error should
    /// be read as "lock probably lost".
    pub async fn refresh(&self, ctx: &LockContext) -> Result<(), LockError> {
        let renewed = ctx
            .run(async {
                self.store
                    .renew(&self.key, &self.token, self.ttl)
                    .await
                    .map_err(LockError::from)
            })
            .await?;

        if renewed {
            tracing::debug!(key = %self.key, ttl_ms = self.ttl.as_millis() as u64, "lock refreshed");
            Ok(())
        } else {
            tracing::warn!(key = %self.key, "refresh of lock not held");
            Err(self.not_held(LockOp::Refresh))
        }
    }

    /// One acquisition attempt bounded by the attempt timeout.
    ///
    /// An attempt that times out while `ctx` is still live counts as
    /// contention; if `ctx` itself ended, its error is returned instead.
    async fn acquire_once(&self, ctx: &LockContext) -> Result<(), LockError> {
        let attempt = ctx.child_with_timeout(self.attempt_timeout);
        let result = attempt
            .run(async {
                self.store
                    .acquire(&self.key, &self.token, self.ttl)
                    .await
                    .map_err(LockError::from)
            })
            .await;

        match result {
            Ok(true) => Ok(()),
            Ok(false) => Err(self.held()),
            Err(e) if e.is_context() => match ctx.err() {
                Some(outer) => Err(outer),
                None => {
                    tracing::debug!(
                        key = %self.key,
                        timeout_ms = self.attempt_timeout.as_millis() as u64,
                        "acquire attempt timed out"
                    );
                    Err(self.held())
                }
            },
            Err(e) => Err(e),
        }
    }

    fn held(&self) -> LockError {
        LockError::LockHeld {
            key: self.key.clone(),
        }
    }

    fn not_held(&self, op: LockOp) -> LockError {
        LockError::NotHeld {
            key: self.key.clone(),
            op,
        }
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
