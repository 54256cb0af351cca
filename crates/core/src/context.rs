// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cancellation and deadline scope for lock operations
//!
//! Every lock operation runs inside a [`LockContext`]. The context ends either
//! when its [`CancellationToken`] fires or when its deadline passes, and any
//! operation racing against it returns [`LockError::Cancelled`] or
//! [`LockError::DeadlineExceeded`] promptly.

use crate::error::LockError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug, Default)]
pub struct LockContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl LockContext {
    /// A context that never expires on its own
    pub fn background() -> Self {
        Self::default()
    }

    /// Context ending after `timeout`; one too long to represent has no deadline
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Bind to an externally owned cancellation token
    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Cancel this context and every child derived from it
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Derive a context bounded by `timeout` that never outlives this one.
    ///
    /// Cancelling the parent cancels the child; cancelling the child leaves
    /// the parent untouched.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let deadline = match (self.deadline, Instant::now().checked_add(timeout)) {
            (Some(parent), Some(bound)) => Some(parent.min(bound)),
            (parent, None) => parent,
            (None, bound) => bound,
        };
        Self {
            cancel: self.cancel.child_token(),
            deadline,
        }
    }

    /// The reason this context has ended, if it has
    pub fn err(&self) -> Option<LockError> {
        if self.cancel.is_cancelled() {
            return Some(LockError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(LockError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the context ends
    pub async fn done(&self) -> LockError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.cancel.cancelled() => LockError::Cancelled,
                _ = tokio::time::sleep_until(deadline) => LockError::DeadlineExceeded,
            },
            None => {
                self.cancel.cancelled().await;
                LockError::Cancelled
            }
        }
    }

    /// Run `fut` to completion unless the context ends first
    pub async fn run<T, F>(&self, fut: F) -> Result<T, LockError>
    where
        F: Future<Output = Result<T, LockError>>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }
        tokio::select! {
            biased;
            err = self.done() => Err(err),
            result = fut => result,
        }
    }

    /// Sleep for `interval`, returning early with an error if the context ends
    pub async fn sleep(&self, interval: Duration) -> Result<(), LockError> {
        self.run(async {
            tokio::time::sleep(interval).await;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
