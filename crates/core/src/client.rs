// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock client: builds lock handles against a store

use crate::context::LockContext;
use crate::error::LockError;
use crate::lock::Lock;
use crate::retry::{ExponentialBackoff, RetryOn, RetryStrategy};
use crate::store::LockStore;
use crate::token::{TokenGen, UuidTokenGen};
use std::sync::Arc;
use std::time::Duration;

/// Shortest TTL a lock may be created with
pub const MIN_TTL: Duration = Duration::from_millis(1);

/// Options applied to every lock a client creates
#[derive(Clone)]
pub struct LockOptions {
    /// Backoff between acquisition attempts
    pub retry_strategy: Arc<dyn RetryStrategy>,
    /// Source of ownership tokens, one draw per lock
    pub token_gen: Arc<dyn TokenGen>,
    /// Upper bound for a single acquisition attempt
    pub attempt_timeout: Duration,
    /// Which acquisition failures consume retry budget
    pub retry_on: RetryOn,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            retry_strategy: Arc::new(ExponentialBackoff::default()),
            token_gen: Arc::new(UuidTokenGen),
            attempt_timeout: Duration::from_millis(100),
            retry_on: RetryOn::default(),
        }
    }
}

impl std::fmt::Debug for LockOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockOptions")
            .field("retry_strategy", &self.retry_strategy)
            .field("attempt_timeout", &self.attempt_timeout)
            .field("retry_on", &self.retry_on)
            .finish_non_exhaustive()
    }
}

impl LockOptions {
    pub fn with_retry_strategy(mut self, strategy: impl RetryStrategy + 'static) -> Self {
        self.retry_strategy = Arc::new(strategy);
        self
    }

    pub fn with_token_gen(mut self, token_gen: impl TokenGen + 'static) -> Self {
        self.token_gen = Arc::new(token_gen);
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_retry_on(mut self, retry_on: RetryOn) -> Self {
        self.retry_on = retry_on;
        self
    }
}

/// Factory for [`Lock`] handles sharing one store connection
#[derive(Clone, Debug)]
pub struct LockClient<S: LockStore> {
    store: S,
    options: LockOptions,
}

impl<S: LockStore> LockClient<S> {
    /// Client with default options
    pub fn new(store: S) -> Self {
        Self::with_options(store, LockOptions::default())
    }

    pub fn with_options(store: S, options: LockOptions) -> Self {
        Self { store, options }
    }

    pub fn builder(store: S) -> LockClientBuilder<S> {
        LockClientBuilder {
            store,
            options: LockOptions::default(),
        }
    }

    pub fn options(&self) -> &LockOptions {
        &self.options
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a handle for `key` with a fresh token. Does not touch the store.
    pub fn new_lock(
        &self,
        ctx: &LockContext,
        key: impl Into<String>,
        ttl: Duration,
    ) -> Result<Lock<S>, LockError> {
        if let Some(err) = ctx.err() {
            return Err(err);
        }
        let key = key.into();
        if key.is_empty() {
            return Err(LockError::InvalidArgument("lock key must not be empty".into()));
        }
        if ttl < MIN_TTL {
            return Err(LockError::InvalidArgument(format!(
                "ttl {ttl:?} is below the {MIN_TTL:?} minimum"
            )));
        }
        if self.options.attempt_timeout.is_zero() {
            return Err(LockError::InvalidArgument(
                "attempt timeout must be greater than zero".into(),
            ));
        }

        let token = self.options.token_gen.next();
        tracing::trace!(key = %key, token = %token, "lock handle created");
        Ok(Lock::new(
            self.store.clone(),
            key,
            token,
            ttl,
            self.options.attempt_timeout,
            Arc::clone(&self.options.retry_strategy),
            self.options.retry_on,
        ))
    }
}

/// Fluent construction of a [`LockClient`]
pub struct LockClientBuilder<S: LockStore> {
    store: S,
    options: LockOptions,
}

impl<S: LockStore> LockClientBuilder<S> {
    pub fn retry_strategy(mut self, strategy: impl RetryStrategy + 'static) -> Self {
        self.options = self.options.with_retry_strategy(strategy);
        self
    }

    pub fn token_gen(mut self, token_gen: impl TokenGen + 'static) -> Self {
        self.options = self.options.with_token_gen(token_gen);
        self
    }

    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.options = self.options.with_attempt_timeout(timeout);
        self
    }

    pub fn retry_on(mut self, retry_on: RetryOn) -> Self {
        self.options = self.options.with_retry_on(retry_on);
        self
    }

    /// Replace all options at once, e.g. with ones loaded from settings
    pub fn options(mut self, options: LockOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> LockClient<S> {
        LockClient::with_options(self.store, self.options)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
