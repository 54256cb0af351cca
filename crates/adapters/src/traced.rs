// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced store wrapper for consistent observability

use async_trait::async_trait;
use dlock_core::{LockStore, ReleaseOutcome, StoreError};
use std::time::{Duration, Instant};
use tracing::Instrument;

/// Wrapper that adds tracing to any LockStore
#[derive(Clone, Debug)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[async_trait]
impl<S: LockStore> LockStore for TracedStore<S> {
    async fn acquire(&self, key: &str, token: &str, ttl: Duration) -> Result<bool, StoreError> {
        let span = tracing::info_span!("store.acquire", key, ttl_ms = ttl.as_millis() as u64);
        async {
            tracing::debug!(token, "starting");
            let start = Instant::now();
            let result = self.inner.acquire(key, token, ttl).await;

            match &result {
                Ok(true) => tracing::info!(elapsed_ms = elapsed_ms(start), "acquired"),
                Ok(false) => tracing::debug!(elapsed_ms = elapsed_ms(start), "contended"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed_ms(start),
                    error = %e,
                    "acquire failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn release(&self, key: &str, token: &str) -> Result<ReleaseOutcome, StoreError> {
        let span = tracing::info_span!("store.release", key);
        async {
            let start = Instant::now();
            let result = self.inner.release(key, token).await;

            match &result {
                Ok(ReleaseOutcome::Released) => {
                    tracing::info!(elapsed_ms = elapsed_ms(start), "released")
                }
                // Often expected: the lock expired before release
                Ok(outcome) => tracing::warn!(
                    elapsed_ms = elapsed_ms(start),
                    ?outcome,
                    "not held"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed_ms(start),
                    error = %e,
                    "release failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn renew(&self, key: &str, token: &str, ttl: Duration) -> Result<bool, StoreError> {
        let span = tracing::info_span!("store.renew", key, ttl_ms = ttl.as_millis() as u64);
        async {
            let start = Instant::now();
            let result = self.inner.renew(key, token, ttl).await;

            match &result {
                Ok(true) => tracing::debug!(elapsed_ms = elapsed_ms(start), "renewed"),
                Ok(false) => tracing::warn!(elapsed_ms = elapsed_ms(start), "not held"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed_ms(start),
                    error = %e,
                    "renew failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
