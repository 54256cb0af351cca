// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake lock store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{AtomicOp, LockStore, MemoryStore, ReleaseOutcome};
use crate::clock::FakeClock;
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub op: AtomicOp,
    pub key: String,
    pub token: String,
}

#[derive(Default)]
struct FakeState {
    calls: Vec<StoreCall>,
    failures: HashMap<AtomicOp, VecDeque<String>>,
    latency: Duration,
}

/// In-memory store on a fake clock that records calls and injects faults
#[derive(Clone)]
pub struct FakeStore {
    inner: MemoryStore<FakeClock>,
    clock: FakeClock,
    state: Arc<Mutex<FakeState>>,
}

impl FakeStore {
    pub fn new() -> Self {
        let clock = FakeClock::new();
        Self {
            inner: MemoryStore::with_clock(clock.clone()),
            clock,
            state: Arc::new(Mutex::new(FakeState::default())),
        }
    }

    /// Clock driving record expiry
    pub fn clock(&self) -> &FakeClock {
        &self.clock
    }

    /// Underlying record map, for inspecting holders and TTLs
    pub fn memory(&self) -> &MemoryStore<FakeClock> {
        &self.inner
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.state().calls.clone()
    }

    /// Number of recorded calls for one operation
    pub fn count(&self, op: AtomicOp) -> usize {
        self.state().calls.iter().filter(|c| c.op == op).count()
    }

    /// Make the next call to `op` fail with [`StoreError::Unavailable`]
    pub fn fail_next(&self, op: AtomicOp, message: impl Into<String>) {
        self.state()
            .failures
            .entry(op)
            .or_default()
            .push_back(message.into());
    }

    /// Delay every call by `latency` before it reaches the records
    pub fn set_latency(&self, latency: Duration) {
        self.state().latency = latency;
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn enter(&self, op: AtomicOp, key: &str, token: &str) -> Result<(), StoreError> {
        let (latency, failure) = {
            let mut state = self.state();
            state.calls.push(StoreCall {
                op,
                key: key.to_string(),
                token: token.to_string(),
            });
            let failure = state.failures.get_mut(&op).and_then(|q| q.pop_front());
            (state.latency, failure)
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        match failure {
            Some(message) => Err(StoreError::Unavailable(message)),
            None => Ok(()),
        }
    }
}

impl Default for FakeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LockStore for FakeStore {
    async fn acquire(&self, key: &str, token: &str, ttl: Duration) -> Result<bool, StoreError> {
        self.enter(AtomicOp::Acquire, key, token).await?;
        self.inner.acquire(key, token, ttl).await
    }

    async fn release(&self, key: &str, token: &str) -> Result<ReleaseOutcome, StoreError> {
        self.enter(AtomicOp::Release, key, token).await?;
        self.inner.release(key, token).await
    }

    async fn renew(&self, key: &str, token: &str, ttl: Duration) -> Result<bool, StoreError> {
        self.enter(AtomicOp::Renew, key, token).await?;
        self.inner.renew(key, token, ttl).await
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
