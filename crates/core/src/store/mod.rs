// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store contract for the three atomic lock operations
//!
//! Implementations must evaluate each operation as one indivisible
//! check-then-act step, and serialize operations on the same key across all
//! clients. The mutual-exclusion guarantee of [`Lock`](crate::Lock) rests
//! entirely on that property.

mod memory;

pub use memory::MemoryStore;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStore, StoreCall};

use crate::error::StoreError;
use async_trait::async_trait;
use std::time::Duration;

/// Named atomic operation executed by a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomicOp {
    Acquire,
    Release,
    Renew,
}

impl AtomicOp {
    pub fn name(self) -> &'static str {
        match self {
            AtomicOp::Acquire => "acquire",
            AtomicOp::Release => "release",
            AtomicOp::Renew => "renew",
        }
    }
}

impl std::fmt::Display for AtomicOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Record existed with the caller's token and was deleted
    Released,
    /// Record exists but belongs to another token; left untouched
    Mismatch,
    /// No record for the key
    NotFound,
}

/// Backend executing the atomic lock operations
#[async_trait]
pub trait LockStore: Clone + Send + Sync + 'static {
    /// Write `key -> token` expiring after `ttl` when the key is free or
    /// already owned by `token`. Returns false, changing nothing, when another
    /// token owns the key.
    async fn acquire(&self, key: &str, token: &str, ttl: Duration) -> Result<bool, StoreError>;

    /// Delete the record only if it is owned by `token`
    async fn release(&self, key: &str, token: &str) -> Result<ReleaseOutcome, StoreError>;

    /// Reset the expiry to `ttl` from now only if the record is owned by `token`
    async fn renew(&self, key: &str, token: &str, ttl: Duration) -> Result<bool, StoreError>;
}
