// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ownership token generation
//!
//! A token is written next to the lock record and proves which handle owns it.
//! Every handle draws exactly one token from its generator at construction.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generates unique ownership tokens
pub trait TokenGen: Send + Sync {
    fn next(&self) -> String;
}

/// Any `Fn() -> String` closure is a token generator
impl<F> TokenGen for F
where
    F: Fn() -> String + Send + Sync,
{
    fn next(&self) -> String {
        self()
    }
}

/// Random UUID v4 tokens for production use
#[derive(Clone, Debug, Default)]
pub struct UuidTokenGen;

impl TokenGen for UuidTokenGen {
    fn next(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Sequential tokens for testing
#[derive(Clone, Debug)]
pub struct SequentialTokenGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialTokenGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialTokenGen {
    fn default() -> Self {
        Self::new("token")
    }
}

impl TokenGen for SequentialTokenGen {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
