// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! dlock-core: token-based distributed locks over an atomic key-value store
//!
//! This crate provides:
//! - The [`Lock`] handle with acquire / release / refresh semantics
//! - [`LockClient`] for creating handles with shared options
//! - The [`LockStore`] contract and an in-memory implementation
//! - Pluggable retry strategies and token generators
//! - Cancellation and deadline scoping via [`LockContext`]

pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod retry;
pub mod store;
pub mod token;

pub mod client;
pub mod lock;

// Re-exports
pub use client::{LockClient, LockClientBuilder, LockOptions, MIN_TTL};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{LockSettings, RetrySettings};
pub use context::LockContext;
pub use error::{ConfigError, LockError, LockOp, StoreError};
pub use lock::Lock;
pub use retry::{ExponentialBackoff, FixedInterval, NoRetry, RetryOn, RetryStrategy};
pub use store::{AtomicOp, LockStore, MemoryStore, ReleaseOutcome};
pub use token::{SequentialTokenGen, TokenGen, UuidTokenGen};

#[cfg(any(test, feature = "test-support"))]
pub use store::{FakeStore, StoreCall};
