// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for lock operations

use crate::store::AtomicOp;
use thiserror::Error;

/// Lock operation that found the lock not held by the caller's token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOp {
    Release,
    Refresh,
}

impl std::fmt::Display for LockOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockOp::Release => write!(f, "release"),
            LockOp::Refresh => write!(f, "refresh"),
        }
    }
}

/// Errors surfaced by lock handles and the client
#[derive(Debug, Error)]
pub enum LockError {
    /// Contention outlasted the retry budget
    #[error("failed to acquire lock {key}: held by another owner")]
    LockHeld { key: String },
    /// Release or renew targeted a record that is gone or owned by another token
    #[error("cannot {op} lock {key}: not held by this owner")]
    NotHeld { key: String, op: LockOp },
    #[error("operation cancelled")]
    Cancelled,
    #[error("deadline exceeded")]
    DeadlineExceeded,
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl LockError {
    /// True when the caller's context ended (cancellation or deadline)
    pub fn is_context(&self) -> bool {
        matches!(self, LockError::Cancelled | LockError::DeadlineExceeded)
    }

    pub fn is_lock_held(&self) -> bool {
        matches!(self, LockError::LockHeld { .. })
    }

    pub fn is_not_held(&self) -> bool {
        matches!(self, LockError::NotHeld { .. })
    }
}

/// Errors from store backends
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("unexpected reply to {op}: {reply}")]
    UnexpectedReply { op: AtomicOp, reply: String },
    #[error("{op} failed: {source}")]
    Backend {
        op: AtomicOp,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
