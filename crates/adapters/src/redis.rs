// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Redis lock store
//!
//! Each atomic operation is a server-side Lua script, so the read of the
//! current holder and the write that follows run as one step on the server.
//! Expiry uses millisecond precision (`PX` / `PEXPIRE`).

use async_trait::async_trait;
use dlock_core::{AtomicOp, LockStore, ReleaseOutcome, StoreError};
use redis::aio::ConnectionManager;
use redis::{Client, Script};
use std::sync::Arc;
use std::time::Duration;

struct Scripts {
    acquire: Script,
    release: Script,
    renew: Script,
}

impl Scripts {
    fn load() -> Self {
        Self {
            acquire: Script::new(include_str!("lua/acquire.lua")),
            release: Script::new(include_str!("lua/release.lua")),
            renew: Script::new(include_str!("lua/renew.lua")),
        }
    }
}

/// Lock store backed by a Redis server
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    scripts: Arc<Scripts>,
}

impl RedisStore {
    /// Open a managed connection to `url`, e.g. `redis://127.0.0.1:6379/0`
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = Client::open(url)
            .map_err(|e| StoreError::Unavailable(format!("invalid redis url {url}: {e}")))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Unavailable(format!("failed to connect to {url}: {e}")))?;
        tracing::info!(url, "redis lock store connected");
        Ok(Self::from_connection(conn))
    }

    /// Wrap an existing connection; clones share it
    pub fn from_connection(conn: ConnectionManager) -> Self {
        Self {
            conn,
            scripts: Arc::new(Scripts::load()),
        }
    }

    async fn eval(
        &self,
        op: AtomicOp,
        script: &Script,
        key: &str,
        token: &str,
        ttl: Option<Duration>,
    ) -> Result<i64, StoreError> {
        let mut invocation = script.key(key);
        invocation.arg(token);
        if let Some(ttl) = ttl {
            invocation.arg(ttl_millis(ttl));
        }

        let mut conn = self.conn.clone();
        let reply: i64 = invocation
            .invoke_async(&mut conn)
            .await
            .map_err(|e| StoreError::Backend {
                op,
                source: Box::new(e),
            })?;
        Ok(reply)
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

/// Whole milliseconds, never zero (`PX 0` is rejected by the server)
pub(crate) fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

/// Map the release script's reply
pub(crate) fn release_outcome(reply: i64) -> Result<ReleaseOutcome, StoreError> {
    match reply {
        1 => Ok(ReleaseOutcome::Released),
        0 => Ok(ReleaseOutcome::Mismatch),
        -1 => Ok(ReleaseOutcome::NotFound),
        other => Err(unexpected(AtomicOp::Release, other)),
    }
}

/// Map an acquire or renew reply
pub(crate) fn flag(op: AtomicOp, reply: i64) -> Result<bool, StoreError> {
    match reply {
        1 => Ok(true),
        0 => Ok(false),
        other => Err(unexpected(op, other)),
    }
}

fn unexpected(op: AtomicOp, reply: i64) -> StoreError {
    StoreError::UnexpectedReply {
        op,
        reply: reply.to_string(),
    }
}

#[async_trait]
impl LockStore for RedisStore {
    async fn acquire(&self, key: &str, token: &str, ttl: Duration) -> Result<bool, StoreError> {
        let reply = self
            .eval(AtomicOp::Acquire, &self.scripts.acquire, key, token, Some(ttl))
            .await?;
        flag(AtomicOp::Acquire, reply)
    }

    async fn release(&self, key: &str, token: &str) -> Result<ReleaseOutcome, StoreError> {
        let reply = self
            .eval(AtomicOp::Release, &self.scripts.release, key, token, None)
            .await?;
        release_outcome(reply)
    }

    async fn renew(&self, key: &str, token: &str, ttl: Duration) -> Result<bool, StoreError> {
        let reply = self
            .eval(AtomicOp::Renew, &self.scripts.renew, key, token, Some(ttl))
            .await?;
        flag(AtomicOp::Renew, reply)
    }
}

#[cfg(test)]
#[path = "redis_tests.rs"]
mod tests;
