// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process lock store
//!
//! Records live in a single mutex-guarded map, so every operation is atomic
//! and operations on the same key are serialized. Expired records are treated
//! as absent the moment their deadline passes and are removed lazily. A TTL
//! too large to represent as an instant never expires.

use super::{LockStore, ReleaseOutcome};
use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Record {
    token: String,
    /// `None` never expires
    expires_at: Option<Instant>,
}

impl Record {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// Lock store backed by process memory
#[derive(Clone, Debug)]
pub struct MemoryStore<C: Clock = SystemClock> {
    records: Arc<Mutex<HashMap<String, Record>>>,
    clock: C,
}

impl MemoryStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MemoryStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MemoryStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    /// Token currently owning `key`, if the record is live
    pub fn holder(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        self.records()
            .get(key)
            .filter(|r| r.is_live(now))
            .map(|r| r.token.clone())
    }

    /// Time left before the record for `key` expires; `Duration::MAX` if it never does
    pub fn remaining_ttl(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now();
        self.records()
            .get(key)
            .filter(|r| r.is_live(now))
            .map(|r| match r.expires_at {
                Some(at) => at.duration_since(now),
                None => Duration::MAX,
            })
    }

    /// Drop every expired record, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut records = self.records();
        let before = records.len();
        records.retain(|_, r| r.is_live(now));
        before - records.len()
    }

    /// Number of stored records, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn records(&self) -> std::sync::MutexGuard<'_, HashMap<String, Record>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Live record for `key`, discarding it first if it has expired
    fn live<'a>(
        records: &'a mut HashMap<String, Record>,
        key: &str,
        now: Instant,
    ) -> Option<&'a mut Record> {
        if records.get(key).is_some_and(|r| !r.is_live(now)) {
            records.remove(key);
        }
        records.get_mut(key)
    }
}

#[async_trait]
impl<C: Clock> LockStore for MemoryStore<C> {
    async fn acquire(&self, key: &str, token: &str, ttl: Duration) -> Result<bool, StoreError> {
        let now = self.clock.now();
        let expires_at = self.clock.expiry_after(ttl);
        let mut records = self.records();
        match Self::live(&mut records, key, now) {
            Some(record) if record.token != token => Ok(false),
            Some(record) => {
                record.expires_at = expires_at;
                Ok(true)
            }
            None => {
                records.insert(
                    key.to_string(),
                    Record {
                        token: token.to_string(),
                        expires_at,
                    },
                );
                Ok(true)
            }
        }
    }

    async fn release(&self, key: &str, token: &str) -> Result<ReleaseOutcome, StoreError> {
        let now = self.clock.now();
        let mut records = self.records();
        match Self::live(&mut records, key, now) {
            None => Ok(ReleaseOutcome::NotFound),
            Some(record) if record.token != token => Ok(ReleaseOutcome::Mismatch),
            Some(_) => {
                records.remove(key);
                Ok(ReleaseOutcome::Released)
            }
        }
    }

    async fn renew(&self, key: &str, token: &str, ttl: Duration) -> Result<bool, StoreError> {
        let now = self.clock.now();
        let expires_at = self.clock.expiry_after(ttl);
        let mut records = self.records();
        match Self::live(&mut records, key, now) {
            Some(record) if record.token == token => {
                record.expires_at = expires_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
