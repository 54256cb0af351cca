//! Shared helpers for spec tests.

use dlock_adapters::TracedStore;
use dlock_core::{FixedInterval, LockClient, LockContext, LockStore, MemoryStore};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Retry budget small enough to keep contention tests fast
pub fn quick_retry() -> FixedInterval {
    FixedInterval::new(Duration::from_millis(20), 3)
}

pub fn client<S: LockStore>(store: S) -> LockClient<S> {
    LockClient::builder(store).retry_strategy(quick_retry()).build()
}

pub fn memory_client() -> LockClient<MemoryStore> {
    client(MemoryStore::new())
}

pub fn traced_client() -> LockClient<TracedStore<MemoryStore>> {
    client(TracedStore::new(MemoryStore::new()))
}

/// Context bounding a whole test step
pub fn ctx() -> LockContext {
    LockContext::with_timeout(Duration::from_secs(5))
}

/// Key unique to this process and call, safe to use against a shared server
pub fn unique_key(name: &str) -> String {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    format!(
        "dlock-spec:{}:{}:{}",
        std::process::id(),
        name,
        NEXT.fetch_add(1, Ordering::Relaxed)
    )
}
