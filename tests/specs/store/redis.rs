//! Ownership scenarios against a live Redis server.
//!
//! Ignored by default. Point `DLOCK_REDIS_URL` at a disposable server and
//! run with `--ignored`.

use crate::lock_ownership::*;
use crate::prelude::client;
use dlock_adapters::{RedisStore, TracedStore};
use dlock_core::{LockClient, LockStore};

async fn redis_client() -> LockClient<TracedStore<RedisStore>> {
    let url = std::env::var("DLOCK_REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".into());
    let store = RedisStore::connect(&url).await.unwrap();
    client(TracedStore::new(store))
}

async fn run_all<S: LockStore>(client: &LockClient<S>) {
    held_lock_refuses_second_handle(client).await;
    expired_lock_passes_to_next_holder(client).await;
    second_unlock_reports_not_held(client).await;
    refresh_extends_from_refresh_time(client).await;
    released_lock_is_free_for_others(client).await;
    reacquire_by_holder_succeeds(client).await;
}

#[tokio::test]
#[ignore = "requires a redis server"]
async fn redis_store_satisfies_ownership_scenarios() {
    run_all(&redis_client().await).await;
}
