//! TryLock retry behavior on the wall clock.

use crate::prelude::*;
use dlock_core::{FixedInterval, LockClient, MemoryStore, NoRetry};
use std::time::{Duration, Instant};

#[tokio::test]
async fn try_lock_acquires_once_holder_releases() {
    let store = MemoryStore::new();
    let client = LockClient::builder(store)
        .retry_strategy(FixedInterval::new(Duration::from_millis(25), 40))
        .build();
    let key = unique_key("wait");
    let l1 = client.new_lock(&ctx(), &key, Duration::from_secs(60)).unwrap();
    let l2 = client.new_lock(&ctx(), &key, Duration::from_secs(60)).unwrap();
    l1.try_lock(&ctx()).await.unwrap();

    let releaser = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        l1.unlock(&ctx()).await.unwrap();
    });

    l2.try_lock(&ctx()).await.unwrap();
    releaser.await.unwrap();
}

#[tokio::test]
async fn try_lock_waits_out_a_short_ttl() {
    let client = LockClient::builder(MemoryStore::new())
        .retry_strategy(FixedInterval::new(Duration::from_millis(50), 20))
        .build();
    let key = unique_key("ttl-wait");
    let l1 = client.new_lock(&ctx(), &key, Duration::from_millis(150)).unwrap();
    let l2 = client.new_lock(&ctx(), &key, Duration::from_secs(60)).unwrap();

    l1.try_lock(&ctx()).await.unwrap();
    l2.try_lock(&ctx()).await.unwrap();
    assert!(l1.refresh(&ctx()).await.unwrap_err().is_not_held());
}

#[tokio::test]
async fn exhausted_retries_report_lock_held_after_backoff() {
    let client = memory_client();
    let key = unique_key("exhaust");
    let l1 = client.new_lock(&ctx(), &key, Duration::from_secs(60)).unwrap();
    let l2 = client.new_lock(&ctx(), &key, Duration::from_secs(60)).unwrap();
    l1.try_lock(&ctx()).await.unwrap();

    let start = Instant::now();
    let err = l2.try_lock(&ctx()).await.unwrap_err();

    assert!(err.is_lock_held());
    // three 20ms waits between four attempts
    assert!(start.elapsed() >= Duration::from_millis(60));
}

#[tokio::test]
async fn no_retry_fails_on_first_contention() {
    let client = LockClient::builder(MemoryStore::new())
        .retry_strategy(NoRetry)
        .build();
    let key = unique_key("no-retry");
    let l1 = client.new_lock(&ctx(), &key, Duration::from_secs(60)).unwrap();
    let l2 = client.new_lock(&ctx(), &key, Duration::from_secs(60)).unwrap();
    l1.try_lock(&ctx()).await.unwrap();

    let start = Instant::now();
    assert!(l2.try_lock(&ctx()).await.unwrap_err().is_lock_held());
    assert!(start.elapsed() < Duration::from_millis(500));
}
