//! Caller context: deadlines and cancellation end operations early.

use crate::prelude::*;
use dlock_core::{FixedInterval, LockClient, LockContext, LockError, MemoryStore};
use std::time::{Duration, Instant};

fn patient_client() -> LockClient<MemoryStore> {
    LockClient::builder(MemoryStore::new())
        .retry_strategy(FixedInterval::new(Duration::from_millis(50), 1_000))
        .build()
}

#[tokio::test]
async fn deadline_cuts_retry_loop_short() {
    let client = patient_client();
    let key = unique_key("deadline");
    let l1 = client.new_lock(&ctx(), &key, Duration::from_secs(60)).unwrap();
    let l2 = client.new_lock(&ctx(), &key, Duration::from_secs(60)).unwrap();
    l1.try_lock(&ctx()).await.unwrap();

    let start = Instant::now();
    let short = LockContext::with_timeout(Duration::from_millis(150));
    let err = l2.try_lock(&short).await.unwrap_err();

    assert!(matches!(err, LockError::DeadlineExceeded), "got {err:?}");
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn cancellation_stops_waiting_acquirer() {
    let client = patient_client();
    let key = unique_key("cancel");
    let l1 = client.new_lock(&ctx(), &key, Duration::from_secs(60)).unwrap();
    let l2 = client.new_lock(&ctx(), &key, Duration::from_secs(60)).unwrap();
    l1.try_lock(&ctx()).await.unwrap();

    let waiting = LockContext::background();
    let canceller = waiting.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let err = l2.try_lock(&waiting).await.unwrap_err();
    assert!(matches!(err, LockError::Cancelled), "got {err:?}");
    assert!(err.is_context());
}

#[tokio::test]
async fn finished_context_rejects_unlock_without_releasing() {
    let client = memory_client();
    let key = unique_key("done");
    let l1 = client.new_lock(&ctx(), &key, Duration::from_secs(60)).unwrap();
    let l2 = client.new_lock(&ctx(), &key, Duration::from_secs(60)).unwrap();
    l1.try_lock(&ctx()).await.unwrap();

    let done = LockContext::background();
    done.cancel();
    assert!(l1.unlock(&done).await.unwrap_err().is_context());
    assert!(l1.refresh(&done).await.unwrap_err().is_context());

    // still held by l1
    assert!(l2.try_lock(&ctx()).await.unwrap_err().is_lock_held());
}
