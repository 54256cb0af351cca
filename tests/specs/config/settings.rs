//! Lock settings loaded from TOML drive client behavior.

use crate::prelude::*;
use dlock_core::{LockClient, LockError, LockSettings, MemoryStore, RetryOn};
use std::time::{Duration, Instant};

#[test]
fn settings_file_builds_client_options() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lock.toml");
    std::fs::write(
        &path,
        r#"
attempt_timeout = "250ms"
retry_on = "contention_and_transport"

[retry]
kind = "fixed"
interval = "10ms"
max_retries = 2
"#,
    )
    .unwrap();

    let options = LockSettings::load(&path).unwrap().into_options().unwrap();
    let client = LockClient::with_options(MemoryStore::new(), options);
    let lock = client.new_lock(&ctx(), "jobs", Duration::from_secs(1)).unwrap();

    assert_eq!(lock.attempt_timeout(), Duration::from_millis(250));
    assert_eq!(client.options().retry_on, RetryOn::ContentionAndTransport);
}

#[tokio::test]
async fn retry_none_setting_disables_retries() {
    let options = LockSettings::from_toml("[retry]\nkind = \"none\"\n")
        .unwrap()
        .into_options()
        .unwrap();
    let client = LockClient::with_options(MemoryStore::new(), options);
    let key = unique_key("settings-none");
    let l1 = client.new_lock(&ctx(), &key, Duration::from_secs(60)).unwrap();
    let l2 = client.new_lock(&ctx(), &key, Duration::from_secs(60)).unwrap();
    l1.try_lock(&ctx()).await.unwrap();

    let start = Instant::now();
    assert!(l2.try_lock(&ctx()).await.unwrap_err().is_lock_held());
    assert!(start.elapsed() < Duration::from_millis(90));
}

#[test]
fn invalid_backoff_settings_are_rejected() {
    let settings = LockSettings::from_toml(
        r#"
[retry]
kind = "exponential"
initial = "2s"
max = "1s"
max_retries = 3
"#,
    )
    .unwrap();

    let err = LockError::from(settings.into_options().unwrap_err());
    assert!(matches!(err, LockError::Config(_)));
}

#[test]
fn missing_settings_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = LockSettings::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, dlock_core::ConfigError::Io(_)));
}
