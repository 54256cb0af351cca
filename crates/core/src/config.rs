// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-based lock settings
//!
//! ```toml
//! attempt_timeout = "100ms"
//! retry_on = "contention"
//!
//! [retry]
//! kind = "exponential"
//! initial = "100ms"
//! max = "1s"
//! max_retries = 8
//! ```
//!
//! Every field is optional; omitted ones take the [`LockOptions`] defaults.

use crate::client::LockOptions;
use crate::error::ConfigError;
use crate::retry::{ExponentialBackoff, FixedInterval, NoRetry, RetryOn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Retry strategy selection
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RetrySettings {
    Exponential {
        #[serde(with = "humantime_serde")]
        initial: Duration,
        #[serde(with = "humantime_serde")]
        max: Duration,
        max_retries: u32,
    },
    Fixed {
        #[serde(with = "humantime_serde")]
        interval: Duration,
        max_retries: u32,
    },
    None,
}

impl Default for RetrySettings {
    fn default() -> Self {
        RetrySettings::Exponential {
            initial: Duration::from_millis(100),
            max: Duration::from_secs(1),
            max_retries: 8,
        }
    }
}

/// Serializable counterpart of [`LockOptions`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LockSettings {
    #[serde(with = "humantime_serde")]
    pub attempt_timeout: Duration,
    pub retry_on: RetryOn,
    pub retry: RetrySettings,
}

impl Default for LockSettings {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_millis(100),
            retry_on: RetryOn::default(),
            retry: RetrySettings::default(),
        }
    }
}

impl LockSettings {
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    /// Validate and convert into options; tokens come from the default generator
    pub fn into_options(self) -> Result<LockOptions, ConfigError> {
        if self.attempt_timeout.is_zero() {
            return Err(ConfigError::invalid(
                "attempt_timeout",
                "must be greater than zero",
            ));
        }

        let options = LockOptions::default()
            .with_attempt_timeout(self.attempt_timeout)
            .with_retry_on(self.retry_on);

        Ok(match self.retry {
            RetrySettings::Exponential {
                initial,
                max,
                max_retries,
            } => options.with_retry_strategy(ExponentialBackoff::new(initial, max, max_retries)?),
            RetrySettings::Fixed {
                interval,
                max_retries,
            } => options.with_retry_strategy(FixedInterval::new(interval, max_retries)),
            RetrySettings::None => options.with_retry_strategy(NoRetry),
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
