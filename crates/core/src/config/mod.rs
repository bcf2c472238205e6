// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Global configuration
//!
//! ```toml
//! [session]
//! use_local_storage = true
//! identity = "alice"
//! fetch_settle_delay = "1s"
//!
//! [worker]
//! trustComputeGroupOrigins = true
//!
//! [worker.minimumWage]
//! CPU = 0.5
//! ```
//!
//! The `[worker]` table uses the worker's own camelCase keys and becomes the
//! base layer of options resolution.

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Minimum time `fetching` stays visible after a fetch completes
pub const DEFAULT_FETCH_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Global worker defaults
    pub worker: Option<Value>,
    pub session: SessionConfig,
}

impl GlobalConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigurationError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigurationError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}

/// Session behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Load and save the `cores` subset through persistent storage
    pub use_local_storage: bool,
    /// Ambient identity used to key persisted options
    pub identity: Option<String>,
    #[serde(with = "humantime_serde")]
    pub fetch_settle_delay: Duration,
    /// Location of the JSON file store, when one is used
    pub storage_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            use_local_storage: true,
            identity: None,
            fetch_settle_delay: DEFAULT_FETCH_SETTLE_DELAY,
            storage_path: None,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
