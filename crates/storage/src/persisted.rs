// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted options layout
//!
//! One storage key holds a JSON object mapping identity key to the saved
//! subset of worker options:
//!
//! ```json
//! { "default": { "cores": { "cpu": 4 } }, "alice": { "cores": { "cpu": 2 } } }
//! ```

use crate::kv::{KeyValueStore, StoreError};
use cws_core::PersistedRecord;
use serde_json::{Map, Value};

pub const OPTIONS_STORAGE_KEY: &str = "dcp-worker-options";

/// Identity key used when no ambient identity is known
pub const DEFAULT_IDENTITY_KEY: &str = "default";

/// Per-identity view of the persisted options record
#[derive(Debug, Clone)]
pub struct PersistedOptions<S> {
    store: S,
    identity_key: String,
}

impl<S: KeyValueStore> PersistedOptions<S> {
    pub fn new(store: S, identity: Option<&str>) -> Self {
        let identity_key = identity
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_IDENTITY_KEY)
            .to_string();
        Self {
            store,
            identity_key,
        }
    }

    pub fn identity_key(&self) -> &str {
        &self.identity_key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Saved record for this identity
    ///
    /// Unreadable or malformed data is logged and treated as absent.
    pub fn load(&self) -> Option<PersistedRecord> {
        let all = match self.read_all() {
            Ok(all) => all,
            Err(e) => {
                tracing::warn!(key = OPTIONS_STORAGE_KEY, error = %e, "ignoring unreadable persisted options");
                return None;
            }
        };
        let entry = all.get(&self.identity_key)?;
        match serde_json::from_value::<PersistedRecord>(entry.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(
                    identity = %self.identity_key,
                    error = %e,
                    "ignoring malformed persisted options record"
                );
                None
            }
        }
    }

    /// Replace this identity's record, keeping other identities intact
    pub fn save(&self, record: &PersistedRecord) -> Result<(), StoreError> {
        let mut all = match self.read_all() {
            Ok(all) => all,
            Err(StoreError::Json(e)) => {
                tracing::warn!(error = %e, "overwriting malformed persisted options");
                Map::new()
            }
            Err(e) => return Err(e),
        };
        all.insert(self.identity_key.clone(), serde_json::to_value(record)?);
        let json = serde_json::to_string(&Value::Object(all))?;
        self.store.set(OPTIONS_STORAGE_KEY, &json)?;
        tracing::debug!(identity = %self.identity_key, "persisted worker options");
        Ok(())
    }

    fn read_all(&self) -> Result<Map<String, Value>, StoreError> {
        match self.store.get(OPTIONS_STORAGE_KEY)? {
            None => Ok(Map::new()),
            Some(raw) => match serde_json::from_str::<Value>(&raw)? {
                Value::Object(map) => Ok(map),
                // Anything other than an object is treated like an empty record set
                _ => Ok(Map::new()),
            },
        }
    }
}

#[cfg(test)]
#[path = "persisted_tests.rs"]
mod tests;
