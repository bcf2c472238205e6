// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cws-storage: string key/value persistence for worker options

mod file;
mod kv;
mod persisted;

pub use file::JsonFileStore;
pub use kv::{KeyValueStore, MemoryStore, StoreError};
pub use persisted::{PersistedOptions, DEFAULT_IDENTITY_KEY, OPTIONS_STORAGE_KEY};
