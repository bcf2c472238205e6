// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker options: model, merge, resolution, and the shared instance
//!
//! Resolution order:
//! 1. Built-in defaults, leaf-merged with the global `[worker]` table
//! 2. Caller overrides, leaf-merged on top
//! 3. The persisted `cores` subset, when local storage is enabled
//!
//! The result is wrapped in a [`SharedOptions`] whose identity never changes
//! for the lifetime of the session.

mod merge;
mod path;
mod resolve;
mod shared;
mod types;

pub use merge::leaf_merge;
pub use path::{write_path, OptionPath, WatchedField};
pub use resolve::{default_worker_options, OptionsResolver, ResolveRequest};
pub use shared::SharedOptions;
pub use types::{
    AllowOrigins, Cores, MinimumWage, PersistedRecord, SessionControls, WorkerOptions,
};
