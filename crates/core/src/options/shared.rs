// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single options instance shared by the session and the live worker

use super::types::WorkerOptions;
use std::sync::{Arc, RwLock};

/// Identity-stable handle to the canonical options
///
/// Clones point at the same instance. Contents are only ever updated in
/// place, so a worker holding a clone always sees current values.
#[derive(Debug, Clone)]
pub struct SharedOptions {
    inner: Arc<RwLock<WorkerOptions>>,
}

impl SharedOptions {
    pub fn new(options: WorkerOptions) -> Self {
        Self {
            inner: Arc::new(RwLock::new(options)),
        }
    }

    /// Copy of the current values
    pub fn snapshot(&self) -> WorkerOptions {
        self.read(Clone::clone)
    }

    pub fn read<R>(&self, f: impl FnOnce(&WorkerOptions) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut WorkerOptions) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    /// Overwrite every field without changing identity
    pub fn replace(&self, options: WorkerOptions) {
        self.write(|current| *current = options);
    }

    /// True when both handles refer to the same instance
    pub fn same_instance(&self, other: &SharedOptions) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
