// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observed writes to the shared worker options
//!
//! All mutation of the live options goes through [`ReactiveOptions`]. A write
//! whose final path segment is a watched field persists the `cores` subset
//! (when local storage is enabled) and dispatches exactly one
//! [`WorkerAction::Refresh`]. Other writes do neither.

use crate::store::SessionStore;
use cws_core::{
    write_path, Cores, OptionPath, OptionsError, PaymentAddress, PersistedRecord, SharedOptions,
    WatchedField, WorkerAction, WorkerOptions,
};
use cws_storage::{KeyValueStore, PersistedOptions};
use serde_json::Value;
use std::sync::Arc;

/// Persistence target for watched writes
pub type OptionsPersistence = PersistedOptions<Arc<dyn KeyValueStore>>;

/// Write-through wrapper around the session's [`SharedOptions`]
#[derive(Clone)]
pub struct ReactiveOptions {
    options: SharedOptions,
    store: Arc<SessionStore>,
    persistence: Option<OptionsPersistence>,
}

impl ReactiveOptions {
    /// `persistence` is `None` when local storage is disabled
    pub fn new(
        options: SharedOptions,
        store: Arc<SessionStore>,
        persistence: Option<OptionsPersistence>,
    ) -> Self {
        Self {
            options,
            store,
            persistence,
        }
    }

    /// The wrapped instance; clones share identity with the live worker's
    pub fn shared(&self) -> &SharedOptions {
        &self.options
    }

    /// True when `options` is the instance this wrapper observes
    pub fn wraps(&self, options: &SharedOptions) -> bool {
        self.options.same_instance(options)
    }

    pub fn snapshot(&self) -> WorkerOptions {
        self.options.snapshot()
    }

    pub fn persists(&self) -> bool {
        self.persistence.is_some()
    }

    /// Write `value` at a dotted path such as `cores.cpu`
    pub fn set(&self, path: &str, value: Value) -> Result<(), OptionsError> {
        self.set_path(&path.parse()?, value)
    }

    pub fn set_path(&self, path: &OptionPath, value: Value) -> Result<(), OptionsError> {
        self.options.write(|options| write_path(options, path, value))?;
        tracing::debug!(%path, "option written");
        if let Some(field) = path.watched() {
            self.watched_write(field);
        }
        Ok(())
    }

    /// Replace the payment address; invalid values leave it unchanged
    pub fn set_payment_address(&self, address: impl Into<PaymentAddress>) -> Result<(), OptionsError> {
        let address = address.into().canonicalize()?;
        self.options.write(|options| options.payment_address = address);
        self.watched_write(WatchedField::PaymentAddress);
        Ok(())
    }

    pub fn set_cores(&self, cores: Cores) {
        self.options.write(|options| options.cores = Some(cores));
        self.watched_write(WatchedField::Cores);
    }

    pub fn set_cpu_cores(&self, cpu: u32) {
        self.options
            .write(|options| options.cores.get_or_insert_with(Cores::default).cpu = Some(cpu));
        self.watched_write(WatchedField::Cpu);
    }

    pub fn set_gpu_cores(&self, gpu: u32) {
        self.options
            .write(|options| options.cores.get_or_insert_with(Cores::default).gpu = Some(gpu));
        // `gpu` is not a watched name
        tracing::debug!(gpu, "gpu cores written");
    }

    pub fn set_max_working_sandboxes(&self, max: u32) {
        self.options
            .write(|options| options.max_working_sandboxes = Some(max));
        self.watched_write(WatchedField::MaxWorkingSandboxes);
    }

    /// Unobserved in-place edit; neither persists nor refreshes
    pub fn modify<R>(&self, f: impl FnOnce(&mut WorkerOptions) -> R) -> R {
        self.options.write(f)
    }

    fn watched_write(&self, field: WatchedField) {
        if let Some(persistence) = &self.persistence {
            let record = PersistedRecord {
                cores: self.options.read(|options| options.cores),
            };
            if let Err(e) = persistence.save(&record) {
                tracing::warn!(%field, error = %e, "failed to persist worker options");
            }
        }
        self.store.dispatch(&WorkerAction::Refresh);
        tracing::debug!(%field, "watched option changed");
    }
}

#[cfg(test)]
#[path = "reactive_tests.rs"]
mod tests;
