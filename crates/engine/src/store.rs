// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session-wide state and statistics
//!
//! Every mutation goes through a named action and publishes a fresh
//! [`SessionSnapshot`] to watchers.

use cws_core::{StatsAction, WorkerAction, WorkerState, WorkerStatistics};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;

/// What observers see: read-only copies of state and statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub state: WorkerState,
    pub statistics: WorkerStatistics,
}

/// Holder of the session's reducers
pub struct SessionStore {
    state: Mutex<WorkerState>,
    statistics: Mutex<WorkerStatistics>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (snapshots, _) = watch::channel(SessionSnapshot::default());
        Self {
            state: Mutex::new(WorkerState::default()),
            statistics: Mutex::new(WorkerStatistics::default()),
            snapshots,
        }
    }

    /// Apply a lifecycle action, returning the new state
    pub fn dispatch(&self, action: &WorkerAction) -> WorkerState {
        let next = {
            let mut state = lock(&self.state);
            *state = state.transition(action);
            state.clone()
        };
        tracing::trace!(?action, "dispatch");
        self.publish();
        next
    }

    /// Apply a statistics action, returning the new totals
    pub fn record(&self, action: &StatsAction) -> WorkerStatistics {
        let next = {
            let mut statistics = lock(&self.statistics);
            *statistics = statistics.transition(action);
            statistics.clone()
        };
        tracing::trace!(?action, "record");
        self.publish();
        next
    }

    pub fn state(&self) -> WorkerState {
        lock(&self.state).clone()
    }

    pub fn statistics(&self) -> WorkerStatistics {
        lock(&self.statistics).clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state(),
            statistics: self.statistics(),
        }
    }

    /// Receiver that observes every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
