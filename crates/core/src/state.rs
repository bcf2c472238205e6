// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker lifecycle state machine
//!
//! A pure reducer: the same state and action always produce the same next
//! state. Worker events are translated into actions by [`crate::effect`].
//!
//! `will_work` records a requested start (`Some(true)`) or stop
//! (`Some(false)`) and resolves back to `None` once `working` reflects it.

use crate::error::StateError;
use serde::Serialize;

/// Snapshot of what the worker is doing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerState {
    /// A worker has been constructed and bound
    pub is_loaded: bool,
    /// Sandboxes currently executing a slice
    pub working_sandboxes: usize,
    pub working: bool,
    /// Pending start/stop request
    pub will_work: Option<bool>,
    /// A task fetch is in flight (or settling)
    pub fetching: bool,
    /// Results are in flight
    pub submitting: bool,
    pub error: Option<StateError>,
    /// Bumped on every watched options change
    pub revision: u64,
}

/// Named transitions of [`WorkerState`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerAction {
    WorkerLoaded,
    /// The bound worker was dropped without a replacement
    WorkerUnloaded,
    SetWorkingSandboxes(usize),
    FetchingTrue,
    FetchingFalse,
    SubmittingTrue,
    SubmittingFalse,
    WorkingTrue,
    WorkingFalse,
    WillWorkTrue,
    WillWorkFalse,
    SetError(StateError),
    ClearError,
    /// Watched options changed; observers should re-read derived values
    Refresh,
}

/// Coarse status for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkerStatus {
    /// No worker constructed yet
    Loading,
    Error,
    Starting,
    Stopping,
    Working,
    Idle,
}

impl WorkerState {
    /// Apply one action
    pub fn transition(&self, action: &WorkerAction) -> WorkerState {
        let mut next = self.clone();
        match action {
            WorkerAction::WorkerLoaded => next.is_loaded = true,
            WorkerAction::WorkerUnloaded => {
                next.is_loaded = false;
                next.working_sandboxes = 0;
            }
            WorkerAction::SetWorkingSandboxes(count) => next.working_sandboxes = *count,
            WorkerAction::FetchingTrue => next.fetching = true,
            WorkerAction::FetchingFalse => next.fetching = false,
            WorkerAction::SubmittingTrue => next.submitting = true,
            WorkerAction::SubmittingFalse => next.submitting = false,
            WorkerAction::WorkingTrue => {
                next.working = true;
                if next.will_work == Some(true) {
                    next.will_work = None;
                }
            }
            WorkerAction::WorkingFalse => {
                next.working = false;
                if next.will_work != Some(true) {
                    next.will_work = None;
                }
            }
            WorkerAction::WillWorkTrue => next.will_work = Some(true),
            WorkerAction::WillWorkFalse => next.will_work = Some(false),
            WorkerAction::SetError(error) => next.error = Some(error.clone()),
            WorkerAction::ClearError => next.error = None,
            WorkerAction::Refresh => next.revision = next.revision.wrapping_add(1),
        }
        next
    }

    /// Apply a sequence of actions in order
    pub fn apply_all<'a>(&self, actions: impl IntoIterator<Item = &'a WorkerAction>) -> WorkerState {
        actions
            .into_iter()
            .fold(self.clone(), |state, action| state.transition(action))
    }

    pub fn status(&self) -> WorkerStatus {
        if !self.is_loaded {
            WorkerStatus::Loading
        } else if self.error.is_some() {
            WorkerStatus::Error
        } else if self.will_work == Some(true) && !self.working {
            WorkerStatus::Starting
        } else if self.will_work == Some(false) && self.working {
            WorkerStatus::Stopping
        } else if self.working {
            WorkerStatus::Working
        } else {
            WorkerStatus::Idle
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
