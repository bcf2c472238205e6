// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Translation of worker events into reducer actions
//!
//! [`effects_for`] is pure. The binder executes the returned effects in
//! order against the session store and its scheduler.

use crate::error::StateError;
use crate::event::{SandboxEvent, WorkerEvent};
use crate::state::WorkerAction;
use crate::stats::StatsAction;
use std::time::Duration;

/// Timer id for the delayed `FetchingFalse`
pub const FETCH_SETTLE_TIMER: &str = "fetch-settle";

/// Side effects requested by a worker event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Apply a lifecycle action now
    Dispatch(WorkerAction),
    /// Apply a statistics action now
    Record(StatsAction),
    /// Apply a lifecycle action after `delay`
    Schedule {
        id: String,
        action: WorkerAction,
        delay: Duration,
    },
    /// Drop a scheduled action
    Cancel { id: String },
    /// Replace the worker with a freshly constructed one
    Reinitialize,
    /// Forward a message to the diagnostic sink
    Diagnose(String),
}

/// Effects for one event
///
/// `working_sandboxes` is the worker's live count at the time the event is
/// handled.
pub fn effects_for(
    event: &WorkerEvent,
    working_sandboxes: usize,
    settle_delay: Duration,
) -> Vec<Effect> {
    match event {
        WorkerEvent::Sandbox { event, .. } => match event {
            SandboxEvent::Created => vec![],
            SandboxEvent::Slice | SandboxEvent::End => {
                vec![Effect::Dispatch(WorkerAction::SetWorkingSandboxes(
                    working_sandboxes,
                ))]
            }
            SandboxEvent::Metrics { elapsed } => {
                vec![Effect::Record(StatsAction::AddComputeTime(*elapsed))]
            }
        },
        WorkerEvent::Payment { amount } => vec![
            Effect::Record(StatsAction::AddSlice),
            Effect::Record(StatsAction::AddCredits(amount.clone())),
            Effect::Dispatch(WorkerAction::SetWorkingSandboxes(working_sandboxes)),
        ],
        WorkerEvent::BeforeFetch => vec![
            Effect::Cancel {
                id: FETCH_SETTLE_TIMER.to_string(),
            },
            Effect::Dispatch(WorkerAction::FetchingTrue),
        ],
        WorkerEvent::Fetch { error: Some(error) } => {
            vec![Effect::Dispatch(WorkerAction::SetError(StateError::runtime(
                error.clone(),
            )))]
        }
        WorkerEvent::Fetch { error: None } => vec![
            Effect::Dispatch(WorkerAction::ClearError),
            Effect::Schedule {
                id: FETCH_SETTLE_TIMER.to_string(),
                action: WorkerAction::FetchingFalse,
                delay: settle_delay,
            },
        ],
        WorkerEvent::BeforeReturn => vec![Effect::Dispatch(WorkerAction::SubmittingTrue)],
        WorkerEvent::Result { error: Some(error) } => {
            vec![Effect::Dispatch(WorkerAction::SetError(StateError::runtime(
                error.clone(),
            )))]
        }
        WorkerEvent::Result { error: None } => {
            vec![Effect::Dispatch(WorkerAction::SubmittingFalse)]
        }
        WorkerEvent::Start => vec![
            Effect::Dispatch(WorkerAction::WillWorkTrue),
            Effect::Dispatch(WorkerAction::WorkingTrue),
        ],
        WorkerEvent::Stop => vec![
            Effect::Dispatch(WorkerAction::WillWorkFalse),
            Effect::Dispatch(WorkerAction::WorkingFalse),
            Effect::Reinitialize,
        ],
        WorkerEvent::Error { message } => vec![Effect::Diagnose(message.clone())],
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
