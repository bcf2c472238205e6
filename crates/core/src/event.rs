// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events emitted by a live worker

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lifecycle events delivered by the hosting environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerEvent {
    /// Activity on one sandbox; `Created` must arrive before the others
    Sandbox {
        sandbox_id: String,
        event: SandboxEvent,
    },

    /// Payment settled for one completed slice
    Payment { amount: BigDecimal },

    /// A task fetch is about to be sent
    BeforeFetch,

    /// A task fetch finished, successfully or not
    Fetch { error: Option<String> },

    /// Results are about to be returned
    BeforeReturn,

    /// Results were returned, successfully or not
    Result { error: Option<String> },

    /// The worker began working
    Start,

    /// The worker stopped working
    Stop,

    /// Worker-level diagnostic
    Error { message: String },
}

/// Events scoped to a single sandbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SandboxEvent {
    Created,
    /// A slice began executing
    Slice,
    /// Measured execution time for the last slice
    Metrics { elapsed: Duration },
    /// The sandbox finished its slice
    End,
}

impl WorkerEvent {
    pub fn sandbox(sandbox_id: impl Into<String>, event: SandboxEvent) -> Self {
        WorkerEvent::Sandbox {
            sandbox_id: sandbox_id.into(),
            event,
        }
    }

    pub fn payment(amount: BigDecimal) -> Self {
        WorkerEvent::Payment { amount }
    }

    pub fn fetch_ok() -> Self {
        WorkerEvent::Fetch { error: None }
    }

    pub fn fetch_failed(error: impl Into<String>) -> Self {
        WorkerEvent::Fetch {
            error: Some(error.into()),
        }
    }

    pub fn result_ok() -> Self {
        WorkerEvent::Result { error: None }
    }

    pub fn result_failed(error: impl Into<String>) -> Self {
        WorkerEvent::Result {
            error: Some(error.into()),
        }
    }

    /// Event name as the hosting environment spells it
    pub fn name(&self) -> &'static str {
        match self {
            WorkerEvent::Sandbox { event, .. } => match event {
                SandboxEvent::Created => "sandbox",
                SandboxEvent::Slice => "sandbox:slice",
                SandboxEvent::Metrics { .. } => "sandbox:metrics",
                SandboxEvent::End => "sandbox:end",
            },
            WorkerEvent::Payment { .. } => "payment",
            WorkerEvent::BeforeFetch => "beforeFetch",
            WorkerEvent::Fetch { .. } => "fetch",
            WorkerEvent::BeforeReturn => "beforeReturn",
            WorkerEvent::Result { .. } => "result",
            WorkerEvent::Start => "start",
            WorkerEvent::Stop => "stop",
            WorkerEvent::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
