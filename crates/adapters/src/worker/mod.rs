// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker hosting environment contract

#[cfg(any(test, feature = "test-support"))]
mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeWorker, FakeWorkerHost, HostCall, WorkerCall};

use async_trait::async_trait;
use cws_core::{Keystore, SharedOptions, WorkerEvent};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from constructing a worker
#[derive(Debug, Error)]
pub enum HostError {
    #[error("worker construction failed: {0}")]
    ConstructFailed(String),
}

/// Errors from controlling a live worker
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkerError {
    #[error("start rejected: {0}")]
    StartRejected(String),
    #[error("stop rejected: {0}")]
    StopRejected(String),
}

/// A live compute worker
#[async_trait]
pub trait Worker: Send + Sync + 'static {
    /// Stable id for logging
    fn id(&self) -> &str;

    async fn start(&self) -> Result<(), WorkerError>;

    /// Stop working; `immediate` abandons in-flight slices
    async fn stop(&self, immediate: bool) -> Result<(), WorkerError>;

    /// Register for lifecycle events; drop the receiver to unsubscribe
    fn subscribe(&self) -> mpsc::UnboundedReceiver<WorkerEvent>;

    /// Ids of the sandboxes currently executing a slice
    fn working_sandboxes(&self) -> Vec<String>;

    /// The options instance this worker reads from
    fn options(&self) -> SharedOptions;
}

/// Constructs workers
pub trait WorkerHost: Clone + Send + Sync + 'static {
    type Worker: Worker;

    fn construct(
        &self,
        identity: Option<&Keystore>,
        options: SharedOptions,
    ) -> Result<Self::Worker, HostError>;
}
