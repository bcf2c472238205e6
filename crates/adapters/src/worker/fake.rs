// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scriptable worker host for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{HostError, Worker, WorkerError, WorkerHost};
use async_trait::async_trait;
use cws_core::{Keystore, SharedOptions, WorkerEvent};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

/// Recorded host call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Construct {
        worker_id: String,
        identity: Option<Keystore>,
    },
    ConstructFailed {
        reason: String,
    },
}

/// Recorded worker call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerCall {
    Start,
    Stop { immediate: bool },
}

#[derive(Default)]
struct HostState {
    workers: Vec<FakeWorker>,
    calls: Vec<HostCall>,
    construct_error: Option<String>,
    start_error: Option<String>,
    stop_error: Option<String>,
    quiet: bool,
    next_id: u64,
}

/// Fake host; clones share constructed workers and recorded calls
#[derive(Clone, Default)]
pub struct FakeWorkerHost {
    inner: Arc<Mutex<HostState>>,
}

impl FakeWorkerHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every later `construct` fail
    pub fn fail_construct(&self, reason: impl Into<String>) {
        self.lock().construct_error = Some(reason.into());
    }

    /// Undo [`FakeWorkerHost::fail_construct`]
    pub fn allow_construct(&self) {
        self.lock().construct_error = None;
    }

    /// Make `start` reject on workers constructed from now on
    pub fn fail_start(&self, reason: impl Into<String>) {
        self.lock().start_error = Some(reason.into());
    }

    /// Make `stop` reject on workers constructed from now on
    pub fn fail_stop(&self, reason: impl Into<String>) {
        self.lock().stop_error = Some(reason.into());
    }

    /// Workers constructed from now on do not emit `start`/`stop` themselves
    pub fn quiet(&self) {
        self.lock().quiet = true;
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.lock().calls.clone()
    }

    pub fn workers(&self) -> Vec<FakeWorker> {
        self.lock().workers.clone()
    }

    /// Most recently constructed worker
    pub fn latest(&self) -> Option<FakeWorker> {
        self.lock().workers.last().cloned()
    }

    pub fn constructed(&self) -> usize {
        self.lock().workers.len()
    }
}

impl WorkerHost for FakeWorkerHost {
    type Worker = FakeWorker;

    fn construct(
        &self,
        identity: Option<&Keystore>,
        options: SharedOptions,
    ) -> Result<FakeWorker, HostError> {
        let mut host = self.lock();
        if let Some(reason) = host.construct_error.clone() {
            host.calls.push(HostCall::ConstructFailed {
                reason: reason.clone(),
            });
            return Err(HostError::ConstructFailed(reason));
        }

        host.next_id += 1;
        let id = format!("fake-worker-{}", host.next_id);
        let worker = FakeWorker {
            id: id.clone(),
            options,
            identity: identity.cloned(),
            state: Arc::new(Mutex::new(WorkerInner {
                start_error: host.start_error.clone(),
                stop_error: host.stop_error.clone(),
                emits_lifecycle: !host.quiet,
                ..WorkerInner::default()
            })),
        };
        host.calls.push(HostCall::Construct {
            worker_id: id,
            identity: identity.cloned(),
        });
        host.workers.push(worker.clone());
        Ok(worker)
    }
}

#[derive(Default)]
struct WorkerInner {
    subscribers: Vec<mpsc::UnboundedSender<WorkerEvent>>,
    calls: Vec<WorkerCall>,
    working_sandboxes: Vec<String>,
    start_error: Option<String>,
    stop_error: Option<String>,
    emits_lifecycle: bool,
}

/// Fake worker; clones share subscribers and recorded calls
#[derive(Clone)]
pub struct FakeWorker {
    id: String,
    options: SharedOptions,
    identity: Option<Keystore>,
    state: Arc<Mutex<WorkerInner>>,
}

impl FakeWorker {
    fn lock(&self) -> MutexGuard<'_, WorkerInner> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Deliver an event to every live subscriber
    pub fn emit(&self, event: WorkerEvent) {
        self.lock()
            .subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn set_working_sandboxes<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock().working_sandboxes = ids.into_iter().map(Into::into).collect();
    }

    pub fn calls(&self) -> Vec<WorkerCall> {
        self.lock().calls.clone()
    }

    /// Subscribers whose receiver is still alive
    pub fn subscriber_count(&self) -> usize {
        let mut state = self.lock();
        state.subscribers.retain(|tx| !tx.is_closed());
        state.subscribers.len()
    }

    pub fn identity(&self) -> Option<&Keystore> {
        self.identity.as_ref()
    }
}

#[async_trait]
impl Worker for FakeWorker {
    fn id(&self) -> &str {
        &self.id
    }

    async fn start(&self) -> Result<(), WorkerError> {
        let emits = {
            let mut state = self.lock();
            state.calls.push(WorkerCall::Start);
            if let Some(reason) = state.start_error.clone() {
                return Err(WorkerError::StartRejected(reason));
            }
            state.emits_lifecycle
        };
        if emits {
            self.emit(WorkerEvent::Start);
        }
        Ok(())
    }

    async fn stop(&self, immediate: bool) -> Result<(), WorkerError> {
        let emits = {
            let mut state = self.lock();
            state.calls.push(WorkerCall::Stop { immediate });
            if let Some(reason) = state.stop_error.clone() {
                return Err(WorkerError::StopRejected(reason));
            }
            state.emits_lifecycle
        };
        if emits {
            self.emit(WorkerEvent::Stop);
        }
        Ok(())
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<WorkerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().subscribers.push(tx);
        rx
    }

    fn working_sandboxes(&self) -> Vec<String> {
        self.lock().working_sandboxes.clone()
    }

    fn options(&self) -> SharedOptions {
        self.options.clone()
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
