// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced wrappers for consistent observability

use crate::worker::{HostError, Worker, WorkerError, WorkerHost};
use async_trait::async_trait;
use cws_core::{Keystore, SharedOptions, WorkerEvent};
use tokio::sync::mpsc;
use tracing::Instrument;

/// Wrapper that adds tracing to any WorkerHost
#[derive(Clone)]
pub struct TracedWorkerHost<H> {
    inner: H,
}

impl<H> TracedWorkerHost<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H: WorkerHost> WorkerHost for TracedWorkerHost<H> {
    type Worker = TracedWorker<H::Worker>;

    fn construct(
        &self,
        identity: Option<&Keystore>,
        options: SharedOptions,
    ) -> Result<Self::Worker, HostError> {
        let span = tracing::info_span!(
            "worker.construct",
            identity = identity.map(|k| k.address().as_str())
        );
        let _guard = span.enter();

        let cores = options.read(|o| o.cores);
        tracing::info!(?cores, "constructing");

        let start = std::time::Instant::now();
        let result = self.inner.construct(identity, options);
        let elapsed = start.elapsed();

        match &result {
            Ok(worker) => tracing::info!(
                worker_id = worker.id(),
                elapsed_ms = elapsed.as_millis() as u64,
                "worker constructed"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "construct failed"
            ),
        }

        result.map(TracedWorker::new)
    }
}

/// Wrapper that adds tracing to any Worker
pub struct TracedWorker<W> {
    inner: W,
}

impl<W> TracedWorker<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &W {
        &self.inner
    }
}

#[async_trait]
impl<W: Worker> Worker for TracedWorker<W> {
    fn id(&self) -> &str {
        self.inner.id()
    }

    async fn start(&self) -> Result<(), WorkerError> {
        let span = tracing::info_span!("worker.start", worker_id = self.inner.id());
        async {
            let start = std::time::Instant::now();
            let result = self.inner.start().await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "started"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "start failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn stop(&self, immediate: bool) -> Result<(), WorkerError> {
        let span = tracing::info_span!("worker.stop", worker_id = self.inner.id(), immediate);
        async {
            let start = std::time::Instant::now();
            let result = self.inner.stop(immediate).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "stopped"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "stop failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<WorkerEvent> {
        tracing::debug!(worker_id = self.inner.id(), "subscribed");
        self.inner.subscribe()
    }

    fn working_sandboxes(&self) -> Vec<String> {
        let sandboxes = self.inner.working_sandboxes();
        tracing::trace!(worker_id = self.inner.id(), count = sandboxes.len(), "working sandboxes");
        sandboxes
    }

    fn options(&self) -> SharedOptions {
        self.inner.options()
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
