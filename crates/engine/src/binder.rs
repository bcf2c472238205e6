// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker construction and event binding
//!
//! The binder owns the live worker. It constructs it once (guarded by a
//! latch), routes its events into the session store, and replaces it with a
//! fresh worker whenever it stops:
//!
//! ```text
//! Unbound -> Initializing -> Ready -> Reinitializing -> Ready
//! ```
//!
//! Events are handled strictly one at a time, either by awaiting [`run`] or
//! by calling [`process_pending`]. Only one of them holds the event stream at
//! any moment.
//!
//! [`run`]: EventBinder::run
//! [`process_pending`]: EventBinder::process_pending

use crate::error::SessionError;
use crate::store::SessionStore;
use cws_adapters::{Worker, WorkerHost};
use cws_core::{
    effects_for, Clock, Effect, ErrorKind, IdGen, Keystore, SandboxEvent, Scheduler,
    SharedOptions, StateError, WorkerAction, WorkerEvent,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TryRecvError};

type EventStream = Option<mpsc::UnboundedReceiver<WorkerEvent>>;

/// Where the binder is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinderPhase {
    Unbound,
    Initializing,
    Ready,
    Reinitializing,
}

/// Collaborators the binder drives
pub struct BinderDeps<H, C, I> {
    pub host: H,
    pub clock: C,
    pub id_gen: I,
}

/// Per-session binder settings
#[derive(Debug, Clone)]
pub struct BinderConfig {
    /// Identity handed to every constructed worker
    pub identity: Option<Keystore>,
    /// How long `fetching` stays set after a successful fetch
    pub settle_delay: Duration,
    /// Passed to every `stop()` call
    pub stop_immediately: bool,
}

struct Binding<W> {
    id: String,
    worker: Arc<W>,
    // Sandboxes whose creation was observed on this binding
    sandboxes: HashSet<String>,
}

/// Binds one worker at a time to the session store
pub struct EventBinder<H: WorkerHost, C, I> {
    host: H,
    clock: C,
    id_gen: I,
    config: BinderConfig,
    options: SharedOptions,
    store: Arc<SessionStore>,
    started: AtomicBool,
    phase: Mutex<BinderPhase>,
    binding: Mutex<Option<Binding<H::Worker>>>,
    events: tokio::sync::Mutex<EventStream>,
    scheduler: Mutex<Scheduler>,
}

impl<H, C, I> EventBinder<H, C, I>
where
    H: WorkerHost,
    C: Clock,
    I: IdGen,
{
    pub fn new(
        deps: BinderDeps<H, C, I>,
        config: BinderConfig,
        options: SharedOptions,
        store: Arc<SessionStore>,
    ) -> Self {
        Self {
            host: deps.host,
            clock: deps.clock,
            id_gen: deps.id_gen,
            config,
            options,
            store,
            started: AtomicBool::new(false),
            phase: Mutex::new(BinderPhase::Unbound),
            binding: Mutex::new(None),
            events: tokio::sync::Mutex::new(None),
            scheduler: Mutex::new(Scheduler::new()),
        }
    }

    /// Construct and bind the first worker
    ///
    /// Returns `Ok(false)` when initialization already started elsewhere.
    /// A failed construction releases the latch so a later call can retry.
    pub async fn initialize(&self) -> Result<bool, SessionError> {
        if self
            .started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("worker initialization already started");
            return Ok(false);
        }

        self.set_phase(BinderPhase::Initializing);
        let mut events = self.events.lock().await;
        match self.bind_new(&mut events) {
            Ok(()) => {
                self.clear_binding_error();
                Ok(true)
            }
            Err(e) => {
                tracing::error!(error = %e, "worker construction failed");
                self.set_phase(BinderPhase::Unbound);
                self.started.store(false, Ordering::Release);
                self.store.dispatch(&WorkerAction::SetError(StateError::new(
                    ErrorKind::Configuration,
                    e.to_string(),
                )));
                Err(e)
            }
        }
    }

    pub fn phase(&self) -> BinderPhase {
        *lock(&self.phase)
    }

    /// The currently bound worker
    pub fn worker(&self) -> Option<Arc<H::Worker>> {
        lock(&self.binding)
            .as_ref()
            .map(|binding| Arc::clone(&binding.worker))
    }

    /// Id of the current binding; changes on every reinitialization
    pub fn binding_id(&self) -> Option<String> {
        lock(&self.binding).as_ref().map(|binding| binding.id.clone())
    }

    /// Ids of the sandboxes working on the current worker, read live
    pub fn working_sandboxes(&self) -> Vec<String> {
        self.worker()
            .map(|worker| worker.working_sandboxes())
            .unwrap_or_default()
    }

    pub fn sandbox_count(&self) -> usize {
        self.working_sandboxes().len()
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Ask the worker to start
    ///
    /// Rejections are logged and recorded on the state, never returned.
    pub async fn start_worker(&self) {
        let Some(worker) = self.loaded_worker() else {
            tracing::warn!("start requested with no worker loaded");
            return;
        };
        self.store.dispatch(&WorkerAction::WillWorkTrue);
        if let Err(e) = worker.start().await {
            tracing::error!(worker_id = worker.id(), error = %e, "starting the worker failed");
            self.store
                .dispatch(&WorkerAction::SetError(StateError::operation(e.to_string())));
        }
    }

    /// Ask the worker to stop, honoring [`BinderConfig::stop_immediately`]
    pub async fn stop_worker(&self) {
        self.store.dispatch(&WorkerAction::WillWorkFalse);
        let Some(worker) = self.loaded_worker() else {
            tracing::warn!("stop requested with no worker loaded");
            return;
        };
        if let Err(e) = worker.stop(self.config.stop_immediately).await {
            tracing::error!(worker_id = worker.id(), error = %e, "stopping the worker failed");
            self.store
                .dispatch(&WorkerAction::SetError(StateError::operation(e.to_string())));
        }
    }

    /// Stop when working, start otherwise
    pub async fn toggle_worker(&self) {
        if self.store.state().working {
            self.stop_worker().await;
        } else {
            self.start_worker().await;
        }
    }

    /// Handle every event already delivered and every timer already due
    ///
    /// Returns how many events and timers were handled.
    pub async fn process_pending(&self) -> usize {
        let mut events = self.events.lock().await;
        let mut handled = self.fire_due();
        loop {
            let Some(rx) = events.as_mut() else {
                break;
            };
            let event = match rx.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("worker event stream closed");
                    *events = None;
                    break;
                }
            };
            self.handle(&mut events, event);
            handled += 1;
        }
        handled + self.fire_due()
    }

    /// Handle events and timers until no worker is bound
    pub async fn run(&self) {
        let mut events = self.events.lock().await;
        loop {
            self.fire_due();
            let Some(rx) = events.as_mut() else {
                tracing::debug!("no worker bound, event loop exiting");
                return;
            };

            let deadline = lock(&self.scheduler).next_deadline();
            let received = match deadline {
                Some(at) => {
                    let wait = self.clock.remaining(at);
                    tokio::select! {
                        event = rx.recv() => Some(event),
                        _ = tokio::time::sleep(wait) => None,
                    }
                }
                None => Some(rx.recv().await),
            };

            match received {
                // A timer came due
                None => continue,
                Some(Some(event)) => self.handle(&mut events, event),
                Some(None) => {
                    tracing::warn!("worker event stream closed");
                    *events = None;
                }
            }
        }
    }

    /// Apply every delayed action that is due
    pub fn fire_due(&self) -> usize {
        let due = lock(&self.scheduler).poll(self.clock.now());
        for item in &due {
            tracing::trace!(timer = %item.id, "timer fired");
            self.store.dispatch(&item.action);
        }
        due.len()
    }

    fn loaded_worker(&self) -> Option<Arc<H::Worker>> {
        if !self.store.state().is_loaded {
            return None;
        }
        self.worker()
    }

    /// Drop errors left by an earlier failed binding
    ///
    /// Operation errors belong to the caller's last start/stop and stay.
    fn clear_binding_error(&self) {
        let stale = self.store.state().error.is_some_and(|e| {
            matches!(e.kind, ErrorKind::Configuration | ErrorKind::Runtime)
        });
        if stale {
            tracing::debug!("clearing error from previous binding");
            self.store.dispatch(&WorkerAction::ClearError);
        }
    }

    fn set_phase(&self, phase: BinderPhase) {
        let mut current = lock(&self.phase);
        let from = *current;
        tracing::debug!(?from, to = ?phase, "binder phase");
        *current = phase;
    }

    fn bind_new(&self, events: &mut EventStream) -> Result<(), SessionError> {
        let worker = self
            .host
            .construct(self.config.identity.as_ref(), self.options.clone())?;
        let id = self.id_gen.next();
        tracing::info!(binding = %id, worker_id = worker.id(), "worker bound");

        // Replacing the receiver detaches the previous worker
        *events = Some(worker.subscribe());
        *lock(&self.binding) = Some(Binding {
            id,
            worker: Arc::new(worker),
            sandboxes: HashSet::new(),
        });
        self.store.dispatch(&WorkerAction::WorkerLoaded);
        self.set_phase(BinderPhase::Ready);
        Ok(())
    }

    fn reinitialize(&self, events: &mut EventStream) {
        self.set_phase(BinderPhase::Reinitializing);
        if let Some(old) = lock(&self.binding).as_ref() {
            tracing::info!(
                binding = %old.id,
                worker_id = old.worker.id(),
                "replacing stopped worker"
            );
        }

        match self.bind_new(events) {
            Ok(()) => tracing::info!("worker reinitialized"),
            Err(e) => {
                tracing::error!(error = %e, "failed to construct replacement worker");
                *events = None;
                *lock(&self.binding) = None;
                self.set_phase(BinderPhase::Unbound);
                self.started.store(false, Ordering::Release);
                self.store.dispatch(&WorkerAction::WorkerUnloaded);
                self.store
                    .dispatch(&WorkerAction::SetError(StateError::runtime(e.to_string())));
            }
        }
    }

    fn handle(&self, events: &mut EventStream, event: WorkerEvent) {
        let (worker_id, working_sandboxes) = {
            let mut binding = lock(&self.binding);
            let Some(binding) = binding.as_mut() else {
                return;
            };

            if let WorkerEvent::Sandbox {
                sandbox_id,
                event: sandbox_event,
            } = &event
            {
                match sandbox_event {
                    SandboxEvent::Created => {
                        binding.sandboxes.insert(sandbox_id.clone());
                    }
                    _ if !binding.sandboxes.contains(sandbox_id) => {
                        tracing::debug!(
                            sandbox_id = %sandbox_id,
                            event = event.name(),
                            "untracked sandbox, ignoring"
                        );
                        return;
                    }
                    SandboxEvent::End => {
                        binding.sandboxes.remove(sandbox_id);
                    }
                    _ => {}
                }
            }

            (
                binding.worker.id().to_string(),
                binding.worker.working_sandboxes().len(),
            )
        };

        if event == WorkerEvent::Stop && self.phase() != BinderPhase::Ready {
            tracing::debug!(worker_id = %worker_id, "stop while not ready, ignoring");
            return;
        }

        tracing::trace!(worker_id = %worker_id, event = event.name(), "worker event");
        for effect in effects_for(&event, working_sandboxes, self.config.settle_delay) {
            match effect {
                Effect::Dispatch(action) => {
                    self.store.dispatch(&action);
                }
                Effect::Record(action) => {
                    self.store.record(&action);
                }
                Effect::Schedule { id, action, delay } => {
                    lock(&self.scheduler).schedule(id, self.clock.deadline(delay), action);
                }
                Effect::Cancel { id } => lock(&self.scheduler).cancel(&id),
                Effect::Reinitialize => self.reinitialize(events),
                Effect::Diagnose(message) => {
                    tracing::error!(worker_id = %worker_id, diagnostic = %message, "worker error");
                }
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
#[path = "binder_tests.rs"]
mod tests;
