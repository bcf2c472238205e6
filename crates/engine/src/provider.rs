// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session provider
//!
//! One provider per application. The session behind it is created on the
//! first successful [`SessionProvider::attach`]; later attaches share it.
//! Failures before that point are recorded on the provider's store so
//! observers can see them.

use crate::binder::{BinderConfig, BinderDeps, EventBinder};
use crate::error::SessionError;
use crate::reactive::ReactiveOptions;
use crate::store::{SessionSnapshot, SessionStore};
use cws_adapters::WorkerHost;
use cws_core::{
    Clock, ConfigurationError, ErrorKind, GlobalConfig, IdGen, Keystore, OptionsResolver,
    PaymentAddress, ResolveRequest, SharedOptions, StateError, SystemClock, UuidIdGen,
    WorkerAction, WorkerState, WorkerStatistics,
};
use cws_storage::{KeyValueStore, PersistedOptions};
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use tokio::sync::watch;

/// What a consumer passes when attaching
#[derive(Debug, Clone, Default)]
pub struct SessionParams {
    /// Worker option overrides, camelCase keys
    pub overrides: Value,
    pub payment_address: Option<PaymentAddress>,
    /// Identity handed to the worker constructor
    pub identity: Option<Keystore>,
    /// Overrides `session.use_local_storage` from the global config
    pub use_local_storage: Option<bool>,
}

impl SessionParams {
    pub fn new(overrides: Value) -> Self {
        Self {
            overrides,
            ..Self::default()
        }
    }

    pub fn payment_address(mut self, address: impl Into<PaymentAddress>) -> Self {
        self.payment_address = Some(address.into());
        self
    }

    pub fn identity(mut self, identity: Keystore) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn use_local_storage(mut self, enabled: bool) -> Self {
        self.use_local_storage = Some(enabled);
        self
    }
}

/// Read-only view handed to consumers
pub struct SessionView<W> {
    pub worker: Option<Arc<W>>,
    pub state: WorkerState,
    pub statistics: WorkerStatistics,
}

/// A live session: options, the binder, and its store
pub struct Session<H: WorkerHost, C, I> {
    options: ReactiveOptions,
    binder: EventBinder<H, C, I>,
}

impl<H, C, I> Session<H, C, I>
where
    H: WorkerHost,
    C: Clock,
    I: IdGen,
{
    pub fn options(&self) -> &ReactiveOptions {
        &self.options
    }

    pub fn binder(&self) -> &EventBinder<H, C, I> {
        &self.binder
    }

    pub fn worker(&self) -> Option<Arc<H::Worker>> {
        self.binder.worker()
    }

    pub fn view(&self) -> SessionView<H::Worker> {
        let snapshot = self.binder.store().snapshot();
        SessionView {
            worker: self.binder.worker(),
            state: snapshot.state,
            statistics: snapshot.statistics,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.binder.store().state()
    }

    pub fn statistics(&self) -> WorkerStatistics {
        self.binder.store().statistics()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.binder.store().subscribe()
    }

    pub async fn start_worker(&self) {
        self.binder.start_worker().await
    }

    pub async fn stop_worker(&self) {
        self.binder.stop_worker().await
    }

    pub async fn toggle_worker(&self) {
        self.binder.toggle_worker().await
    }

    pub fn working_sandboxes(&self) -> Vec<String> {
        self.binder.working_sandboxes()
    }

    pub fn sandbox_count(&self) -> usize {
        self.binder.sandbox_count()
    }

    pub async fn process_pending(&self) -> usize {
        self.binder.process_pending().await
    }

    pub async fn run(&self) {
        self.binder.run().await
    }
}

/// Lazily creates and hands out the application's session
pub struct SessionProvider<H: WorkerHost, C = SystemClock, I = UuidIdGen> {
    config: GlobalConfig,
    host: Option<H>,
    clock: C,
    id_gen: I,
    storage: Arc<dyn KeyValueStore>,
    store: Arc<SessionStore>,
    session: OnceLock<Arc<Session<H, C, I>>>,
}

impl<H: WorkerHost> SessionProvider<H> {
    /// `host` is `None` when no hosting environment is available
    pub fn new(config: GlobalConfig, host: Option<H>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self::with_deps(config, host, SystemClock, UuidIdGen, storage)
    }
}

impl<H, C, I> SessionProvider<H, C, I>
where
    H: WorkerHost,
    C: Clock,
    I: IdGen,
{
    pub fn with_deps(
        config: GlobalConfig,
        host: Option<H>,
        clock: C,
        id_gen: I,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            config,
            host,
            clock,
            id_gen,
            storage,
            store: Arc::new(SessionStore::new()),
            session: OnceLock::new(),
        }
    }

    /// Store shared by every session this provider creates
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// The session, once one has been created
    pub fn session(&self) -> Option<Arc<Session<H, C, I>>> {
        self.session.get().cloned()
    }

    /// Create the session on first use, then bind its worker
    ///
    /// Configuration problems are returned and also recorded on the store.
    /// Once a session exists, `params` is ignored and the existing session is
    /// returned.
    pub async fn attach(&self, params: SessionParams) -> Result<Arc<Session<H, C, I>>, SessionError> {
        if let Some(session) = self.session.get() {
            session.binder.initialize().await?;
            return Ok(Arc::clone(session));
        }

        let Some(host) = self.host.clone() else {
            return Err(self.configuration_failed(ConfigurationError::MissingHost));
        };

        let use_local_storage = params
            .use_local_storage
            .unwrap_or(self.config.session.use_local_storage);
        let persistence = use_local_storage.then(|| {
            PersistedOptions::new(
                Arc::clone(&self.storage),
                self.config.session.identity.as_deref(),
            )
        });

        let request = ResolveRequest {
            overrides: params.overrides,
            payment_address: params.payment_address,
            persisted: persistence.as_ref().and_then(PersistedOptions::load),
            use_local_storage,
        };
        let (resolved, controls) = match OptionsResolver::from_global(&self.config)
            .resolve_with_controls(request)
        {
            Ok(resolved) => resolved,
            Err(e) => return Err(self.configuration_failed(e)),
        };

        let options = SharedOptions::new(resolved);
        let built = Arc::new(Session {
            options: ReactiveOptions::new(options.clone(), Arc::clone(&self.store), persistence),
            binder: EventBinder::new(
                BinderDeps {
                    host,
                    clock: self.clock.clone(),
                    id_gen: self.id_gen.clone(),
                },
                BinderConfig {
                    identity: params.identity,
                    settle_delay: self.config.session.fetch_settle_delay,
                    stop_immediately: controls.stop_immediately,
                },
                options,
                Arc::clone(&self.store),
            ),
        });

        // A concurrent attach may have won; its session is the one kept
        let session = Arc::clone(self.session.get_or_init(|| built));
        self.clear_configuration_error();
        tracing::info!(
            payment_address = %session.options.snapshot().payment_address,
            use_local_storage,
            "session created"
        );

        session.binder.initialize().await?;
        Ok(session)
    }

    fn configuration_failed(&self, err: ConfigurationError) -> SessionError {
        tracing::error!(error = %err, "cannot create session");
        self.store
            .dispatch(&WorkerAction::SetError(StateError::configuration(&err)));
        err.into()
    }

    fn clear_configuration_error(&self) {
        let stale = self
            .store
            .state()
            .error
            .is_some_and(|e| e.kind == ErrorKind::Configuration);
        if stale {
            self.store.dispatch(&WorkerAction::ClearError);
        }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
