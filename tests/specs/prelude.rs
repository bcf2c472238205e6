//! Shared harness for session specs

pub use bigdecimal::BigDecimal;
pub use cws_adapters::{FakeWorker, FakeWorkerHost, Worker, WorkerCall};
pub use cws_core::{
    Cores, ErrorKind, FakeClock, GlobalConfig, SandboxEvent, SequentialIdGen, WorkerEvent,
};
pub use cws_engine::{Session, SessionError, SessionParams, SessionProvider};
pub use cws_storage::{KeyValueStore, MemoryStore, OPTIONS_STORAGE_KEY};
pub use serde_json::{json, Value};
pub use std::str::FromStr;
pub use std::sync::Arc;
pub use std::time::Duration;

pub type TestSession = Session<FakeWorkerHost, FakeClock, SequentialIdGen>;

/// A provider wired to fakes, plus handles to inspect them
pub struct Harness {
    pub provider: SessionProvider<FakeWorkerHost, FakeClock, SequentialIdGen>,
    pub host: FakeWorkerHost,
    pub storage: MemoryStore,
    pub clock: FakeClock,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_storage(MemoryStore::new())
    }

    pub fn with_storage(storage: MemoryStore) -> Self {
        Self::build(GlobalConfig::default(), storage)
    }

    pub fn build(config: GlobalConfig, storage: MemoryStore) -> Self {
        let host = FakeWorkerHost::new();
        let clock = FakeClock::new();
        let provider = SessionProvider::with_deps(
            config,
            Some(host.clone()),
            clock.clone(),
            SequentialIdGen::new("binding"),
            Arc::new(storage.clone()) as Arc<dyn KeyValueStore>,
        );
        Self {
            provider,
            host,
            storage,
            clock,
        }
    }

    pub async fn attach(&self, overrides: Value) -> Arc<TestSession> {
        self.provider
            .attach(SessionParams::new(overrides))
            .await
            .unwrap()
    }

    /// Worker currently bound to the session
    pub fn worker(&self) -> FakeWorker {
        self.host.latest().unwrap()
    }

    /// Parsed value of the persisted options key
    pub fn persisted(&self) -> Option<Value> {
        self.storage
            .get(OPTIONS_STORAGE_KEY)
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }
}

pub fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}
