// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cws-core: pure building blocks of the compute worker session
//!
//! This crate provides:
//! - Worker options model, leaf merge, and resolution
//! - Pure reducers for worker lifecycle state and session statistics
//! - The worker event vocabulary and the effects derived from it
//! - Clock, id generation, and delayed-action scheduling

pub mod clock;
pub mod config;
pub mod effect;
pub mod error;
pub mod event;
pub mod id;
pub mod identity;
pub mod options;
pub mod scheduler;
pub mod state;
pub mod stats;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{GlobalConfig, SessionConfig};
pub use effect::{effects_for, Effect, FETCH_SETTLE_TIMER};
pub use error::{ConfigurationError, ErrorKind, OptionsError, StateError};
pub use event::{SandboxEvent, WorkerEvent};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use identity::{Address, Keystore, PaymentAddress};
pub use options::{
    default_worker_options, leaf_merge, write_path, AllowOrigins, Cores, MinimumWage, OptionPath,
    OptionsResolver, PersistedRecord, ResolveRequest, SessionControls, SharedOptions, WatchedField,
    WorkerOptions,
};
pub use scheduler::{DelayedAction, Scheduler};
pub use state::{WorkerAction, WorkerState, WorkerStatus};
pub use stats::{StatsAction, WorkerStatistics};
