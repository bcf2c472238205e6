// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cws-engine: the compute worker session
//!
//! Ties resolved options, the session store, and the live worker together.

mod binder;
mod error;
mod provider;
mod reactive;
mod store;

pub use binder::{BinderConfig, BinderDeps, BinderPhase, EventBinder};
pub use error::SessionError;
pub use provider::{Session, SessionParams, SessionProvider, SessionView};
pub use reactive::{OptionsPersistence, ReactiveOptions};
pub use store::{SessionSnapshot, SessionStore};
