// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the session engine
//!
//! Only construction can fail outward. Start/stop rejections, worker
//! runtime errors, and storage failures are recorded on the session state.

use cws_adapters::HostError;
use cws_core::ConfigurationError;
use thiserror::Error;

/// Errors that prevent a session from binding a worker
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("host error: {0}")]
    Host(#[from] HostError),
}
