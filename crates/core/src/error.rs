// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types shared across the session
//!
//! Only [`ConfigurationError`] ever propagates out of session construction.
//! Everything that happens after a worker exists is folded into
//! [`StateError`] and recorded on the worker state instead.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Fatal problems with how the session was configured
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("worker options must contain a paymentAddress")]
    MissingPaymentAddress,
    #[error("invalid paymentAddress ({kind}): {reason}")]
    InvalidPaymentAddress { kind: &'static str, reason: String },
    #[error("worker hosting environment is not available")]
    MissingHost,
    #[error("malformed worker options: {0}")]
    MalformedOptions(#[source] serde_json::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] toml::de::Error),
    #[error("failed to read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from writing through the options wrapper
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("option path is empty")]
    EmptyPath,
    #[error("cannot write below non-object value at `{0}`")]
    NotAnObject(String),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Which part of the taxonomy an error recorded in state belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Construction-time misconfiguration
    Configuration,
    /// A rejected start/stop call
    Operation,
    /// Reported by the worker through an error-bearing event
    Runtime,
}

/// An error as observers see it on the worker state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateError {
    pub kind: ErrorKind,
    pub message: String,
}

impl StateError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn configuration(err: &ConfigurationError) -> Self {
        Self::new(ErrorKind::Configuration, err.to_string())
    }

    pub fn operation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Operation, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Runtime, message)
    }
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}
