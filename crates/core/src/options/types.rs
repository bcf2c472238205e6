// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed worker options

use crate::identity::Address;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical worker configuration
///
/// Keys serialize in camelCase so the value handed to the hosting
/// environment matches what it expects. Keys the session does not model are
/// kept in `extra` and passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerOptions {
    #[serde(default = "default_trust")]
    pub trust_compute_group_origins: bool,
    #[serde(default)]
    pub allow_origins: AllowOrigins,
    #[serde(default)]
    pub minimum_wage: MinimumWage,
    #[serde(default)]
    pub compute_groups: Vec<Value>,
    #[serde(default)]
    pub job_addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<Cores>,
    /// Legacy sandbox limit; dropped during resolution when `cores` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_working_sandboxes: Option<u32>,
    pub payment_address: Address,
    #[serde(default)]
    pub evaluator_options: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_trust() -> bool {
    true
}

/// Origins the worker may contact, per purpose
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowOrigins {
    #[serde(default)]
    pub any: Vec<String>,
    #[serde(default)]
    pub fetch_work_functions: Vec<String>,
    #[serde(default)]
    pub fetch_arguments: Vec<String>,
    #[serde(default)]
    pub fetch_data: Vec<String>,
    #[serde(default)]
    pub send_results: Vec<String>,
}

/// Lowest acceptable pay rates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinimumWage {
    #[serde(rename = "CPU", default)]
    pub cpu: f64,
    #[serde(rename = "GPU", default)]
    pub gpu: f64,
    #[serde(rename = "in", default)]
    pub inbound: f64,
    #[serde(rename = "out", default)]
    pub outbound: f64,
}

/// Compute resources the worker may use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu: Option<u32>,
}

impl Cores {
    pub fn cpu(cpu: u32) -> Self {
        Self {
            cpu: Some(cpu),
            gpu: None,
        }
    }
}

/// Caller settings lifted out of the options before the worker sees them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionControls {
    /// `shouldStopWorkingImmediately`, passed to every `stop()`
    pub stop_immediately: bool,
}

/// The subset of options kept in persistent storage, per identity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<Cores>,
}
