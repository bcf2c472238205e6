// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Options resolution

use super::merge::leaf_merge;
use super::types::{PersistedRecord, SessionControls, WorkerOptions};
use crate::config::GlobalConfig;
use crate::error::ConfigurationError;
use crate::identity::{Address, PaymentAddress};
use serde_json::{json, Map, Value};

/// Options the session falls back to when the global config has none
///
/// No `maxWorkingSandboxes`: the worker sizes itself
/// from the host hardware.
pub fn default_worker_options() -> Value {
    json!({
        "trustComputeGroupOrigins": true,
        "allowOrigins": {
            "any": [],
            "fetchWorkFunctions": [],
            "fetchArguments": [],
            "fetchData": [],
            "sendResults": [],
        },
        "minimumWage": {
            "CPU": 0,
            "GPU": 0,
            "in": 0,
            "out": 0,
        },
        "computeGroups": [],
        "jobAddresses": [],
        "paymentAddress": null,
        "evaluatorOptions": {},
    })
}

/// Everything a single resolution consumes
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    /// Caller overrides, leaf-merged over the base
    pub overrides: Value,
    /// Typed payment address; wins over `overrides.paymentAddress`
    pub payment_address: Option<PaymentAddress>,
    /// Record loaded from persistent storage for this identity
    pub persisted: Option<PersistedRecord>,
    pub use_local_storage: bool,
}

impl ResolveRequest {
    pub fn with_overrides(overrides: Value) -> Self {
        Self {
            overrides,
            ..Self::default()
        }
    }

    pub fn payment_address(mut self, address: impl Into<PaymentAddress>) -> Self {
        self.payment_address = Some(address.into());
        self
    }

    pub fn persisted(mut self, record: Option<PersistedRecord>, use_local_storage: bool) -> Self {
        self.persisted = record;
        self.use_local_storage = use_local_storage;
        self
    }
}

/// Produces canonical [`WorkerOptions`] from layered inputs
#[derive(Debug, Clone)]
pub struct OptionsResolver {
    base: Value,
}

impl OptionsResolver {
    /// Resolver whose base is the built-in defaults only
    pub fn with_defaults() -> Self {
        Self {
            base: default_worker_options(),
        }
    }

    /// Resolver whose base is the built-in defaults overlaid with the global
    /// `[worker]` table
    pub fn from_global(config: &GlobalConfig) -> Self {
        let mut base = default_worker_options();
        if let Some(worker) = &config.worker {
            leaf_merge(&mut base, worker);
        }
        Self { base }
    }

    /// Resolve one request
    ///
    /// Precedence: base, then caller overrides, then the persisted `cores`
    /// subset (only with local storage enabled).
    pub fn resolve(&self, request: ResolveRequest) -> Result<WorkerOptions, ConfigurationError> {
        self.resolve_with_controls(request).map(|(options, _)| options)
    }

    /// Resolve, splitting out the session controls the worker never receives
    pub fn resolve_with_controls(
        &self,
        request: ResolveRequest,
    ) -> Result<(WorkerOptions, SessionControls), ConfigurationError> {
        let mut merged = self.base.clone();

        let overrides: Map<String, Value> = match request.overrides {
            Value::Null => Map::new(),
            other => serde_json::from_value(other).map_err(ConfigurationError::MalformedOptions)?,
        };
        leaf_merge(&mut merged, &Value::Object(overrides));

        if let Some(address) = request.payment_address {
            let address = address.canonicalize()?;
            leaf_merge(&mut merged, &json!({ "paymentAddress": address.as_str() }));
        }

        if request.use_local_storage {
            if let Some(cores) = request.persisted.and_then(|record| record.cores) {
                let cores = serde_json::to_value(cores).map_err(ConfigurationError::MalformedOptions)?;
                leaf_merge(&mut merged, &json!({ "cores": cores }));
            }
        }

        let Value::Object(tree) = &mut merged else {
            return Err(ConfigurationError::MissingPaymentAddress);
        };

        let address = match tree.get("paymentAddress") {
            Some(value) => Address::from_value(value)?,
            None => return Err(ConfigurationError::MissingPaymentAddress),
        };
        tree.insert("paymentAddress".to_string(), Value::String(address.to_string()));

        match tree.get("computeGroups") {
            Some(Value::Array(_)) => {}
            Some(other) => {
                tracing::warn!(found = %other, "computeGroups is not a sequence, resetting");
                tree.insert("computeGroups".to_string(), Value::Array(Vec::new()));
            }
            None => {
                tree.insert("computeGroups".to_string(), Value::Array(Vec::new()));
            }
        }

        let has_cores = tree.get("cores").is_some_and(|cores| !cores.is_null());
        if has_cores && tree.remove("maxWorkingSandboxes").is_some() {
            tracing::debug!("cores configured, dropping maxWorkingSandboxes");
        }

        let controls = take_controls(tree)?;
        let options =
            serde_json::from_value(merged).map_err(ConfigurationError::MalformedOptions)?;
        Ok((options, controls))
    }
}

fn take_controls(tree: &mut Map<String, Value>) -> Result<SessionControls, ConfigurationError> {
    let stop_immediately = match tree.remove("shouldStopWorkingImmediately") {
        Some(value) => serde_json::from_value::<Option<bool>>(value)
            .map_err(ConfigurationError::MalformedOptions)?
            .unwrap_or(false),
        None => false,
    };
    Ok(SessionControls { stop_immediately })
}

impl Default for OptionsResolver {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
