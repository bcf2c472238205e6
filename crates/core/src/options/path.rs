// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dotted paths into the options tree and the watched field set

use super::types::WorkerOptions;
use crate::error::{ConfigurationError, OptionsError};
use crate::identity::Address;
use serde_json::{Map, Value};
use std::str::FromStr;

/// Fields whose mutation is persisted and announced to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchedField {
    PaymentAddress,
    Cores,
    MaxWorkingSandboxes,
    Cpu,
}

impl WatchedField {
    pub const ALL: [WatchedField; 4] = [
        WatchedField::PaymentAddress,
        WatchedField::Cores,
        WatchedField::MaxWorkingSandboxes,
        WatchedField::Cpu,
    ];

    /// Match a single option key (case sensitive)
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    pub fn key(&self) -> &'static str {
        match self {
            WatchedField::PaymentAddress => "paymentAddress",
            WatchedField::Cores => "cores",
            WatchedField::MaxWorkingSandboxes => "maxWorkingSandboxes",
            WatchedField::Cpu => "cpu",
        }
    }
}

impl std::fmt::Display for WatchedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A dotted path such as `cores.cpu` or `minimumWage.CPU`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionPath(Vec<String>);

impl OptionPath {
    pub fn new<I, S>(segments: I) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(String::is_empty) {
            return Err(OptionsError::EmptyPath);
        }
        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The key actually assigned by a write to this path
    pub fn leaf(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// The watched field a write to this path touches, if any
    ///
    /// Only the assigned key counts: writing `cores.cpu` touches `cpu`,
    /// writing `minimumWage.CPU` touches nothing.
    pub fn watched(&self) -> Option<WatchedField> {
        WatchedField::from_key(self.leaf())
    }
}

impl FromStr for OptionPath {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.split('.'))
    }
}

impl std::fmt::Display for OptionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Assign `value` at `path` inside `options`
///
/// The write is validated against the typed model before it lands, so a
/// rejected write leaves `options` untouched. A `paymentAddress` write goes
/// through address coercion first.
pub fn write_path(
    options: &mut WorkerOptions,
    path: &OptionPath,
    value: Value,
) -> Result<(), OptionsError> {
    let value = if path.segments() == [WatchedField::PaymentAddress.key()] {
        Value::String(Address::from_value(&value)?.to_string())
    } else {
        value
    };

    let mut tree = serde_json::to_value(&*options).map_err(ConfigurationError::MalformedOptions)?;
    assign(&mut tree, path, value)?;
    *options = serde_json::from_value(tree).map_err(ConfigurationError::MalformedOptions)?;
    Ok(())
}

fn assign(tree: &mut Value, path: &OptionPath, value: Value) -> Result<(), OptionsError> {
    let (leaf, parents) = match path.segments().split_last() {
        Some(split) => split,
        None => return Err(OptionsError::EmptyPath),
    };

    let mut cursor = tree;
    for (depth, segment) in parents.iter().enumerate() {
        let Value::Object(map) = cursor else {
            return Err(OptionsError::NotAnObject(parents[..depth].join(".")));
        };
        let slot = map
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if slot.is_null() {
            *slot = Value::Object(Map::new());
        }
        cursor = slot;
    }

    match cursor {
        Value::Object(map) => {
            map.insert(leaf.clone(), value);
            Ok(())
        }
        _ => Err(OptionsError::NotAnObject(parents.join("."))),
    }
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
