// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identity and address values
//!
//! These are pass-through values owned by the hosting environment. The
//! session only checks that an address exists and has the canonical type; it
//! never looks inside one.

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical account address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Construct from a raw string
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ConfigurationError> {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            return Err(ConfigurationError::InvalidPaymentAddress {
                kind: "string",
                reason: "address is empty".to_string(),
            });
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(ConfigurationError::InvalidPaymentAddress {
                kind: "string",
                reason: format!("address `{raw}` contains whitespace"),
            });
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Coerce a loosely typed options value into an address
    ///
    /// Accepts a string or a keystore-shaped mapping `{ "address": "..." }`.
    pub fn from_value(value: &Value) -> Result<Self, ConfigurationError> {
        match value {
            Value::Null => Err(ConfigurationError::MissingPaymentAddress),
            Value::String(raw) => Self::new(raw),
            Value::Object(map) => match map.get("address") {
                Some(Value::String(raw)) => Self::new(raw),
                Some(nested @ Value::Object(_)) => Self::from_value(nested),
                _ => Err(ConfigurationError::InvalidPaymentAddress {
                    kind: "object",
                    reason: "mapping has no address".to_string(),
                }),
            },
            Value::Bool(_) => Err(invalid_kind("boolean")),
            Value::Number(_) => Err(invalid_kind("number")),
            Value::Array(_) => Err(invalid_kind("array")),
        }
    }
}

fn invalid_kind(kind: &'static str) -> ConfigurationError {
    ConfigurationError::InvalidPaymentAddress {
        kind,
        reason: "expected an address, keystore, or string".to_string(),
    }
}

impl TryFrom<String> for Address {
    type Error = ConfigurationError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A keystore identity; only its address is ever used by the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keystore {
    address: Address,
    label: Option<String>,
}

impl Keystore {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl From<&Keystore> for Address {
    fn from(keystore: &Keystore) -> Self {
        keystore.address.clone()
    }
}

/// Anything a caller may hand over as a payment address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentAddress {
    Raw(String),
    Address(Address),
    Keystore(Keystore),
}

impl PaymentAddress {
    /// Reduce to the canonical address type
    pub fn canonicalize(self) -> Result<Address, ConfigurationError> {
        match self {
            PaymentAddress::Raw(raw) => Address::new(raw),
            PaymentAddress::Address(address) => Ok(address),
            PaymentAddress::Keystore(keystore) => Ok(keystore.address),
        }
    }
}

impl From<&str> for PaymentAddress {
    fn from(raw: &str) -> Self {
        PaymentAddress::Raw(raw.to_string())
    }
}

impl From<String> for PaymentAddress {
    fn from(raw: String) -> Self {
        PaymentAddress::Raw(raw)
    }
}

impl From<Address> for PaymentAddress {
    fn from(address: Address) -> Self {
        PaymentAddress::Address(address)
    }
}

impl From<Keystore> for PaymentAddress {
    fn from(keystore: Keystore) -> Self {
        PaymentAddress::Keystore(keystore)
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
