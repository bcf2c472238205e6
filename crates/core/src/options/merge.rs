// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Leaf merge of loosely typed option trees

use serde_json::Value;

/// Merge `overlay` into `base`, key by key
///
/// Mappings present on both sides merge recursively. Any other overlay value
/// (scalar, sequence, null) replaces what was in `base`.
pub fn leaf_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                let nested = value.is_object() && base.get(key).is_some_and(Value::is_object);
                if !nested {
                    base.insert(key.clone(), value.clone());
                } else if let Some(existing) = base.get_mut(key) {
                    leaf_merge(existing, value);
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
