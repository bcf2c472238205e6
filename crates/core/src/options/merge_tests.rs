// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use similar_asserts::assert_eq;

#[test]
fn nested_mappings_merge_key_by_key() {
    let mut base = json!({
        "minimumWage": { "CPU": 0, "GPU": 0, "in": 0, "out": 0 },
        "trustComputeGroupOrigins": true,
    });
    leaf_merge(&mut base, &json!({ "minimumWage": { "CPU": 5 } }));

    assert_eq!(
        base,
        json!({
            "minimumWage": { "CPU": 5, "GPU": 0, "in": 0, "out": 0 },
            "trustComputeGroupOrigins": true,
        })
    );
}

#[test]
fn sequences_replace_rather_than_append() {
    let mut base = json!({ "jobAddresses": ["a", "b"] });
    leaf_merge(&mut base, &json!({ "jobAddresses": ["c"] }));
    assert_eq!(base, json!({ "jobAddresses": ["c"] }));
}

#[test]
fn scalar_over_mapping_replaces() {
    let mut base = json!({ "computeGroups": {} });
    leaf_merge(&mut base, &json!({ "computeGroups": [] }));
    assert_eq!(base, json!({ "computeGroups": [] }));
}

#[test]
fn null_overlay_clears_a_leaf() {
    let mut base = json!({ "maxWorkingSandboxes": 4 });
    leaf_merge(&mut base, &json!({ "maxWorkingSandboxes": null }));
    assert_eq!(base, json!({ "maxWorkingSandboxes": null }));
}

#[test]
fn new_keys_are_added() {
    let mut base = json!({});
    leaf_merge(&mut base, &json!({ "leavePublicGroup": true, "cores": { "cpu": 2 } }));
    assert_eq!(base, json!({ "leavePublicGroup": true, "cores": { "cpu": 2 } }));
}

#[test]
fn empty_overlay_is_a_no_op() {
    let original = json!({ "cores": { "cpu": 2, "gpu": 1 } });
    let mut base = original.clone();
    leaf_merge(&mut base, &json!({}));
    assert_eq!(base, original);
}
