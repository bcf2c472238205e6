// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::str::FromStr;
use yare::parameterized;

#[parameterized(
    created = { WorkerEvent::sandbox("s1", SandboxEvent::Created), "sandbox" },
    slice = { WorkerEvent::sandbox("s1", SandboxEvent::Slice), "sandbox:slice" },
    end = { WorkerEvent::sandbox("s1", SandboxEvent::End), "sandbox:end" },
    fetch = { WorkerEvent::fetch_ok(), "fetch" },
    fetch_failed = { WorkerEvent::fetch_failed("boom"), "fetch" },
    before_return = { WorkerEvent::BeforeReturn, "beforeReturn" },
    stop = { WorkerEvent::Stop, "stop" },
)]
fn event_names(event: WorkerEvent, expected: &str) {
    assert_eq!(event.name(), expected);
}

#[test]
fn payment_amount_round_trips_through_json() {
    let event = WorkerEvent::payment(BigDecimal::from_str("2.25").unwrap());
    let json = serde_json::to_string(&event).unwrap();
    let back: WorkerEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}
