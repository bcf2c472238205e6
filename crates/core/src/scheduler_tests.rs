// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::{Clock, FakeClock};
use std::time::Duration;

#[test]
fn fires_items_at_correct_time() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();

    let now = clock.now();
    scheduler.schedule("a", now + Duration::from_secs(10), WorkerAction::FetchingFalse);
    scheduler.schedule("b", now + Duration::from_secs(5), WorkerAction::SubmittingFalse);

    assert!(scheduler.poll(now).is_empty());

    clock.advance(Duration::from_secs(5));
    let ready = scheduler.poll(clock.now());
    assert_eq!(ready.len(), 1);
    assert_eq!(ready[0].id, "b");
    assert_eq!(ready[0].action, WorkerAction::SubmittingFalse);

    clock.advance(Duration::from_secs(5));
    let ready = scheduler.poll(clock.now());
    assert_eq!(ready.len(), 1);
    assert_eq!(ready[0].id, "a");
    assert!(scheduler.is_empty());
}

#[test]
fn multiple_items_fire_in_order() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();

    let now = clock.now();
    scheduler.schedule("a", now + Duration::from_secs(30), WorkerAction::FetchingFalse);
    scheduler.schedule("b", now + Duration::from_secs(10), WorkerAction::FetchingFalse);
    scheduler.schedule("c", now + Duration::from_secs(20), WorkerAction::FetchingFalse);

    clock.advance(Duration::from_secs(35));
    let ids: Vec<_> = scheduler
        .poll(clock.now())
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
}

#[test]
fn cancel_prevents_firing() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();

    scheduler.schedule(
        "settle",
        clock.now() + Duration::from_secs(1),
        WorkerAction::FetchingFalse,
    );
    scheduler.cancel("settle");

    clock.advance(Duration::from_secs(2));
    assert!(scheduler.poll(clock.now()).is_empty());
}

#[test]
fn reschedule_after_cancel_still_fires() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();

    scheduler.schedule(
        "settle",
        clock.now() + Duration::from_secs(1),
        WorkerAction::FetchingFalse,
    );
    scheduler.cancel("settle");
    scheduler.schedule(
        "settle",
        clock.now() + Duration::from_secs(1),
        WorkerAction::FetchingFalse,
    );

    clock.advance(Duration::from_secs(1));
    assert_eq!(scheduler.poll(clock.now()).len(), 1);
}

#[test]
fn schedule_replaces_pending_id() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();

    let now = clock.now();
    scheduler.schedule("settle", now + Duration::from_secs(1), WorkerAction::FetchingFalse);
    scheduler.schedule("settle", now + Duration::from_secs(3), WorkerAction::FetchingFalse);

    assert_eq!(scheduler.next_deadline(), Some(now + Duration::from_secs(3)));
    clock.advance(Duration::from_secs(2));
    assert!(scheduler.poll(clock.now()).is_empty());
    assert!(scheduler.is_pending("settle"));
}

#[test]
fn cancel_unknown_id_is_noop() {
    let mut scheduler = Scheduler::new();
    scheduler.cancel("missing");
    assert!(scheduler.is_empty());
    assert_eq!(scheduler.next_deadline(), None);
}
