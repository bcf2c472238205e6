// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot delayed state actions
//!
//! Timers are keyed by id. Scheduling an id that is already pending
//! replaces the pending entry.

use crate::state::WorkerAction;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Instant;

/// A state action waiting for its deadline
#[derive(Debug, Clone)]
pub struct DelayedAction {
    pub id: String,
    pub fire_at: Instant,
    pub action: WorkerAction,
}

impl PartialEq for DelayedAction {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.id == other.id
    }
}

impl Eq for DelayedAction {}

impl PartialOrd for DelayedAction {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DelayedAction {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Min-heap: earliest first
        Reverse(self.fire_at).cmp(&Reverse(other.fire_at))
    }
}

/// Pending delayed actions, earliest first
#[derive(Debug, Default)]
pub struct Scheduler {
    items: BinaryHeap<DelayedAction>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire at `fire_at`, replacing any pending `id`
    pub fn schedule(&mut self, id: impl Into<String>, fire_at: Instant, action: WorkerAction) {
        let id = id.into();
        self.cancel(&id);
        self.items.push(DelayedAction {
            id,
            fire_at,
            action,
        });
    }

    /// Drop a pending action; unknown ids are ignored
    pub fn cancel(&mut self, id: &str) {
        self.items.retain(|item| item.id != id);
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Remove and return every action due at or before `now`
    pub fn poll(&mut self, now: Instant) -> Vec<DelayedAction> {
        let mut ready = Vec::new();

        while let Some(item) = self.items.peek() {
            if item.fire_at > now {
                break;
            }
            let Some(item) = self.items.pop() else {
                break;
            };
            ready.push(item);
        }

        ready
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.items.peek().map(|item| item.fire_at)
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
