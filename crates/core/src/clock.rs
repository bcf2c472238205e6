// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time for delayed state actions
//!
//! The binder asks its clock for the deadline of a settle timer when a fetch
//! completes, and for the time left before the earliest pending timer while it
//! waits for worker events.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Monotonic time source used by the session binder
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Instant;

    /// When a timer armed now with `delay` should fire
    fn deadline(&self, delay: Duration) -> Instant {
        let now = self.now();
        now.checked_add(delay).unwrap_or(now)
    }

    /// Time left until `deadline`; zero once it has passed
    fn remaining(&self, deadline: Instant) -> Duration {
        deadline.saturating_duration_since(self.now())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Test clock stepped by hand; clones share one timeline
#[derive(Debug, Clone)]
pub struct FakeClock {
    instant: Arc<Mutex<Instant>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            instant: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.instant.lock().unwrap_or_else(|e| e.into_inner()) += by;
    }

    /// Jump to `deadline` so timers due at it fire; never moves backward
    pub fn advance_to(&self, deadline: Instant) {
        let mut instant = self.instant.lock().unwrap_or_else(|e| e.into_inner());
        if deadline > *instant {
            *instant = deadline;
        }
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        *self.instant.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
