// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session statistics
//!
//! Every field only grows. Credits are summed as decimals so repeated
//! payments never drift the way float accumulation would.

use bigdecimal::{BigDecimal, Zero};
use serde::Serialize;
use std::time::Duration;

/// Running totals for the lifetime of a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerStatistics {
    /// Slices paid for
    pub slices: u64,
    /// Credits earned
    pub credits: BigDecimal,
    /// Time spent executing slices
    #[serde(with = "humantime_serde")]
    pub compute_time: Duration,
}

/// Increment actions applied to [`WorkerStatistics`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsAction {
    AddSlice,
    AddCredits(BigDecimal),
    AddComputeTime(Duration),
}

impl WorkerStatistics {
    pub fn transition(&self, action: &StatsAction) -> WorkerStatistics {
        let mut next = self.clone();
        match action {
            StatsAction::AddSlice => next.slices = next.slices.saturating_add(1),
            StatsAction::AddCredits(amount) => {
                if *amount < BigDecimal::zero() {
                    tracing::warn!(%amount, "ignoring negative credit amount");
                } else {
                    next.credits += amount;
                }
            }
            StatsAction::AddComputeTime(elapsed) => {
                next.compute_time = next.compute_time.saturating_add(*elapsed);
            }
        }
        next
    }

    /// True when no field of `self` is below the matching field of `earlier`
    pub fn dominates(&self, earlier: &WorkerStatistics) -> bool {
        self.slices >= earlier.slices
            && self.credits >= earlier.credits
            && self.compute_time >= earlier.compute_time
    }
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
