//! Capacity policy model.
//!
//! Capacity is static for the process lifetime. The check is read-then-decide
//! with no reservation: concurrent submissions near the boundary can each see
//! a count below the limit and all commit, so the cap is best-effort.

use serde::{Deserialize, Serialize};

/// Configured proctor capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CapacityConfig {
    pub primary_capacity: i64,
    pub reserve_capacity: i64,
    pub total_capacity: i64,
}

impl CapacityConfig {
    /// Builds a normalized capacity config.
    ///
    /// Negative inputs are treated as zero; a non-positive `total` falls back
    /// to `primary + reserve`.
    pub fn new(primary: i64, reserve: i64, total: i64) -> Self {
        let primary = primary.max(0);
        let reserve = reserve.max(0);
        let total_capacity = if total > 0 {
            total
        } else {
            primary.saturating_add(reserve)
        };

        Self {
            primary_capacity: primary,
            reserve_capacity: reserve,
            total_capacity,
        }
    }

    /// Whether `current_non_admin_count` has reached the cap.
    ///
    /// A zero total means no cap is configured and is never full.
    pub fn is_full(&self, current_non_admin_count: i64) -> bool {
        self.total_capacity > 0 && current_non_admin_count >= self.total_capacity
    }

    /// Remaining slots, never negative. `None` when uncapped.
    pub fn remaining(&self, current_non_admin_count: i64) -> Option<i64> {
        (self.total_capacity > 0)
            .then(|| (self.total_capacity - current_non_admin_count).max(0))
    }
}
