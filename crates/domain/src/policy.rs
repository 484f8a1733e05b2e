// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schedule policy parameters.
//!
//! The assignment algorithm exists in one parameterized form; every knob
//! that historically varied between call sites (lead time, search horizon,
//! blackout adjacency strictness) is an explicit field here rather than a
//! constant re-derived per caller.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Parameters governing slot search for one colony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePolicy {
    /// Minimum number of days between submission and the earliest permitted
    /// visit start.
    pub lead_time_days: u32,
    /// Maximum number of day-advances the search may make past the earliest
    /// start; no candidate later than `earliest + horizon` is tested.
    pub search_horizon_days: u32,
    /// Whether the day immediately before a candidate span must also be
    /// clear of blackout days (the admission-morning buffer rule).
    pub check_day_before: bool,
    /// Whether the day immediately after a candidate span must also be
    /// clear. Off by default; enabling it forbids ending a visit on the eve
    /// of a sanitary day.
    pub check_day_after: bool,
}

impl SchedulePolicy {
    /// Default minimum lead time in days.
    pub const DEFAULT_LEAD_TIME_DAYS: u32 = 10;
    /// Default search horizon in days.
    pub const DEFAULT_HORIZON_DAYS: u32 = 60;
    /// Extended horizon used by single-request approval paths.
    pub const EXTENDED_HORIZON_DAYS: u32 = 365;

    /// Creates a policy with explicit lead time and horizon and default
    /// adjacency rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters fail [`Self::validate`].
    pub fn new(lead_time_days: u32, search_horizon_days: u32) -> Result<Self, DomainError> {
        let policy = Self {
            lead_time_days,
            search_horizon_days,
            ..Self::default()
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Validates the policy parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the horizon is zero or either the lead time or
    /// the horizon exceeds a calendar year.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.search_horizon_days == 0 {
            return Err(DomainError::InvalidPolicy {
                reason: String::from("search horizon must be at least 1 day"),
            });
        }
        if self.search_horizon_days > 365 {
            return Err(DomainError::InvalidPolicy {
                reason: format!(
                    "search horizon {} exceeds 365 days",
                    self.search_horizon_days
                ),
            });
        }
        if self.lead_time_days > 365 {
            return Err(DomainError::InvalidPolicy {
                reason: format!("lead time {} exceeds 365 days", self.lead_time_days),
            });
        }
        Ok(())
    }
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            lead_time_days: Self::DEFAULT_LEAD_TIME_DAYS,
            search_horizon_days: Self::DEFAULT_HORIZON_DAYS,
            check_day_before: true,
            check_day_after: false,
        }
    }
}
