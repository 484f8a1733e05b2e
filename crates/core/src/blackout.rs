// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Colony blackout ("sanitary day") calendar.
//!
//! A date is blacked out for a colony if a sanitary-day row exists for it.
//! The calendar is loaded once per scheduling run and answers span queries
//! under the adjacency rules of the active [`SchedulePolicy`]: the span
//! itself, optionally the day immediately before it (no admission the
//! morning after a sanitation closure without a buffer day), and optionally
//! the day immediately after it.

use chrono::NaiveDate;
use std::collections::BTreeSet;
use tashrif_domain::{DateSpan, SchedulePolicy};

/// The set of blackout dates for one colony.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlackoutCalendar {
    days: BTreeSet<NaiveDate>,
}

impl BlackoutCalendar {
    /// Creates an empty calendar.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            days: BTreeSet::new(),
        }
    }

    /// Creates a calendar from a set of blackout dates.
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            days: dates.into_iter().collect(),
        }
    }

    /// Returns whether the given day is blacked out.
    #[must_use]
    pub fn is_blocked(&self, day: NaiveDate) -> bool {
        self.days.contains(&day)
    }

    /// Returns the number of blackout days in the calendar.
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Returns whether the calendar has no blackout days.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Returns the latest blackout day that blocks `span` under `policy`,
    /// or `None` if the span is usable.
    ///
    /// The checked window is the span itself, widened by one day on either
    /// side when the corresponding adjacency flag is set.
    #[must_use]
    pub fn blocking_day(&self, span: &DateSpan, policy: &SchedulePolicy) -> Option<NaiveDate> {
        let mut latest: Option<NaiveDate> = None;

        if policy.check_day_before
            && let Some(day_before) = span.start.pred_opt()
            && self.is_blocked(day_before)
        {
            latest = Some(day_before);
        }
        for day in span.iter_days() {
            if self.is_blocked(day) {
                latest = Some(day);
            }
        }
        if policy.check_day_after
            && let Some(day_after) = span.end.succ_opt()
            && self.is_blocked(day_after)
        {
            latest = Some(day_after);
        }
        latest
    }

    /// Returns the last day of the contiguous blackout run containing `day`.
    ///
    /// If `day` itself is not blacked out, `day` is returned unchanged.
    /// The skip-ahead rule uses this to jump past a whole run instead of
    /// re-testing days known to fail one at a time.
    #[must_use]
    pub fn run_end(&self, day: NaiveDate) -> NaiveDate {
        let mut end = day;
        while let Some(next) = end.succ_opt() {
            if self.is_blocked(next) {
                end = next;
            } else {
                break;
            }
        }
        end
    }
}
