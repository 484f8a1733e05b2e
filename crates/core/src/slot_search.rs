// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slot search for a single visit request.
//!
//! Starting from an earliest-allowed date, the search moves forward one
//! candidate start date at a time, bounded by the policy horizon. At each
//! candidate it first clears the prospective span against the blackout
//! calendar (degrading the category to one day when that rescues the date),
//! then scans rooms in ascending order for the first room free across the
//! whole span.
//!
//! Two deliberate simplicity choices, kept from the consolidated design:
//! degradation never grows back within one call (no backtracking to recover
//! the nominal duration at a later date), and the horizon is a date ceiling
//! rather than an iteration count, so skipping a long blackout run consumes
//! the days it covers.

use crate::blackout::BlackoutCalendar;
use crate::error::ScheduleError;
use crate::occupancy::OccupancyGrid;
use chrono::NaiveDate;
use tashrif_domain::{DateSpan, RoomId, SchedulePolicy, VisitCategory, calendar};

/// The output of a successful slot search.
///
/// Ephemeral: folded into the visit request on persistence, discarded on
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    /// The assigned date span.
    pub span: DateSpan,
    /// The assigned room.
    pub room: RoomId,
    /// The effective category, possibly degraded from the nominal one.
    pub category: VisitCategory,
}

impl Assignment {
    /// Returns the first visit day.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.span.start
    }

    /// Returns the last visit day (inclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.span.end
    }

    /// Returns the effective duration in days.
    #[must_use]
    pub const fn duration_days(&self) -> i64 {
        self.span.len_days()
    }
}

/// Outcome of clearing one candidate date against the blackout calendar.
enum SpanCheck {
    /// The span (possibly degraded) is clear; rooms may be scanned.
    Usable {
        span: DateSpan,
        category: VisitCategory,
    },
    /// Blocked even after degradation; skip past the blackout run ending
    /// on this day.
    Blocked { run_end: NaiveDate },
}

/// Clears a candidate start date against the blackout calendar.
///
/// The duration resets to the nominal category at every candidate; when the
/// nominal span is blocked the category degrades to one day and the check
/// repeats once. A date blocked either way reports the end of the blackout
/// run responsible so the caller can jump past it.
fn check_candidate(
    candidate: NaiveDate,
    category: VisitCategory,
    blackouts: &BlackoutCalendar,
    policy: &SchedulePolicy,
) -> Result<SpanCheck, ScheduleError> {
    let nominal = DateSpan::from_start(candidate, category.nominal_duration())?;
    let Some(blocking) = blackouts.blocking_day(&nominal, policy) else {
        return Ok(SpanCheck::Usable {
            span: nominal,
            category,
        });
    };

    if category.nominal_duration() > 1 {
        let degraded = category.degraded();
        let short = DateSpan::from_start(candidate, degraded.nominal_duration())?;
        if blackouts.blocking_day(&short, policy).is_none() {
            return Ok(SpanCheck::Usable {
                span: short,
                category: degraded,
            });
        }
    }

    Ok(SpanCheck::Blocked {
        run_end: blackouts.run_end(blocking),
    })
}

/// Searches forward from `earliest` for the first usable (date, room) slot.
///
/// # Arguments
///
/// * `earliest` - The lead-time floor; no candidate starts before it
/// * `category` - The nominal visit category
/// * `blackouts` - The colony's blackout calendar
/// * `grid` - Current room occupancy, including assignments already made in
///   this batch
/// * `policy` - Active schedule policy
///
/// # Returns
///
/// The first-fit assignment: earliest usable date wins, and among free rooms
/// on that date the lowest number wins.
///
/// # Errors
///
/// Returns `ScheduleError::NoSlotFound` when no candidate start date up to
/// `earliest + horizon` admits the visit.
pub fn find_slot(
    earliest: NaiveDate,
    category: VisitCategory,
    blackouts: &BlackoutCalendar,
    grid: &OccupancyGrid,
    policy: &SchedulePolicy,
) -> Result<Assignment, ScheduleError> {
    let deadline = calendar::add_days(earliest, policy.search_horizon_days)?;
    let mut candidate = earliest;

    while candidate <= deadline {
        match check_candidate(candidate, category, blackouts, policy)? {
            SpanCheck::Usable { span, category } => {
                if let Some(room) = grid.first_free_room(&span) {
                    return Ok(Assignment {
                        span,
                        room,
                        category,
                    });
                }
                candidate = calendar::add_days(candidate, 1)?;
            }
            SpanCheck::Blocked { run_end } => {
                // Skip the whole run; the floor never moves backwards
                // because the run end is at worst adjacent to the span.
                let after_run = calendar::add_days(run_end, 1)?;
                let step = calendar::add_days(candidate, 1)?;
                candidate = after_run.max(step);
            }
        }
    }

    Err(ScheduleError::NoSlotFound { earliest, deadline })
}

/// Validates an administrator-chosen start date and finds a room for it.
///
/// Unlike [`find_slot`] there is no forward search and no degradation: the
/// nominal span either fits at exactly `date` or the call fails.
///
/// # Errors
///
/// * `ScheduleError::SanitaryConflict` - the span (or an adjacent day, per
///   policy) touches a blackout day
/// * `ScheduleError::NoRoomAvailable` - every room is occupied for part of
///   the span
pub fn fit_at(
    date: NaiveDate,
    category: VisitCategory,
    blackouts: &BlackoutCalendar,
    grid: &OccupancyGrid,
    policy: &SchedulePolicy,
) -> Result<Assignment, ScheduleError> {
    let span = DateSpan::from_start(date, category.nominal_duration())?;
    if blackouts.blocking_day(&span, policy).is_some() {
        return Err(ScheduleError::SanitaryConflict { date });
    }
    grid.first_free_room(&span)
        .map(|room| Assignment {
            span,
            room,
            category,
        })
        .ok_or(ScheduleError::NoRoomAvailable { date })
}
