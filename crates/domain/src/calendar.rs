// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar-day math in the colony time zone.
//!
//! Every day-boundary computation in the system (lead-time floors, blackout
//! comparison, occupancy ranges, the close sweep) goes through this module.
//! Days are `chrono::NaiveDate` values interpreted as wall-clock dates in
//! `Asia/Tashkent`; raw UTC date arithmetic is never used, since the zone
//! offset would shift day boundaries by up to five hours.

use crate::error::DomainError;
use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;

/// The fixed time zone all colonies operate in.
pub const COLONY_TZ: Tz = chrono_tz::Asia::Tashkent;

/// Wire format for calendar days.
const DAY_FORMAT: &str = "%Y-%m-%d";

/// Returns the calendar day an instant falls on in colony time.
#[must_use]
pub fn local_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&COLONY_TZ).date_naive()
}

/// Parses a `YYYY-MM-DD` day string.
///
/// # Errors
///
/// Returns an error if the string is not a valid `YYYY-MM-DD` date.
pub fn parse_day(s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s, DAY_FORMAT).map_err(|_| DomainError::DateParseError {
        date_string: s.to_string(),
    })
}

/// Formats a day in the `YYYY-MM-DD` wire format.
#[must_use]
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Adds a number of days to a date.
///
/// # Errors
///
/// Returns an error if the result falls outside the representable calendar
/// range.
pub fn add_days(day: NaiveDate, days: u32) -> Result<NaiveDate, DomainError> {
    day.checked_add_days(Days::new(u64::from(days)))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("adding {days} days to {day}"),
        })
}

/// An inclusive span of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateSpan {
    /// First day of the span.
    pub start: NaiveDate,
    /// Last day of the span (inclusive).
    pub end: NaiveDate,
}

impl DateSpan {
    /// Creates a span from a start day and a duration in days.
    ///
    /// # Errors
    ///
    /// Returns an error if `duration_days` is zero or the end date
    /// overflows the calendar range.
    pub fn from_start(start: NaiveDate, duration_days: u8) -> Result<Self, DomainError> {
        if duration_days == 0 {
            return Err(DomainError::InvalidDuration(0));
        }
        let end = add_days(start, u32::from(duration_days) - 1)?;
        Ok(Self { start, end })
    }

    /// Creates a span from explicit bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::DateArithmeticOverflow {
                operation: format!("constructing span {start}..={end}"),
            });
        }
        Ok(Self { start, end })
    }

    /// Returns the number of days in the span.
    #[must_use]
    pub const fn len_days(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_days() + 1
    }

    /// Returns whether the span covers the given day.
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Returns whether two inclusive spans intersect.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Iterates the days of the span in order.
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

impl std::fmt::Display for DateSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}
