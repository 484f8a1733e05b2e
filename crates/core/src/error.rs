// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::NaiveDate;
use tashrif_domain::DomainError;

/// Errors that can occur while searching for or validating a visit slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The search horizon was exhausted without finding a free slot.
    NoSlotFound {
        /// The earliest start date the search began from.
        earliest: NaiveDate,
        /// The last start date the horizon permitted.
        deadline: NaiveDate,
    },
    /// The requested date span touches a sanitary day.
    SanitaryConflict {
        /// The requested start date.
        date: NaiveDate,
    },
    /// The requested date is clear of sanitary days but every room is
    /// occupied for part of the span.
    NoRoomAvailable {
        /// The requested start date.
        date: NaiveDate,
    },
    /// The explicitly chosen date precedes the lead-time floor.
    LeadTimeNotMet {
        /// The chosen start date.
        assigned: NaiveDate,
        /// The earliest permitted start date.
        earliest: NaiveDate,
    },
    /// The colony's configured room count cannot host any visit.
    InvalidRoomCount {
        /// The configured count.
        count: u32,
    },
    /// A domain rule was violated.
    DomainViolation(DomainError),
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSlotFound { earliest, deadline } => {
                write!(
                    f,
                    "No free slot between {earliest} and {deadline}: search horizon exhausted"
                )
            }
            Self::SanitaryConflict { date } => {
                write!(f, "Date {date} conflicts with a sanitary day")
            }
            Self::NoRoomAvailable { date } => {
                write!(f, "No room available on {date}")
            }
            Self::LeadTimeNotMet { assigned, earliest } => {
                write!(
                    f,
                    "Assigned date {assigned} precedes the earliest permitted start {earliest}"
                )
            }
            Self::InvalidRoomCount { count } => {
                write!(f, "Invalid room count: {count}. Must be greater than 0")
            }
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
        }
    }
}

impl std::error::Error for ScheduleError {}

impl From<DomainError> for ScheduleError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
