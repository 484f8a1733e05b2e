// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use tashrif::ScheduleError;
use tashrif_domain::calendar;
use tashrif_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from schedule/persistence errors and represent the
/// API contract. Notification delivery failures never appear here: booking
/// state is authoritative regardless of delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The colony has no configuration record; nothing can be scheduled.
    ColonyConfigMissing {
        /// The colony identifier.
        colony: i64,
    },
    /// The referenced booking does not exist in the colony.
    BookingNotFound {
        /// The booking identifier.
        booking_id: i64,
    },
    /// A lifecycle or scheduling rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// The search horizon was exhausted without finding a slot.
    NoSlotFound {
        /// A human-readable description of the exhausted search.
        message: String,
    },
    /// The chosen date touches a sanitary day.
    SanitaryConflict {
        /// The chosen date.
        date: String,
    },
    /// The chosen date is clear but every room is occupied.
    NoRoomAvailable {
        /// The chosen date.
        date: String,
    },
    /// A storage operation failed.
    Persistence {
        /// A human-readable description of the failure.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for '{field}': {message}")
            }
            Self::ColonyConfigMissing { colony } => {
                write!(f, "Colony {colony} has no configuration record")
            }
            Self::BookingNotFound { booking_id } => {
                write!(f, "Booking {booking_id} not found")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Rule '{rule}' violated: {message}")
            }
            Self::NoSlotFound { message } => write!(f, "No slot found: {message}"),
            Self::SanitaryConflict { date } => {
                write!(f, "Date {date} conflicts with a sanitary day")
            }
            Self::NoRoomAvailable { date } => write!(f, "No room available on {date}"),
            Self::Persistence { message } => write!(f, "Persistence error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a schedule error into the API contract.
pub(crate) fn translate_schedule_error(err: ScheduleError) -> ApiError {
    match err {
        ScheduleError::NoSlotFound { .. } => ApiError::NoSlotFound {
            message: err.to_string(),
        },
        ScheduleError::SanitaryConflict { date } => ApiError::SanitaryConflict {
            date: calendar::format_day(date),
        },
        ScheduleError::NoRoomAvailable { date } => ApiError::NoRoomAvailable {
            date: calendar::format_day(date),
        },
        ScheduleError::LeadTimeNotMet { assigned, earliest } => ApiError::InvalidInput {
            field: String::from("assigned_date"),
            message: format!(
                "date {} precedes the earliest permitted start {}",
                calendar::format_day(assigned),
                calendar::format_day(earliest)
            ),
        },
        ScheduleError::InvalidRoomCount { count } => ApiError::DomainRuleViolation {
            rule: String::from("rooms_count"),
            message: format!("configured room count {count} cannot host visits"),
        },
        ScheduleError::DomainViolation(domain_err) => ApiError::DomainRuleViolation {
            rule: String::from("domain"),
            message: domain_err.to_string(),
        },
    }
}

/// Translates a persistence error into the API contract.
pub(crate) fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::StaleStatus {
            booking_id,
            expected,
        } => ApiError::DomainRuleViolation {
            rule: String::from("booking_status"),
            message: format!("booking {booking_id} is no longer '{expected}'"),
        },
        other => ApiError::Persistence {
            message: other.to_string(),
        },
    }
}
