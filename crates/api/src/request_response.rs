// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API boundary.
//!
//! Dates cross the boundary as `YYYY-MM-DD` strings and are parsed inside
//! the handlers, mirroring the admin panel's JSON contract.

use serde::{Deserialize, Serialize};
use tashrif::Assignment;
use tashrif_domain::{BookingId, VisitRequest, calendar};

/// Request to batch-assign the oldest pending requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchAssignRequest {
    /// How many pending requests to process (1..=50).
    pub count: u32,
}

/// One persisted assignment, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedBooking {
    /// The booking identifier.
    pub booking_id: i64,
    /// Colony-scoped application number.
    pub application_number: String,
    /// First visit day (`YYYY-MM-DD`).
    pub start_date: String,
    /// Last visit day (`YYYY-MM-DD`).
    pub end_date: String,
    /// Assigned room number.
    pub room: u32,
    /// Effective visit category wire name.
    pub visit_type: String,
}

impl AssignedBooking {
    /// Builds the report entry for one persisted assignment.
    #[must_use]
    pub fn from_assignment(request: &VisitRequest, assignment: &Assignment) -> Self {
        Self {
            booking_id: request.id.value(),
            application_number: request.application_number.clone(),
            start_date: calendar::format_day(assignment.start()),
            end_date: calendar::format_day(assignment.end()),
            room: assignment.room.number(),
            visit_type: assignment.category.as_str().to_string(),
        }
    }
}

/// One request a batch run left pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedBooking {
    /// The booking identifier.
    pub booking_id: i64,
    /// Why it was skipped.
    pub reason: String,
}

impl SkippedBooking {
    pub(crate) fn new(booking: BookingId, reason: impl std::fmt::Display) -> Self {
        Self {
            booking_id: booking.value(),
            reason: reason.to_string(),
        }
    }
}

/// Response of a batch assignment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchAssignResponse {
    /// How many requests received an assignment.
    pub assigned_count: usize,
    /// How many requests the run considered.
    pub total_considered: usize,
    /// Persisted assignments in processing order.
    pub assignments: Vec<AssignedBooking>,
    /// Requests left pending, with reasons.
    pub skipped: Vec<SkippedBooking>,
}

/// Request to assign one booking at an explicit date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignBookingRequest {
    /// The booking to assign.
    pub booking_id: i64,
    /// The administrator-chosen start date (`YYYY-MM-DD`).
    pub assigned_date: String,
}

/// Response of a single-booking assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignBookingResponse {
    /// The persisted assignment.
    pub assignment: AssignedBooking,
}

/// Request to reject a pending booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectBookingRequest {
    /// The booking to reject.
    pub booking_id: i64,
    /// The reason communicated to the applicant.
    pub reason: String,
}

/// Request to cancel a pending or approved booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelBookingRequest {
    /// The booking to cancel.
    pub booking_id: i64,
    /// The reason communicated to the applicant.
    pub reason: String,
}

/// Response of a reject or cancel operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeResponse {
    /// The booking identifier.
    pub booking_id: i64,
    /// The new status wire name.
    pub status: String,
}

/// Request to re-categorize one pending booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDaysRequest {
    /// The booking to change.
    pub booking_id: i64,
    /// The new visit duration in days (1..=3).
    pub days: u8,
}

/// Request to re-categorize a batch of pending bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDaysBatchRequest {
    /// How many pending requests to process (1..=50).
    pub count: u32,
    /// The new visit duration in days (1..=3).
    pub days: u8,
}

/// Response of a batch re-categorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDaysBatchResponse {
    /// How many bookings were actually changed.
    pub changed_count: usize,
    /// How many bookings the run considered.
    pub total_considered: usize,
}

/// Request to toggle a sanitary day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitaryToggleRequest {
    /// The day to toggle (`YYYY-MM-DD`).
    pub date: String,
    /// `add` or `remove`.
    pub action: String,
}

/// Response of a sanitary day toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitaryToggleResponse {
    /// The toggled day (`YYYY-MM-DD`).
    pub date: String,
    /// The applied action.
    pub action: String,
}

/// Response listing a colony's sanitary days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitaryDaysResponse {
    /// Blackout days (`YYYY-MM-DD`), ascending.
    pub dates: Vec<String>,
}

/// Response of the close sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseExpiredResponse {
    /// How many bookings were closed.
    pub closed_count: usize,
    /// The closed booking identifiers.
    pub booking_ids: Vec<i64>,
}

/// Response of the purge sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeClosedResponse {
    /// How many rows were deleted.
    pub purged_count: usize,
}

/// One booking row for the admin table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSummary {
    /// The booking identifier.
    pub booking_id: i64,
    /// Colony-scoped application number.
    pub application_number: String,
    /// Prisoner name.
    pub prisoner_name: String,
    /// Name of the first listed visitor.
    pub applicant: String,
    /// Visit category wire name.
    pub visit_type: String,
    /// Status wire name.
    pub status: String,
    /// Submission day (`YYYY-MM-DD`, colony time).
    pub submitted_on: String,
    /// First visit day, when assigned.
    pub start_date: Option<String>,
    /// Last visit day, when assigned.
    pub end_date: Option<String>,
    /// Assigned room, when assigned.
    pub room: Option<u32>,
}

impl BookingSummary {
    /// Builds the table row for one booking.
    #[must_use]
    pub fn from_request(request: &VisitRequest) -> Self {
        Self {
            booking_id: request.id.value(),
            application_number: request.application_number.clone(),
            prisoner_name: request.prisoner_name.clone(),
            applicant: request.applicant_name().to_string(),
            visit_type: request.category.as_str().to_string(),
            status: request.status.as_str().to_string(),
            submitted_on: calendar::format_day(request.submission_day()),
            start_date: request.start_date.map(calendar::format_day),
            end_date: request.end_date.map(calendar::format_day),
            room: request.room.map(|r| r.number()),
        }
    }
}

/// Response listing a colony's bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBookingsResponse {
    /// Bookings, newest submissions first.
    pub bookings: Vec<BookingSummary>,
}
