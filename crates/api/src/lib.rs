// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Tashrif visit booking system.
//!
//! Each operation validates its input, loads state through the persistence
//! adapter, invokes the scheduling core, persists the outcome, and queues
//! notifications through the outbox. The HTTP surface in `tashrif-server`
//! is a thin wrapper over these functions.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod request_response;
mod sink;

#[cfg(test)]
mod tests;

pub use error::ApiError;
pub use handlers::{
    assign_booking, cancel_booking, change_days_batch, change_visit_days, close_expired_bookings,
    list_bookings, list_sanitary_days, purge_closed_bookings, reject_booking,
    run_batch_assignment, toggle_sanitary_day,
};
pub use request_response::{
    AssignBookingRequest, AssignBookingResponse, AssignedBooking, BatchAssignRequest,
    BatchAssignResponse, BookingSummary, CancelBookingRequest, ChangeDaysBatchRequest,
    ChangeDaysBatchResponse, ChangeDaysRequest, CloseExpiredResponse, ListBookingsResponse,
    PurgeClosedResponse, RejectBookingRequest, SanitaryDaysResponse, SanitaryToggleRequest,
    SanitaryToggleResponse, SkippedBooking, StatusChangeResponse,
};
pub use sink::{DrainReport, NotificationError, NotificationSink, TracingSink, drain_outbox};
