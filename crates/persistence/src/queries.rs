// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only query operations.
//!
//! Everything the scheduling core needs is loaded up front through these
//! functions: the colony configuration, the pending backlog, the approved
//! room spans, and the blackout dates. Each batch run pays a fixed number
//! of queries instead of one per candidate day.

use crate::data_models::{BookingRow, ColonyConfig, OutboxRow};
use crate::diesel_schema::{bookings, colonies, notification_outbox, sanitary_days};
use crate::error::PersistenceError;
use chrono::NaiveDate;
use diesel::prelude::*;
use tashrif_domain::{
    BookingId, ColonyId, DateSpan, RoomId, VisitRequest, VisitStatus, calendar,
};

/// Loads the configuration record for a colony.
///
/// # Errors
///
/// Returns `NotFound` if no configuration row exists for the colony.
pub fn get_colony_config(
    conn: &mut SqliteConnection,
    colony: ColonyId,
) -> Result<ColonyConfig, PersistenceError> {
    colonies::table
        .filter(colonies::colony_id.eq(colony.value()))
        .first::<crate::data_models::ColonyRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_colony_config: {e}")))?
        .ok_or_else(|| PersistenceError::NotFound(format!("colony {colony} has no configuration")))?
        .into_config()
}

/// Loads up to `limit` oldest-by-submission pending requests for a colony.
pub fn pending_requests(
    conn: &mut SqliteConnection,
    colony: ColonyId,
    limit: i64,
) -> Result<Vec<VisitRequest>, PersistenceError> {
    let rows = bookings::table
        .filter(bookings::colony_id.eq(colony.value()))
        .filter(bookings::status.eq(VisitStatus::Pending.as_str()))
        .order(bookings::created_at.asc())
        .then_order_by(bookings::booking_id.asc())
        .limit(limit)
        .load::<BookingRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("pending_requests: {e}")))?;

    rows.into_iter().map(BookingRow::into_request).collect()
}

/// Loads the (room, span) pairs of every approved booking for a colony.
///
/// Feeds the occupancy grid; an approved row with missing assignment
/// fields is reported as corrupt rather than silently freeing its room.
pub fn approved_room_spans(
    conn: &mut SqliteConnection,
    colony: ColonyId,
) -> Result<Vec<(RoomId, DateSpan)>, PersistenceError> {
    let rows = bookings::table
        .filter(bookings::colony_id.eq(colony.value()))
        .filter(bookings::status.eq(VisitStatus::Approved.as_str()))
        .load::<BookingRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("approved_room_spans: {e}")))?;

    rows.into_iter()
        .map(|row| {
            let booking_id = row.booking_id;
            let request = row.into_request()?;
            let span = request
                .assigned_span()
                .ok_or_else(|| PersistenceError::CorruptRow {
                    table: String::from("bookings"),
                    reason: format!("approved booking {booking_id} has no date span"),
                })?;
            let room = request.room.ok_or_else(|| PersistenceError::CorruptRow {
                table: String::from("bookings"),
                reason: format!("approved booking {booking_id} has no room"),
            })?;
            Ok((room, span))
        })
        .collect()
}

/// Loads the blackout dates of a colony.
pub fn sanitary_dates(
    conn: &mut SqliteConnection,
    colony: ColonyId,
) -> Result<Vec<NaiveDate>, PersistenceError> {
    let days: Vec<String> = sanitary_days::table
        .filter(sanitary_days::colony_id.eq(colony.value()))
        .select(sanitary_days::day)
        .order(sanitary_days::day.asc())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("sanitary_dates: {e}")))?;

    days.iter()
        .map(|s| {
            calendar::parse_day(s).map_err(|e| PersistenceError::CorruptRow {
                table: String::from("sanitary_days"),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Loads one booking by ID.
///
/// # Errors
///
/// Returns `NotFound` if the booking does not exist in the colony.
pub fn get_booking(
    conn: &mut SqliteConnection,
    colony: ColonyId,
    booking: BookingId,
) -> Result<VisitRequest, PersistenceError> {
    bookings::table
        .filter(bookings::booking_id.eq(booking.value()))
        .filter(bookings::colony_id.eq(colony.value()))
        .first::<BookingRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_booking: {e}")))?
        .ok_or_else(|| PersistenceError::NotFound(format!("booking {booking}")))?
        .into_request()
}

/// Loads every booking of a colony, newest submissions first.
pub fn list_bookings(
    conn: &mut SqliteConnection,
    colony: ColonyId,
) -> Result<Vec<VisitRequest>, PersistenceError> {
    let rows = bookings::table
        .filter(bookings::colony_id.eq(colony.value()))
        .order(bookings::created_at.desc())
        .then_order_by(bookings::booking_id.desc())
        .load::<BookingRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_bookings: {e}")))?;

    rows.into_iter().map(BookingRow::into_request).collect()
}

/// Loads approved bookings whose visit ended before `day`.
///
/// Feeds the close sweep. String comparison is safe here because days are
/// stored in the lexicographically ordered `YYYY-MM-DD` format.
pub fn approved_ending_before(
    conn: &mut SqliteConnection,
    colony: ColonyId,
    day: NaiveDate,
) -> Result<Vec<VisitRequest>, PersistenceError> {
    let rows = bookings::table
        .filter(bookings::colony_id.eq(colony.value()))
        .filter(bookings::status.eq(VisitStatus::Approved.as_str()))
        .filter(bookings::end_date.lt(calendar::format_day(day)))
        .order(bookings::end_date.asc())
        .load::<BookingRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("approved_ending_before: {e}")))?;

    rows.into_iter().map(BookingRow::into_request).collect()
}

/// Loads up to `limit` undelivered outbox messages, oldest first.
pub fn unsent_notifications(
    conn: &mut SqliteConnection,
    limit: i64,
) -> Result<Vec<OutboxRow>, PersistenceError> {
    notification_outbox::table
        .filter(notification_outbox::sent_at.is_null())
        .order(notification_outbox::message_id.asc())
        .limit(limit)
        .load::<OutboxRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("unsent_notifications: {e}")))
}
