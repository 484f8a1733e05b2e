// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation operations.
//!
//! Every status change is guarded by the status it transitions away from:
//! an update that matches no row reports `StaleStatus` instead of silently
//! writing over a concurrent change. This is what turns the classic
//! check-then-act race between two back-office calls into a skipped
//! request rather than a double booking.

use crate::backend;
use crate::data_models::{NewBooking, NewOutboxMessage, format_datetime};
use crate::diesel_schema::{bookings, colonies, notification_outbox, sanitary_days};
use crate::error::PersistenceError;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use tashrif::Assignment;
use tashrif_domain::{
    BookingId, ChatChannel, ColonyId, VisitCategory, VisitStatus, Visitor, calendar,
};
use tracing::debug;

/// Inserts a colony configuration row.
///
/// # Errors
///
/// Returns an error if the insert fails (including a duplicate colony ID).
pub fn insert_colony(
    conn: &mut SqliteConnection,
    colony: ColonyId,
    rooms_count: u32,
    admin_chat: &ChatChannel,
    lead_time_days: u32,
    search_horizon_days: u32,
) -> Result<(), PersistenceError> {
    let row = crate::data_models::ColonyRow {
        colony_id: colony.value(),
        rooms_count: i32::try_from(rooms_count)
            .map_err(|_| PersistenceError::QueryFailed(format!("rooms_count {rooms_count}")))?,
        admin_chat_id: admin_chat.value().to_string(),
        lead_time_days: i32::try_from(lead_time_days).map_err(|_| {
            PersistenceError::QueryFailed(format!("lead_time_days {lead_time_days}"))
        })?,
        search_horizon_days: i32::try_from(search_horizon_days).map_err(|_| {
            PersistenceError::QueryFailed(format!("search_horizon_days {search_horizon_days}"))
        })?,
    };
    diesel::insert_into(colonies::table)
        .values(&row)
        .execute(conn)?;
    Ok(())
}

/// Updates a colony's configured room count.
///
/// # Errors
///
/// Returns `NotFound` if the colony has no configuration row.
pub fn set_rooms_count(
    conn: &mut SqliteConnection,
    colony: ColonyId,
    rooms_count: u32,
) -> Result<(), PersistenceError> {
    let count = i32::try_from(rooms_count)
        .map_err(|_| PersistenceError::QueryFailed(format!("rooms_count {rooms_count}")))?;
    let updated = diesel::update(colonies::table.filter(colonies::colony_id.eq(colony.value())))
        .set(colonies::rooms_count.eq(count))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "colony {colony} has no configuration"
        )));
    }
    Ok(())
}

/// Inserts a new pending booking and returns its ID.
///
/// Intake itself lives outside the back office; this exists for the
/// intake-facing bot and for tests.
///
/// # Errors
///
/// Returns an error if the insert fails.
#[allow(clippy::too_many_arguments)]
pub fn insert_booking(
    conn: &mut SqliteConnection,
    colony: ColonyId,
    application_number: &str,
    prisoner_name: &str,
    category: VisitCategory,
    submitted_at: DateTime<Utc>,
    visitors: &[Visitor],
    chat: Option<&ChatChannel>,
) -> Result<BookingId, PersistenceError> {
    let visitors_json = serde_json::to_string(visitors).map_err(|e| {
        PersistenceError::QueryFailed(format!("serializing visitors for insert: {e}"))
    })?;
    let row = NewBooking {
        colony_id: colony.value(),
        application_number: application_number.to_string(),
        prisoner_name: prisoner_name.to_string(),
        visit_type: category.as_str().to_string(),
        status: VisitStatus::Pending.as_str().to_string(),
        created_at: format_datetime(submitted_at),
        visitors_json,
        telegram_chat_id: chat.map(|c| c.value().to_string()),
    };
    diesel::insert_into(bookings::table)
        .values(&row)
        .execute(conn)?;
    let id = backend::get_last_insert_rowid(conn)?;
    debug!(booking_id = id, colony = colony.value(), "Inserted booking");
    Ok(BookingId::new(id))
}

/// Folds a successful assignment into its booking row.
///
/// Sets status, dates, room, and the (possibly degraded) category in one
/// guarded update.
///
/// # Errors
///
/// Returns `StaleStatus` if the booking is no longer pending.
pub fn apply_assignment(
    conn: &mut SqliteConnection,
    booking: BookingId,
    assignment: &Assignment,
) -> Result<(), PersistenceError> {
    let room = i32::try_from(assignment.room.number())
        .map_err(|_| PersistenceError::QueryFailed(format!("room {}", assignment.room)))?;
    let updated = diesel::update(
        bookings::table
            .filter(bookings::booking_id.eq(booking.value()))
            .filter(bookings::status.eq(VisitStatus::Pending.as_str())),
    )
    .set((
        bookings::status.eq(VisitStatus::Approved.as_str()),
        bookings::start_date.eq(calendar::format_day(assignment.start())),
        bookings::end_date.eq(calendar::format_day(assignment.end())),
        bookings::room_number.eq(room),
        bookings::visit_type.eq(assignment.category.as_str()),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::StaleStatus {
            booking_id: booking.value(),
            expected: VisitStatus::Pending.as_str().to_string(),
        });
    }
    debug!(
        booking_id = booking.value(),
        start = %assignment.start(),
        room = %assignment.room,
        "Applied assignment"
    );
    Ok(())
}

/// Marks a pending booking rejected, recording the reason.
///
/// # Errors
///
/// Returns `StaleStatus` if the booking is no longer pending.
pub fn reject_booking(
    conn: &mut SqliteConnection,
    booking: BookingId,
    reason: &str,
) -> Result<(), PersistenceError> {
    let updated = diesel::update(
        bookings::table
            .filter(bookings::booking_id.eq(booking.value()))
            .filter(bookings::status.eq(VisitStatus::Pending.as_str())),
    )
    .set((
        bookings::status.eq(VisitStatus::Rejected.as_str()),
        bookings::rejection_reason.eq(reason),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::StaleStatus {
            booking_id: booking.value(),
            expected: VisitStatus::Pending.as_str().to_string(),
        });
    }
    Ok(())
}

/// Marks a pending or approved booking canceled, recording the reason.
///
/// # Errors
///
/// Returns `StaleStatus` if the booking is already terminal.
pub fn cancel_booking(
    conn: &mut SqliteConnection,
    booking: BookingId,
    reason: &str,
) -> Result<(), PersistenceError> {
    let updated = diesel::update(
        bookings::table
            .filter(bookings::booking_id.eq(booking.value()))
            .filter(bookings::status.eq_any([
                VisitStatus::Pending.as_str(),
                VisitStatus::Approved.as_str(),
            ])),
    )
    .set((
        bookings::status.eq(VisitStatus::Canceled.as_str()),
        bookings::rejection_reason.eq(reason),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::StaleStatus {
            booking_id: booking.value(),
            expected: String::from("pending or approved"),
        });
    }
    Ok(())
}

/// Re-categorizes a pending booking.
///
/// # Errors
///
/// Returns `StaleStatus` if the booking is no longer pending.
pub fn change_visit_category(
    conn: &mut SqliteConnection,
    booking: BookingId,
    category: VisitCategory,
) -> Result<(), PersistenceError> {
    let updated = diesel::update(
        bookings::table
            .filter(bookings::booking_id.eq(booking.value()))
            .filter(bookings::status.eq(VisitStatus::Pending.as_str())),
    )
    .set(bookings::visit_type.eq(category.as_str()))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::StaleStatus {
            booking_id: booking.value(),
            expected: VisitStatus::Pending.as_str().to_string(),
        });
    }
    Ok(())
}

/// Marks an approved booking closed.
///
/// # Errors
///
/// Returns `StaleStatus` if the booking is not approved.
pub fn close_booking(
    conn: &mut SqliteConnection,
    booking: BookingId,
) -> Result<(), PersistenceError> {
    let updated = diesel::update(
        bookings::table
            .filter(bookings::booking_id.eq(booking.value()))
            .filter(bookings::status.eq(VisitStatus::Approved.as_str())),
    )
    .set(bookings::status.eq(VisitStatus::Closed.as_str()))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::StaleStatus {
            booking_id: booking.value(),
            expected: VisitStatus::Approved.as_str().to_string(),
        });
    }
    Ok(())
}

/// Hard-deletes closed bookings whose visit ended before `before`.
///
/// Returns the number of rows removed.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn purge_closed(
    conn: &mut SqliteConnection,
    colony: ColonyId,
    before: NaiveDate,
) -> Result<usize, PersistenceError> {
    let deleted = diesel::delete(
        bookings::table
            .filter(bookings::colony_id.eq(colony.value()))
            .filter(bookings::status.eq(VisitStatus::Closed.as_str()))
            .filter(bookings::end_date.lt(calendar::format_day(before))),
    )
    .execute(conn)?;
    debug!(
        colony = colony.value(),
        deleted, "Purged closed bookings"
    );
    Ok(deleted)
}

/// Adds a sanitary day for a colony. Adding an existing day is a no-op.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn add_sanitary_day(
    conn: &mut SqliteConnection,
    colony: ColonyId,
    day: NaiveDate,
) -> Result<(), PersistenceError> {
    diesel::insert_or_ignore_into(sanitary_days::table)
        .values((
            sanitary_days::colony_id.eq(colony.value()),
            sanitary_days::day.eq(calendar::format_day(day)),
        ))
        .execute(conn)?;
    Ok(())
}

/// Removes a sanitary day for a colony.
///
/// Returns whether a row was actually removed.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn remove_sanitary_day(
    conn: &mut SqliteConnection,
    colony: ColonyId,
    day: NaiveDate,
) -> Result<bool, PersistenceError> {
    let deleted = diesel::delete(
        sanitary_days::table
            .filter(sanitary_days::colony_id.eq(colony.value()))
            .filter(sanitary_days::day.eq(calendar::format_day(day))),
    )
    .execute(conn)?;
    Ok(deleted > 0)
}

/// Queues a notification for delivery.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn enqueue_notification(
    conn: &mut SqliteConnection,
    colony: ColonyId,
    channel: &ChatChannel,
    body: &str,
    enqueued_at: DateTime<Utc>,
) -> Result<(), PersistenceError> {
    let row = NewOutboxMessage {
        colony_id: colony.value(),
        chat_id: channel.value().to_string(),
        body: body.to_string(),
        created_at: format_datetime(enqueued_at),
    };
    diesel::insert_into(notification_outbox::table)
        .values(&row)
        .execute(conn)?;
    Ok(())
}

/// Marks an outbox message delivered.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_notification_sent(
    conn: &mut SqliteConnection,
    message_id: i64,
    sent_at: DateTime<Utc>,
) -> Result<(), PersistenceError> {
    diesel::update(
        notification_outbox::table.filter(notification_outbox::message_id.eq(message_id)),
    )
    .set(notification_outbox::sent_at.eq(format_datetime(sent_at)))
    .execute(conn)?;
    Ok(())
}

/// Records a failed delivery attempt for an outbox message.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn record_notification_attempt(
    conn: &mut SqliteConnection,
    message_id: i64,
) -> Result<(), PersistenceError> {
    diesel::update(
        notification_outbox::table.filter(notification_outbox::message_id.eq(message_id)),
    )
    .set(notification_outbox::attempts.eq(notification_outbox::attempts + 1))
    .execute(conn)?;
    Ok(())
}
