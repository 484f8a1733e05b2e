// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Tashrif visit booking system.
//!
//! This crate provides `SQLite` persistence for bookings, sanitary days,
//! colony configuration, and the notification outbox. It is built on
//! Diesel with embedded migrations.
//!
//! ## Testing
//!
//! `Persistence::new_in_memory` hands out an isolated shared-cache
//! in-memory database per call, so unit tests are fast, deterministic,
//! and need no external infrastructure.

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

use chrono::{DateTime, NaiveDate, Utc};
use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tashrif::Assignment;
use tashrif_domain::{
    BookingId, ChatChannel, ColonyId, DateSpan, RoomId, VisitCategory, VisitRequest, Visitor,
};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{ColonyConfig, OutboxRow};
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID, which
/// gives deterministic test isolation without time-based collisions.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for the visit booking tables.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a persistence adapter over an isolated in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn = backend::initialize_database(&shared_memory_url)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a persistence adapter over a file-based database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError(String::from("Invalid database path"))
        })?;

        let mut conn = backend::initialize_database(path_str)?;
        backend::enable_wal_mode(&mut conn)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Colony configuration
    // ========================================================================

    /// Loads the configuration record for a colony.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the colony has no configuration row.
    pub fn get_colony_config(&mut self, colony: ColonyId) -> Result<ColonyConfig, PersistenceError> {
        queries::get_colony_config(&mut self.conn, colony)
    }

    /// Inserts a colony configuration row.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_colony(
        &mut self,
        colony: ColonyId,
        rooms_count: u32,
        admin_chat: &ChatChannel,
        lead_time_days: u32,
        search_horizon_days: u32,
    ) -> Result<(), PersistenceError> {
        mutations::insert_colony(
            &mut self.conn,
            colony,
            rooms_count,
            admin_chat,
            lead_time_days,
            search_horizon_days,
        )
    }

    /// Updates a colony's configured room count.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the colony has no configuration row.
    pub fn set_rooms_count(
        &mut self,
        colony: ColonyId,
        rooms_count: u32,
    ) -> Result<(), PersistenceError> {
        mutations::set_rooms_count(&mut self.conn, colony, rooms_count)
    }

    // ========================================================================
    // Bookings
    // ========================================================================

    /// Inserts a new pending booking and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_booking(
        &mut self,
        colony: ColonyId,
        application_number: &str,
        prisoner_name: &str,
        category: VisitCategory,
        submitted_at: DateTime<Utc>,
        visitors: &[Visitor],
        chat: Option<&ChatChannel>,
    ) -> Result<BookingId, PersistenceError> {
        mutations::insert_booking(
            &mut self.conn,
            colony,
            application_number,
            prisoner_name,
            category,
            submitted_at,
            visitors,
            chat,
        )
    }

    /// Loads up to `limit` oldest-by-submission pending requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt.
    pub fn pending_requests(
        &mut self,
        colony: ColonyId,
        limit: i64,
    ) -> Result<Vec<VisitRequest>, PersistenceError> {
        queries::pending_requests(&mut self.conn, colony, limit)
    }

    /// Loads the (room, span) pairs of every approved booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt.
    pub fn approved_room_spans(
        &mut self,
        colony: ColonyId,
    ) -> Result<Vec<(RoomId, DateSpan)>, PersistenceError> {
        queries::approved_room_spans(&mut self.conn, colony)
    }

    /// Loads one booking by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the booking does not exist in the colony.
    pub fn get_booking(
        &mut self,
        colony: ColonyId,
        booking: BookingId,
    ) -> Result<VisitRequest, PersistenceError> {
        queries::get_booking(&mut self.conn, colony, booking)
    }

    /// Loads every booking of a colony, newest submissions first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt.
    pub fn list_bookings(
        &mut self,
        colony: ColonyId,
    ) -> Result<Vec<VisitRequest>, PersistenceError> {
        queries::list_bookings(&mut self.conn, colony)
    }

    /// Loads approved bookings whose visit ended before `day`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt.
    pub fn approved_ending_before(
        &mut self,
        colony: ColonyId,
        day: NaiveDate,
    ) -> Result<Vec<VisitRequest>, PersistenceError> {
        queries::approved_ending_before(&mut self.conn, colony, day)
    }

    /// Folds a successful assignment into its booking row.
    ///
    /// # Errors
    ///
    /// Returns `StaleStatus` if the booking is no longer pending.
    pub fn apply_assignment(
        &mut self,
        booking: BookingId,
        assignment: &Assignment,
    ) -> Result<(), PersistenceError> {
        mutations::apply_assignment(&mut self.conn, booking, assignment)
    }

    /// Marks a pending booking rejected.
    ///
    /// # Errors
    ///
    /// Returns `StaleStatus` if the booking is no longer pending.
    pub fn reject_booking(
        &mut self,
        booking: BookingId,
        reason: &str,
    ) -> Result<(), PersistenceError> {
        mutations::reject_booking(&mut self.conn, booking, reason)
    }

    /// Marks a pending or approved booking canceled.
    ///
    /// # Errors
    ///
    /// Returns `StaleStatus` if the booking is already terminal.
    pub fn cancel_booking(
        &mut self,
        booking: BookingId,
        reason: &str,
    ) -> Result<(), PersistenceError> {
        mutations::cancel_booking(&mut self.conn, booking, reason)
    }

    /// Re-categorizes a pending booking.
    ///
    /// # Errors
    ///
    /// Returns `StaleStatus` if the booking is no longer pending.
    pub fn change_visit_category(
        &mut self,
        booking: BookingId,
        category: VisitCategory,
    ) -> Result<(), PersistenceError> {
        mutations::change_visit_category(&mut self.conn, booking, category)
    }

    /// Marks an approved booking closed.
    ///
    /// # Errors
    ///
    /// Returns `StaleStatus` if the booking is not approved.
    pub fn close_booking(&mut self, booking: BookingId) -> Result<(), PersistenceError> {
        mutations::close_booking(&mut self.conn, booking)
    }

    /// Hard-deletes closed bookings whose visit ended before `before`.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn purge_closed(
        &mut self,
        colony: ColonyId,
        before: NaiveDate,
    ) -> Result<usize, PersistenceError> {
        mutations::purge_closed(&mut self.conn, colony, before)
    }

    // ========================================================================
    // Sanitary days
    // ========================================================================

    /// Loads the blackout dates of a colony.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt.
    pub fn sanitary_dates(&mut self, colony: ColonyId) -> Result<Vec<NaiveDate>, PersistenceError> {
        queries::sanitary_dates(&mut self.conn, colony)
    }

    /// Adds a sanitary day. Adding an existing day is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_sanitary_day(
        &mut self,
        colony: ColonyId,
        day: NaiveDate,
    ) -> Result<(), PersistenceError> {
        mutations::add_sanitary_day(&mut self.conn, colony, day)
    }

    /// Removes a sanitary day; returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn remove_sanitary_day(
        &mut self,
        colony: ColonyId,
        day: NaiveDate,
    ) -> Result<bool, PersistenceError> {
        mutations::remove_sanitary_day(&mut self.conn, colony, day)
    }

    // ========================================================================
    // Notification outbox
    // ========================================================================

    /// Queues a notification for delivery.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn enqueue_notification(
        &mut self,
        colony: ColonyId,
        channel: &ChatChannel,
        body: &str,
        enqueued_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        mutations::enqueue_notification(&mut self.conn, colony, channel, body, enqueued_at)
    }

    /// Loads up to `limit` undelivered outbox messages, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn unsent_notifications(
        &mut self,
        limit: i64,
    ) -> Result<Vec<OutboxRow>, PersistenceError> {
        queries::unsent_notifications(&mut self.conn, limit)
    }

    /// Marks an outbox message delivered.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_notification_sent(
        &mut self,
        message_id: i64,
        sent_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        mutations::mark_notification_sent(&mut self.conn, message_id, sent_at)
    }

    /// Records a failed delivery attempt for an outbox message.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn record_notification_attempt(
        &mut self,
        message_id: i64,
    ) -> Result<(), PersistenceError> {
        mutations::record_notification_attempt(&mut self.conn, message_id)
    }
}
