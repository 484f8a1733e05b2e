// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and their mappings to and from domain types.
//!
//! Dates are stored as `YYYY-MM-DD` text and datetimes as
//! `YYYY-MM-DD HH:MM:SS` UTC text; all parsing back into `chrono` types
//! happens here, so a malformed stored value surfaces as a `CorruptRow`
//! instead of leaking strings into the domain.

use crate::diesel_schema::{bookings, colonies, notification_outbox};
use crate::error::PersistenceError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use tashrif_domain::{
    BookingId, ChatChannel, ColonyId, RoomId, SchedulePolicy, VisitCategory, VisitRequest,
    VisitStatus, Visitor, calendar,
};

/// Storage format for datetimes.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a UTC instant for storage.
#[must_use]
pub fn format_datetime(instant: DateTime<Utc>) -> String {
    instant.format(DATETIME_FORMAT).to_string()
}

/// Parses a stored UTC datetime.
///
/// # Errors
///
/// Returns an error if the string does not match the storage format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, PersistenceError> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| PersistenceError::CorruptRow {
            table: String::from("bookings"),
            reason: format!("bad datetime '{s}': {e}"),
        })
}

fn corrupt(table: &str, reason: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::CorruptRow {
        table: table.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_stored_day(table: &str, s: &str) -> Result<NaiveDate, PersistenceError> {
    calendar::parse_day(s).map_err(|e| corrupt(table, e))
}

/// A booking row as stored.
#[derive(Debug, Clone, Queryable)]
pub struct BookingRow {
    /// Row ID.
    pub booking_id: i64,
    /// Owning colony.
    pub colony_id: i64,
    /// Colony-scoped application number.
    pub application_number: String,
    /// Prisoner name.
    pub prisoner_name: String,
    /// Visit category wire name.
    pub visit_type: String,
    /// Status wire name.
    pub status: String,
    /// Submission datetime (UTC text).
    pub created_at: String,
    /// First visit day, when approved.
    pub start_date: Option<String>,
    /// Last visit day, when approved.
    pub end_date: Option<String>,
    /// Assigned room, when approved.
    pub room_number: Option<i32>,
    /// Visitors as a JSON array.
    pub visitors_json: String,
    /// Applicant chat, when registered.
    pub telegram_chat_id: Option<String>,
    /// Reason recorded on rejection or cancellation.
    pub rejection_reason: Option<String>,
}

impl BookingRow {
    /// Maps the row into a domain `VisitRequest`.
    ///
    /// # Errors
    ///
    /// Returns `CorruptRow` if any stored value fails to parse.
    pub fn into_request(self) -> Result<VisitRequest, PersistenceError> {
        let table = "bookings";
        let colony = ColonyId::new(self.colony_id).map_err(|e| corrupt(table, e))?;
        let category = VisitCategory::parse(&self.visit_type).map_err(|e| corrupt(table, e))?;
        let status = VisitStatus::parse(&self.status).map_err(|e| corrupt(table, e))?;
        let submitted_at = parse_datetime(&self.created_at)?;
        let visitors: Vec<Visitor> = serde_json::from_str(&self.visitors_json)
            .map_err(|e| corrupt(table, format!("bad visitors JSON: {e}")))?;
        let start_date = self
            .start_date
            .as_deref()
            .map(|s| parse_stored_day(table, s))
            .transpose()?;
        let end_date = self
            .end_date
            .as_deref()
            .map(|s| parse_stored_day(table, s))
            .transpose()?;
        let room = self
            .room_number
            .map(|n| {
                u32::try_from(n)
                    .map_err(|_| corrupt(table, format!("negative room number {n}")))
                    .and_then(|n| RoomId::from_persisted(n).map_err(|e| corrupt(table, e)))
            })
            .transpose()?;

        Ok(VisitRequest {
            id: BookingId::new(self.booking_id),
            colony,
            application_number: self.application_number,
            prisoner_name: self.prisoner_name,
            category,
            status,
            submitted_at,
            visitors,
            chat: self.telegram_chat_id.map(ChatChannel::new),
            start_date,
            end_date,
            room,
            rejection_reason: self.rejection_reason,
        })
    }
}

/// Insertable form of a new booking.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub struct NewBooking {
    /// Owning colony.
    pub colony_id: i64,
    /// Colony-scoped application number.
    pub application_number: String,
    /// Prisoner name.
    pub prisoner_name: String,
    /// Visit category wire name.
    pub visit_type: String,
    /// Status wire name (always `pending` at intake).
    pub status: String,
    /// Submission datetime (UTC text).
    pub created_at: String,
    /// Visitors as a JSON array.
    pub visitors_json: String,
    /// Applicant chat, when registered.
    pub telegram_chat_id: Option<String>,
}

/// A colony configuration row as stored.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = colonies)]
pub struct ColonyRow {
    /// Colony identifier.
    pub colony_id: i64,
    /// Number of visiting rooms.
    pub rooms_count: i32,
    /// Admin group chat for notifications.
    pub admin_chat_id: String,
    /// Minimum lead time in days.
    pub lead_time_days: i32,
    /// Search horizon in days.
    pub search_horizon_days: i32,
}

/// Per-colony configuration, mapped into domain terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColonyConfig {
    /// The colony.
    pub colony: ColonyId,
    /// Number of visiting rooms.
    pub rooms_count: u32,
    /// Admin group chat for notifications.
    pub admin_chat: ChatChannel,
    /// Schedule policy assembled from the stored knobs.
    pub policy: SchedulePolicy,
}

impl ColonyRow {
    /// Maps the row into a `ColonyConfig`.
    ///
    /// # Errors
    ///
    /// Returns `CorruptRow` if a stored knob is out of domain range.
    pub fn into_config(self) -> Result<ColonyConfig, PersistenceError> {
        let table = "colonies";
        let colony = ColonyId::new(self.colony_id).map_err(|e| corrupt(table, e))?;
        let rooms_count = u32::try_from(self.rooms_count)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| corrupt(table, format!("bad rooms_count {}", self.rooms_count)))?;
        let lead_time_days = u32::try_from(self.lead_time_days)
            .map_err(|_| corrupt(table, format!("bad lead_time_days {}", self.lead_time_days)))?;
        let search_horizon_days = u32::try_from(self.search_horizon_days).map_err(|_| {
            corrupt(
                table,
                format!("bad search_horizon_days {}", self.search_horizon_days),
            )
        })?;
        let policy = SchedulePolicy::new(lead_time_days, search_horizon_days)
            .map_err(|e| corrupt(table, e))?;

        Ok(ColonyConfig {
            colony,
            rooms_count,
            admin_chat: ChatChannel::new(self.admin_chat_id),
            policy,
        })
    }
}

/// A queued notification row.
#[derive(Debug, Clone, Queryable)]
pub struct OutboxRow {
    /// Row ID.
    pub message_id: i64,
    /// Owning colony.
    pub colony_id: i64,
    /// Destination chat.
    pub chat_id: String,
    /// Message body.
    pub body: String,
    /// Enqueue datetime (UTC text).
    pub created_at: String,
    /// Delivery datetime, once sent.
    pub sent_at: Option<String>,
    /// Number of delivery attempts so far.
    pub attempts: i32,
}

/// Insertable form of a queued notification.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notification_outbox)]
pub struct NewOutboxMessage {
    /// Owning colony.
    pub colony_id: i64,
    /// Destination chat.
    pub chat_id: String,
    /// Message body.
    pub body: String,
    /// Enqueue datetime (UTC text).
    pub created_at: String,
}
