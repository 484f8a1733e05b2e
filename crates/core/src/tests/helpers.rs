// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for scheduler and slot-search tests.
//!
//! Tests speak in day offsets from a fixed base date; `day(0)` is the
//! submission day of every fixture request unless stated otherwise.

use crate::{BlackoutCalendar, OccupancyGrid, Scheduler};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tashrif_domain::{
    BookingId, COLONY_TZ, ColonyId, SchedulePolicy, VisitCategory, VisitRequest, VisitStatus,
    Visitor, calendar,
};

/// Base date all offset math is relative to.
pub fn base_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

/// Returns `base_day + offset` days.
pub fn day(offset: u32) -> NaiveDate {
    calendar::add_days(base_day(), offset).unwrap()
}

/// Returns a UTC instant that falls at 10:00 colony time on `day(offset)`.
pub fn submitted_on(offset: u32) -> DateTime<Utc> {
    let local = day(offset).and_hms_opt(10, 0, 0).unwrap();
    COLONY_TZ
        .from_local_datetime(&local)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

/// Builds a pending request submitted at 10:00 colony time on `day(offset)`.
pub fn pending_request(id: i64, category: VisitCategory, offset: u32) -> VisitRequest {
    VisitRequest {
        id: BookingId::new(id),
        colony: ColonyId::new(1).unwrap(),
        application_number: format!("1-{id:04}"),
        prisoner_name: format!("Prisoner {id}"),
        category,
        status: VisitStatus::Pending,
        submitted_at: submitted_on(offset),
        visitors: vec![Visitor {
            full_name: format!("Visitor {id}"),
            passport: format!("AA{id:07}"),
        }],
        chat: None,
        start_date: None,
        end_date: None,
        room: None,
        rejection_reason: None,
    }
}

/// Builds a scheduler over `rooms` rooms with blackout days at the given
/// offsets.
pub fn scheduler(rooms: u32, blackout_offsets: &[u32], policy: SchedulePolicy) -> Scheduler {
    let blackouts = BlackoutCalendar::from_dates(blackout_offsets.iter().map(|&o| day(o)));
    let grid = OccupancyGrid::new(rooms).unwrap();
    Scheduler::new(blackouts, grid, policy).unwrap()
}
