// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for persistence tests.

use crate::Persistence;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tashrif::Assignment;
use tashrif_domain::{
    BookingId, ChatChannel, ColonyId, DateSpan, RoomId, VisitCategory, Visitor,
};

/// Colony used by every fixture.
pub fn colony() -> ColonyId {
    ColonyId::new(1).unwrap()
}

/// A fresh in-memory database with one configured colony.
pub fn persistence_with_colony() -> Persistence {
    let mut persistence = Persistence::new_in_memory().unwrap();
    persistence
        .insert_colony(colony(), 3, &ChatChannel::new("-100200300"), 10, 60)
        .unwrap();
    persistence
}

pub fn day(s: &str) -> NaiveDate {
    tashrif_domain::parse_day(s).unwrap()
}

pub fn submitted_at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, hour, 0, 0).unwrap()
}

/// Inserts a pending booking submitted at the given UTC hour on 2026-06-01.
pub fn seed_booking(persistence: &mut Persistence, number: &str, hour: u32) -> BookingId {
    persistence
        .insert_booking(
            colony(),
            number,
            "Prisoner",
            VisitCategory::Long,
            submitted_at(hour),
            &[Visitor {
                full_name: String::from("Visitor"),
                passport: String::from("AA0000001"),
            }],
            Some(&ChatChannel::new("5500123")),
        )
        .unwrap()
}

/// A two-day assignment in the given room starting at `start`.
pub fn assignment(start: &str, room: u32) -> Assignment {
    Assignment {
        span: DateSpan::from_start(day(start), 2).unwrap(),
        room: RoomId::new(room, 3).unwrap(),
        category: VisitCategory::Long,
    }
}
