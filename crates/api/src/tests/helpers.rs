// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for API operation tests.
//!
//! The fixed clock is 04:00 UTC on 2026-06-01, which is 09:00 on June 1 in
//! colony time; with the default 10-day lead time, fixture requests become
//! eligible on 2026-06-11.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tashrif_domain::{
    BookingId, ChatChannel, ColonyId, VisitCategory, Visitor,
};
use tashrif_persistence::Persistence;

pub fn colony() -> ColonyId {
    ColonyId::new(1).unwrap()
}

pub fn admin_chat() -> ChatChannel {
    ChatChannel::new("-100200300")
}

/// The fixed "now" every test operation runs at.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 4, 0, 0).unwrap()
}

pub fn day(s: &str) -> NaiveDate {
    tashrif_domain::parse_day(s).unwrap()
}

/// A fresh database with one colony configured with `rooms` rooms.
pub fn setup(rooms: u32) -> Persistence {
    let mut persistence = Persistence::new_in_memory().unwrap();
    persistence
        .insert_colony(colony(), rooms, &admin_chat(), 10, 60)
        .unwrap();
    persistence
}

/// Inserts a pending booking submitted at the given UTC hour on 2026-06-01.
///
/// Later hours submit later, preserving FIFO order between fixtures.
pub fn seed_pending(
    persistence: &mut Persistence,
    hour: u32,
    category: VisitCategory,
    with_chat: bool,
) -> BookingId {
    let chat = with_chat.then(|| ChatChannel::new("5500123"));
    persistence
        .insert_booking(
            colony(),
            &format!("1-{hour:04}"),
            "Prisoner",
            category,
            Utc.with_ymd_and_hms(2026, 6, 1, hour, 0, 0).unwrap(),
            &[Visitor {
                full_name: String::from("Visitor"),
                passport: String::from("AA0000001"),
            }],
            chat.as_ref(),
        )
        .unwrap()
}

/// Number of undelivered outbox messages.
pub fn outbox_len(persistence: &mut Persistence) -> usize {
    persistence.unsent_notifications(100).unwrap().len()
}
