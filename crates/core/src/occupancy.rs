// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory room occupancy for one colony.
//!
//! The grid is loaded once per scheduling run from the approved bookings
//! and expanded into a per-room set of occupied calendar days, so each
//! room/day probe is a set-membership test instead of a storage round trip.
//! Successful assignments are committed back into the grid before the next
//! request is evaluated; that sequential update is what keeps two requests
//! in one batch from landing on the same room and day.

use crate::error::ScheduleError;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tashrif_domain::{DateSpan, RoomId};

/// Per-room occupied-day sets for a colony.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    room_count: u32,
    occupied: BTreeMap<u32, BTreeSet<NaiveDate>>,
}

impl OccupancyGrid {
    /// Creates an empty grid for a colony with the given room count.
    ///
    /// # Errors
    ///
    /// Returns an error if `room_count` is zero.
    pub fn new(room_count: u32) -> Result<Self, ScheduleError> {
        if room_count == 0 {
            return Err(ScheduleError::InvalidRoomCount { count: room_count });
        }
        Ok(Self {
            room_count,
            occupied: BTreeMap::new(),
        })
    }

    /// Creates a grid pre-loaded from approved bookings.
    ///
    /// Rooms numbered beyond the current `room_count` (the configured count
    /// may have shrunk since those bookings were approved) are retained so
    /// their days still block nothing incorrectly; they are simply never
    /// offered to new requests.
    ///
    /// # Errors
    ///
    /// Returns an error if `room_count` is zero.
    pub fn from_bookings(
        room_count: u32,
        bookings: impl IntoIterator<Item = (RoomId, DateSpan)>,
    ) -> Result<Self, ScheduleError> {
        let mut grid = Self::new(room_count)?;
        for (room, span) in bookings {
            grid.occupy(room, &span);
        }
        Ok(grid)
    }

    /// Returns the configured room count.
    #[must_use]
    pub const fn room_count(&self) -> u32 {
        self.room_count
    }

    /// Returns whether the room is free for every day of the span.
    #[must_use]
    pub fn room_free(&self, room: RoomId, span: &DateSpan) -> bool {
        self.occupied.get(&room.number()).is_none_or(|days| {
            span.iter_days().all(|day| !days.contains(&day))
        })
    }

    /// Returns the lowest-numbered room free for the whole span.
    ///
    /// First-fit: room 1 is always preferred over higher-numbered rooms,
    /// packing assignments toward low room numbers.
    #[must_use]
    pub fn first_free_room(&self, span: &DateSpan) -> Option<RoomId> {
        (1..=self.room_count)
            .filter_map(|number| RoomId::new(number, self.room_count).ok())
            .find(|room| self.room_free(*room, span))
    }

    /// Marks every day of the span occupied in the given room.
    pub fn occupy(&mut self, room: RoomId, span: &DateSpan) {
        let days = self.occupied.entry(room.number()).or_default();
        days.extend(span.iter_days());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        tashrif_domain::parse_day(s).unwrap()
    }

    fn span(start: &str, duration: u8) -> DateSpan {
        DateSpan::from_start(day(start), duration).unwrap()
    }

    fn room(n: u32) -> RoomId {
        RoomId::new(n, 10).unwrap()
    }

    #[test]
    fn test_rejects_zero_rooms() {
        assert!(matches!(
            OccupancyGrid::new(0),
            Err(ScheduleError::InvalidRoomCount { count: 0 })
        ));
    }

    #[test]
    fn test_empty_grid_offers_room_one_first() {
        let grid = OccupancyGrid::new(3).unwrap();
        let free = grid.first_free_room(&span("2026-07-10", 2)).unwrap();
        assert_eq!(free.number(), 1);
    }

    #[test]
    fn test_occupied_days_block_overlapping_spans() {
        let mut grid = OccupancyGrid::new(1).unwrap();
        grid.occupy(room(1), &span("2026-07-10", 2));

        assert!(!grid.room_free(room(1), &span("2026-07-11", 2)));
        assert!(grid.room_free(room(1), &span("2026-07-12", 2)));
        assert_eq!(grid.first_free_room(&span("2026-07-11", 1)), None);
    }

    #[test]
    fn test_first_fit_skips_to_next_room() {
        let mut grid = OccupancyGrid::new(2).unwrap();
        grid.occupy(room(1), &span("2026-07-10", 3));

        let free = grid.first_free_room(&span("2026-07-10", 1)).unwrap();
        assert_eq!(free.number(), 2);
    }

    #[test]
    fn test_from_bookings_preloads_spans() {
        let grid = OccupancyGrid::from_bookings(
            2,
            [
                (room(1), span("2026-07-10", 2)),
                (room(2), span("2026-07-10", 1)),
            ],
        )
        .unwrap();

        assert_eq!(grid.first_free_room(&span("2026-07-10", 1)), None);
        let free = grid.first_free_room(&span("2026-07-11", 1)).unwrap();
        assert_eq!(free.number(), 2);
    }

    #[test]
    fn test_out_of_range_room_is_never_offered() {
        // Booking approved when the colony had 5 rooms; count later reduced.
        let grid =
            OccupancyGrid::from_bookings(2, [(RoomId::new(5, 5).unwrap(), span("2026-07-10", 1))])
                .unwrap();
        let free = grid.first_free_room(&span("2026-07-10", 1)).unwrap();
        assert_eq!(free.number(), 1);
    }
}
