// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scheduling core for the Tashrif visit booking system.
//!
//! Given the current colony state (blackout calendar, approved-booking
//! occupancy, schedule policy), this crate assigns pending visit requests a
//! contiguous block of calendar days and a room. The crate is pure: callers
//! load state, hand it over, and persist whatever comes back.

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

mod blackout;
mod error;
pub mod notify;
mod occupancy;
mod scheduler;
mod slot_search;

#[cfg(test)]
mod tests;

pub use blackout::BlackoutCalendar;
pub use error::ScheduleError;
pub use notify::NotificationMessage;
pub use occupancy::OccupancyGrid;
pub use scheduler::{BatchPlan, PlannedAssignment, Scheduler, SkippedRequest};
pub use slot_search::{Assignment, find_slot, fit_at};
