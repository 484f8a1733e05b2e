// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and rule validation for the Tashrif visit booking system.
//!
//! Everything here is pure data and validation: identifiers, visit
//! categories and lifecycle states, colony-zone calendar math, the visit
//! request record, and the schedule policy. No I/O, no clocks - callers
//! supply instants and days explicitly.

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

pub mod calendar;
mod error;
mod policy;
mod request;
mod types;

pub use calendar::{COLONY_TZ, DateSpan, format_day, local_date, parse_day};
pub use error::DomainError;
pub use policy::SchedulePolicy;
pub use request::VisitRequest;
pub use types::{
    BookingId, ChatChannel, ColonyId, RoomId, VisitCategory, VisitStatus, Visitor,
};
