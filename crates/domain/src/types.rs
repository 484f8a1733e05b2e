// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifies a colony.
///
/// Colonies are created by operations staff out of band; the back office
/// only ever references them by this numeric identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColonyId(i64);

impl ColonyId {
    /// Creates a new `ColonyId`.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is not positive.
    pub const fn new(value: i64) -> Result<Self, DomainError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidColony(value))
        }
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ColonyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a booking (visit request) row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(i64);

impl BookingId {
    /// Creates a new `BookingId`.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a visiting room within a colony.
///
/// Rooms are pure capacity slots numbered 1 through the colony's configured
/// room count; they have no other attributes and no backing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(u32);

impl RoomId {
    /// Creates a new `RoomId`, validating it against the colony's room count.
    ///
    /// # Arguments
    ///
    /// * `number` - The 1-based room number
    /// * `room_count` - The colony's configured number of rooms
    ///
    /// # Errors
    ///
    /// Returns an error if the number is not in the range `1..=room_count`.
    pub const fn new(number: u32, room_count: u32) -> Result<Self, DomainError> {
        if number >= 1 && number <= room_count {
            Ok(Self(number))
        } else {
            Err(DomainError::InvalidRoom { number, room_count })
        }
    }

    /// Creates a `RoomId` without a room-count bound.
    ///
    /// Used when rehydrating persisted assignments, where the number was
    /// validated at assignment time and the configured count may since have
    /// shrunk.
    ///
    /// # Errors
    ///
    /// Returns an error if the number is zero.
    pub const fn from_persisted(number: u32) -> Result<Self, DomainError> {
        if number >= 1 {
            Ok(Self(number))
        } else {
            Err(DomainError::InvalidRoom {
                number,
                room_count: u32::MAX,
            })
        }
    }

    /// Returns the 1-based room number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The requested visit length category.
///
/// Categories map to fixed durations in days. When a blackout day blocks a
/// nominal span, the category degrades directly to `Short` - there is no
/// partial 3-to-2-day step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisitCategory {
    /// One-day visit.
    #[serde(rename = "short")]
    Short,
    /// Two-day visit.
    #[serde(rename = "long")]
    Long,
    /// Three-day visit.
    #[serde(rename = "extra")]
    Extra,
}

impl VisitCategory {
    /// Returns the nominal visit duration in days.
    #[must_use]
    pub const fn nominal_duration(&self) -> u8 {
        match self {
            Self::Short => 1,
            Self::Long => 2,
            Self::Extra => 3,
        }
    }

    /// Returns the category a blocked visit degrades to.
    ///
    /// Degradation always lands on the minimum one-day category.
    #[must_use]
    pub const fn degraded(&self) -> Self {
        Self::Short
    }

    /// Maps a day count to a category.
    ///
    /// # Errors
    ///
    /// Returns an error if `days` is not 1, 2, or 3.
    pub const fn from_days(days: u8) -> Result<Self, DomainError> {
        match days {
            1 => Ok(Self::Short),
            2 => Ok(Self::Long),
            3 => Ok(Self::Extra),
            _ => Err(DomainError::InvalidDuration(days)),
        }
    }

    /// Parses a category from its wire name.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not `short`, `long`, or `extra`.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "short" => Ok(Self::Short),
            "long" => Ok(Self::Long),
            "extra" => Ok(Self::Extra),
            _ => Err(DomainError::InvalidCategory(s.to_string())),
        }
    }

    /// Returns the wire name of this category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Long => "long",
            Self::Extra => "extra",
        }
    }
}

impl FromStr for VisitCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for VisitCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a visit request.
///
/// `Rejected`, `Canceled`, and `Closed` are terminal; nothing transitions
/// out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VisitStatus {
    /// Submitted, awaiting assignment.
    #[default]
    #[serde(rename = "pending")]
    Pending,
    /// Assigned a room and date span.
    #[serde(rename = "approved")]
    Approved,
    /// Declined by an administrator.
    #[serde(rename = "rejected")]
    Rejected,
    /// Withdrawn by an administrator after submission or approval.
    #[serde(rename = "canceled")]
    Canceled,
    /// Visit completed; the row awaits the purge sweep.
    #[serde(rename = "closed")]
    Closed,
}

impl VisitStatus {
    /// Checks if a transition from this state to another is valid.
    ///
    /// Valid transitions are:
    /// - `Pending` → `Approved`, `Rejected`, or `Canceled`
    /// - `Approved` → `Closed` or `Canceled`
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Approved)
                | (Self::Pending, Self::Rejected)
                | (Self::Pending, Self::Canceled)
                | (Self::Approved, Self::Closed)
                | (Self::Approved, Self::Canceled)
        )
    }

    /// Returns whether this state admits no further transitions.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Canceled | Self::Closed)
    }

    /// Parses a status from its wire name.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a known status.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "canceled" => Ok(Self::Canceled),
            "closed" => Ok(Self::Closed),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }

    /// Returns the wire name of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Canceled => "canceled",
            Self::Closed => "closed",
        }
    }
}

impl FromStr for VisitStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A visitor named on a request.
///
/// Used only for notification text; never for scheduling decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visitor {
    /// Full name as written on the application.
    pub full_name: String,
    /// Passport number.
    pub passport: String,
}

/// An opaque chat identifier for the notification sink.
///
/// Covers both applicant chats and colony admin group chats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatChannel(String);

impl ChatChannel {
    /// Creates a new `ChatChannel`.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw channel identifier.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChatChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
