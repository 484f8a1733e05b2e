// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::calendar::{self, DateSpan};
use crate::error::DomainError;
use crate::types::{BookingId, ChatChannel, ColonyId, RoomId, VisitCategory, VisitStatus, Visitor};
use chrono::{DateTime, NaiveDate, Utc};

/// A visit request as stored in the booking table.
///
/// Created by the applicant-facing intake (out of scope here); mutated by
/// the assignment algorithm and the reject/cancel/close operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRequest {
    /// Canonical booking identifier.
    pub id: BookingId,
    /// The colony the visit is requested at.
    pub colony: ColonyId,
    /// Colony-scoped application number, used in notification text.
    pub application_number: String,
    /// Name of the prisoner being visited.
    pub prisoner_name: String,
    /// Requested visit length category.
    pub category: VisitCategory,
    /// Lifecycle status.
    pub status: VisitStatus,
    /// Submission instant (UTC).
    pub submitted_at: DateTime<Utc>,
    /// Visitors named on the application, in application order.
    pub visitors: Vec<Visitor>,
    /// Applicant chat for notifications, when the applicant registered one.
    pub chat: Option<ChatChannel>,
    /// First visit day, set on approval.
    pub start_date: Option<NaiveDate>,
    /// Last visit day (inclusive), set on approval.
    pub end_date: Option<NaiveDate>,
    /// Assigned room, set on approval.
    pub room: Option<RoomId>,
    /// Reason recorded on rejection or cancellation.
    pub rejection_reason: Option<String>,
}

impl VisitRequest {
    /// Returns the colony-time calendar day the request was submitted on.
    #[must_use]
    pub fn submission_day(&self) -> NaiveDate {
        calendar::local_date(self.submitted_at)
    }

    /// Returns the name of the first listed visitor, for notification text.
    #[must_use]
    pub fn applicant_name(&self) -> &str {
        self.visitors
            .first()
            .map_or("N/A", |v| v.full_name.as_str())
    }

    /// Returns the assigned date span, if the request carries one.
    #[must_use]
    pub fn assigned_span(&self) -> Option<DateSpan> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start <= end => Some(DateSpan { start, end }),
            _ => None,
        }
    }

    /// Validates the approved-assignment invariant.
    ///
    /// # Invariant
    ///
    /// An `Approved` request has `start_date`, `end_date`, and `room` set,
    /// with `end_date = start_date + duration - 1` for its category.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ApprovedInvariantViolation` if the request is
    /// `Approved` and any assignment field is missing or inconsistent.
    pub fn validate_approved(&self) -> Result<(), DomainError> {
        if self.status != VisitStatus::Approved {
            return Ok(());
        }
        let violation = |reason: &str| DomainError::ApprovedInvariantViolation {
            booking_id: self.id.value(),
            reason: reason.to_string(),
        };
        let span = self
            .assigned_span()
            .ok_or_else(|| violation("missing or inverted start/end dates"))?;
        if self.room.is_none() {
            return Err(violation("missing room assignment"));
        }
        let expected = i64::from(self.category.nominal_duration());
        if span.len_days() != expected {
            return Err(violation(&format!(
                "span covers {} days but category '{}' implies {expected}",
                span.len_days(),
                self.category
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request() -> VisitRequest {
        VisitRequest {
            id: BookingId::new(7),
            colony: ColonyId::new(1).unwrap(),
            application_number: String::from("1-0007"),
            prisoner_name: String::from("Karimov A."),
            category: VisitCategory::Long,
            status: VisitStatus::Pending,
            submitted_at: Utc.with_ymd_and_hms(2026, 6, 1, 9, 30, 0).unwrap(),
            visitors: vec![Visitor {
                full_name: String::from("Karimova M."),
                passport: String::from("AB1234567"),
            }],
            chat: Some(ChatChannel::new("552000111")),
            start_date: None,
            end_date: None,
            room: None,
            rejection_reason: None,
        }
    }

    #[test]
    fn test_submission_day_uses_colony_zone() {
        let mut req = request();
        // 21:00 UTC on June 1 is already June 2 in Tashkent.
        req.submitted_at = Utc.with_ymd_and_hms(2026, 6, 1, 21, 0, 0).unwrap();
        assert_eq!(
            req.submission_day(),
            NaiveDate::from_ymd_opt(2026, 6, 2).unwrap()
        );
    }

    #[test]
    fn test_applicant_name_falls_back() {
        let mut req = request();
        assert_eq!(req.applicant_name(), "Karimova M.");
        req.visitors.clear();
        assert_eq!(req.applicant_name(), "N/A");
    }

    #[test]
    fn test_pending_request_skips_approved_invariant() {
        assert!(request().validate_approved().is_ok());
    }

    #[test]
    fn test_approved_invariant_requires_fields() {
        let mut req = request();
        req.status = VisitStatus::Approved;
        assert!(req.validate_approved().is_err());

        req.start_date = NaiveDate::from_ymd_opt(2026, 6, 12);
        req.end_date = NaiveDate::from_ymd_opt(2026, 6, 13);
        assert!(req.validate_approved().is_err());

        req.room = Some(RoomId::new(1, 5).unwrap());
        assert!(req.validate_approved().is_ok());
    }

    #[test]
    fn test_approved_invariant_checks_duration() {
        let mut req = request();
        req.status = VisitStatus::Approved;
        req.room = Some(RoomId::new(1, 5).unwrap());
        // Long implies two days; a three-day span violates the invariant.
        req.start_date = NaiveDate::from_ymd_opt(2026, 6, 12);
        req.end_date = NaiveDate::from_ymd_opt(2026, 6, 14);
        assert!(req.validate_approved().is_err());

        req.end_date = NaiveDate::from_ymd_opt(2026, 6, 13);
        assert!(req.validate_approved().is_ok());
    }
}
