// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Batch and single-request assignment drivers.
//!
//! A [`Scheduler`] is built fresh for every invocation from current storage
//! state; no search state survives between calls. Within a batch, requests
//! are processed strictly in the given order and each successful assignment
//! is committed into the occupancy grid before the next request is
//! evaluated.

use crate::blackout::BlackoutCalendar;
use crate::error::ScheduleError;
use crate::occupancy::OccupancyGrid;
use crate::slot_search::{self, Assignment};
use chrono::NaiveDate;
use tashrif_domain::{BookingId, SchedulePolicy, VisitRequest, calendar};

/// One successful assignment produced by a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAssignment {
    /// The request that was assigned.
    pub booking: BookingId,
    /// The slot it received.
    pub assignment: Assignment,
}

/// One request a batch run could not place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRequest {
    /// The request that was skipped.
    pub booking: BookingId,
    /// Why the search gave up on it.
    pub reason: ScheduleError,
}

/// The outcome of a batch planning run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchPlan {
    /// Assignments in processing order.
    pub assigned: Vec<PlannedAssignment>,
    /// Requests left pending, in processing order.
    pub skipped: Vec<SkippedRequest>,
}

impl BatchPlan {
    /// Returns how many requests received an assignment.
    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.assigned.len()
    }

    /// Returns how many requests the run considered.
    #[must_use]
    pub fn considered_count(&self) -> usize {
        self.assigned.len() + self.skipped.len()
    }
}

/// Sequential slot scheduler for one colony.
#[derive(Debug, Clone)]
pub struct Scheduler {
    blackouts: BlackoutCalendar,
    grid: OccupancyGrid,
    policy: SchedulePolicy,
}

impl Scheduler {
    /// Creates a scheduler over the given colony state.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy parameters are invalid.
    pub fn new(
        blackouts: BlackoutCalendar,
        grid: OccupancyGrid,
        policy: SchedulePolicy,
    ) -> Result<Self, ScheduleError> {
        policy.validate()?;
        Ok(Self {
            blackouts,
            grid,
            policy,
        })
    }

    /// Returns the active policy.
    #[must_use]
    pub const fn policy(&self) -> &SchedulePolicy {
        &self.policy
    }

    /// Returns the lead-time floor for a request: the later of today and
    /// `submission day + lead time`.
    ///
    /// Clamping to today keeps long-backlogged requests from being
    /// scheduled into the past.
    ///
    /// # Errors
    ///
    /// Returns an error if the floor overflows the calendar range.
    pub fn earliest_start(
        &self,
        request: &VisitRequest,
        today: NaiveDate,
    ) -> Result<NaiveDate, ScheduleError> {
        let floor = calendar::add_days(request.submission_day(), self.policy.lead_time_days)?;
        Ok(floor.max(today))
    }

    /// Commits an assignment into the occupancy grid.
    pub fn commit(&mut self, assignment: &Assignment) {
        self.grid.occupy(assignment.room, &assignment.span);
    }

    /// Runs slot search for every request in order.
    ///
    /// Requests must arrive oldest-submission-first; the first request gets
    /// first choice of date and room. A request that cannot be placed is
    /// skipped and the run continues - one failure never aborts the batch.
    pub fn plan_batch(&mut self, requests: &[VisitRequest], today: NaiveDate) -> BatchPlan {
        let mut plan = BatchPlan::default();

        for request in requests {
            match self.plan_request(request, today) {
                Ok(assignment) => {
                    self.commit(&assignment);
                    plan.assigned.push(PlannedAssignment {
                        booking: request.id,
                        assignment,
                    });
                }
                Err(reason) => {
                    plan.skipped.push(SkippedRequest {
                        booking: request.id,
                        reason,
                    });
                }
            }
        }

        plan
    }

    /// Places one request at an administrator-chosen start date.
    ///
    /// The date is validated against the request's lead-time floor
    /// (relative to submission, not clamped to today - the administrator's
    /// choice is explicit) and must fit the nominal duration exactly; no
    /// degradation and no forward search.
    ///
    /// # Errors
    ///
    /// * `ScheduleError::LeadTimeNotMet` - the date precedes the floor
    /// * `ScheduleError::SanitaryConflict` - the span touches a blackout day
    /// * `ScheduleError::NoRoomAvailable` - all rooms are taken on the span
    pub fn plan_single(
        &mut self,
        request: &VisitRequest,
        assigned_date: NaiveDate,
    ) -> Result<Assignment, ScheduleError> {
        let floor = calendar::add_days(request.submission_day(), self.policy.lead_time_days)?;
        if assigned_date < floor {
            return Err(ScheduleError::LeadTimeNotMet {
                assigned: assigned_date,
                earliest: floor,
            });
        }

        let assignment = slot_search::fit_at(
            assigned_date,
            request.category,
            &self.blackouts,
            &self.grid,
            &self.policy,
        )?;
        self.commit(&assignment);
        Ok(assignment)
    }

    fn plan_request(
        &self,
        request: &VisitRequest,
        today: NaiveDate,
    ) -> Result<Assignment, ScheduleError> {
        let earliest = self.earliest_start(request, today)?;
        slot_search::find_slot(
            earliest,
            request.category,
            &self.blackouts,
            &self.grid,
            &self.policy,
        )
    }
}
