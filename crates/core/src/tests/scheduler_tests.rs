// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the batch and single-request drivers.

use super::helpers::{day, pending_request, scheduler};
use crate::{OccupancyGrid, ScheduleError, Scheduler};
use std::collections::BTreeSet;
use tashrif_domain::{DateSpan, RoomId, SchedulePolicy, VisitCategory};

// ============================================================================
// Batch planning
// ============================================================================

#[test]
fn test_batch_fills_one_room_day_by_day() {
    // One room, blackout on day 12, three one-day requests from day 0.
    let mut sched = scheduler(1, &[12], SchedulePolicy::default());
    let requests = vec![
        pending_request(1, VisitCategory::Short, 0),
        pending_request(2, VisitCategory::Short, 0),
        pending_request(3, VisitCategory::Short, 0),
    ];

    let plan = sched.plan_batch(&requests, day(0));

    assert_eq!(plan.assigned_count(), 3);
    assert_eq!(plan.assigned[0].assignment.start(), day(10));
    assert_eq!(plan.assigned[1].assignment.start(), day(11));
    // Day 12 is sanitary and day 13 follows it without a buffer day.
    assert_eq!(plan.assigned[2].assignment.start(), day(14));

    for planned in &plan.assigned {
        assert!(!planned.assignment.span.contains(day(12)));
    }
}

#[test]
fn test_batch_spreads_across_rooms_first_fit() {
    // Two rooms, no blackouts: the older three-day request takes room 1,
    // the younger one-day request starts the same day in room 2.
    let mut sched = scheduler(2, &[], SchedulePolicy::default());
    let requests = vec![
        pending_request(1, VisitCategory::Extra, 0),
        pending_request(2, VisitCategory::Short, 0),
    ];

    let plan = sched.plan_batch(&requests, day(0));

    assert_eq!(plan.assigned_count(), 2);
    let first = &plan.assigned[0].assignment;
    let second = &plan.assigned[1].assignment;

    assert_eq!(first.room.number(), 1);
    assert_eq!(first.start(), day(10));
    assert_eq!(first.end(), day(12));

    assert_eq!(second.room.number(), 2);
    assert_eq!(second.start(), day(10));
    assert_eq!(second.end(), day(10));
}

#[test]
fn test_batch_degrades_long_visit_blocked_mid_span() {
    let mut sched = scheduler(1, &[11], SchedulePolicy::default());
    let requests = vec![pending_request(1, VisitCategory::Long, 0)];

    let plan = sched.plan_batch(&requests, day(0));

    let assignment = &plan.assigned[0].assignment;
    assert_eq!(assignment.category, VisitCategory::Short);
    assert_eq!(assignment.start(), day(10));
    assert_eq!(assignment.end(), day(10));
}

#[test]
fn test_batch_skips_unplaceable_request_and_continues() {
    // A blackout wall covers the first request's whole horizon; the second
    // request, submitted two days later, has a horizon reaching just past
    // the wall and must still get its slot.
    let wall: Vec<u32> = (10..=70).collect();
    let mut sched = scheduler(1, &wall, SchedulePolicy::default());
    let requests = vec![
        pending_request(1, VisitCategory::Short, 0),
        pending_request(2, VisitCategory::Short, 2),
    ];

    let plan = sched.plan_batch(&requests, day(2));

    assert_eq!(plan.assigned_count(), 1);
    assert_eq!(plan.considered_count(), 2);
    assert_eq!(plan.skipped.len(), 1);
    assert_eq!(plan.skipped[0].booking.value(), 1);
    assert!(matches!(
        plan.skipped[0].reason,
        ScheduleError::NoSlotFound { .. }
    ));
    assert_eq!(plan.assigned[0].booking.value(), 2);
    // Day 71 follows the wall without a buffer day; 72 is first admissible.
    assert_eq!(plan.assigned[0].assignment.start(), day(72));
}

#[test]
fn test_batch_never_double_books_a_room_day() {
    let mut sched = scheduler(2, &[13], SchedulePolicy::default());
    let requests = vec![
        pending_request(1, VisitCategory::Long, 0),
        pending_request(2, VisitCategory::Extra, 0),
        pending_request(3, VisitCategory::Short, 0),
        pending_request(4, VisitCategory::Long, 1),
        pending_request(5, VisitCategory::Short, 1),
    ];

    let plan = sched.plan_batch(&requests, day(2));

    let mut seen: BTreeSet<(u32, chrono::NaiveDate)> = BTreeSet::new();
    for planned in &plan.assigned {
        for d in planned.assignment.span.iter_days() {
            assert!(
                seen.insert((planned.assignment.room.number(), d)),
                "room {} double-booked on {d}",
                planned.assignment.room
            );
        }
    }
}

#[test]
fn test_batch_respects_lead_time_floor() {
    let mut sched = scheduler(3, &[], SchedulePolicy::default());
    let requests = vec![
        pending_request(1, VisitCategory::Short, 0),
        pending_request(2, VisitCategory::Short, 3),
        pending_request(3, VisitCategory::Long, 5),
    ];

    let plan = sched.plan_batch(&requests, day(6));

    assert_eq!(plan.assigned_count(), 3);
    for (planned, request) in plan.assigned.iter().zip(&requests) {
        let floor = tashrif_domain::calendar::add_days(request.submission_day(), 10).unwrap();
        assert!(planned.assignment.start() >= floor);
    }
}

#[test]
fn test_stale_request_is_not_scheduled_into_the_past() {
    // Submitted long ago: submission + lead time is already behind today.
    let mut sched = scheduler(1, &[], SchedulePolicy::default());
    let requests = vec![pending_request(1, VisitCategory::Short, 0)];

    let plan = sched.plan_batch(&requests, day(40));

    assert_eq!(plan.assigned[0].assignment.start(), day(40));
}

#[test]
fn test_fifo_older_request_is_never_ordered_behind_younger() {
    let mut sched = scheduler(1, &[], SchedulePolicy::default());
    let requests = vec![
        pending_request(1, VisitCategory::Short, 0),
        pending_request(2, VisitCategory::Short, 0),
    ];

    let plan = sched.plan_batch(&requests, day(0));

    assert_eq!(plan.assigned[0].booking.value(), 1);
    assert!(plan.assigned[0].assignment.start() <= plan.assigned[1].assignment.start());
}

#[test]
fn test_replanning_unchanged_state_yields_identical_plan() {
    let requests = vec![
        pending_request(1, VisitCategory::Long, 0),
        pending_request(2, VisitCategory::Short, 0),
    ];

    let mut first_run = scheduler(2, &[11], SchedulePolicy::default());
    let mut second_run = scheduler(2, &[11], SchedulePolicy::default());

    let first = first_run.plan_batch(&requests, day(0));
    let second = second_run.plan_batch(&requests, day(0));

    assert_eq!(first, second);
}

// ============================================================================
// Single-request planning
// ============================================================================

/// One-room scheduler with blackout days and pre-approved occupied days.
fn single_scheduler(blackouts: &[u32], occupied_days: &[u32]) -> Scheduler {
    let mut grid = OccupancyGrid::new(1).unwrap();
    for &offset in occupied_days {
        grid.occupy(
            RoomId::new(1, 1).unwrap(),
            &DateSpan::from_start(day(offset), 1).unwrap(),
        );
    }
    Scheduler::new(
        crate::BlackoutCalendar::from_dates(blackouts.iter().map(|&o| day(o))),
        grid,
        SchedulePolicy::default(),
    )
    .unwrap()
}

#[test]
fn test_single_assignment_at_admin_chosen_date() {
    let mut sched = single_scheduler(&[], &[]);
    let request = pending_request(1, VisitCategory::Long, 0);

    let assignment = sched.plan_single(&request, day(15)).unwrap();

    assert_eq!(assignment.start(), day(15));
    assert_eq!(assignment.end(), day(16));
    assert_eq!(assignment.room.number(), 1);
    assert_eq!(assignment.category, VisitCategory::Long);
}

#[test]
fn test_single_assignment_rejects_date_before_lead_time() {
    let mut sched = single_scheduler(&[], &[]);
    let request = pending_request(1, VisitCategory::Short, 0);

    let result = sched.plan_single(&request, day(5));

    assert!(matches!(
        result,
        Err(ScheduleError::LeadTimeNotMet { assigned, earliest })
            if assigned == day(5) && earliest == day(10)
    ));
}

#[test]
fn test_single_assignment_surfaces_sanitary_conflict() {
    let mut sched = single_scheduler(&[16], &[]);
    let request = pending_request(1, VisitCategory::Long, 0);

    let result = sched.plan_single(&request, day(15));

    assert!(matches!(
        result,
        Err(ScheduleError::SanitaryConflict { date }) if date == day(15)
    ));
}

#[test]
fn test_single_assignment_surfaces_no_room_available() {
    // The only room already hosts an approved booking on the chosen date.
    let mut sched = single_scheduler(&[], &[15]);
    let request = pending_request(1, VisitCategory::Short, 0);

    let result = sched.plan_single(&request, day(15));

    assert!(matches!(
        result,
        Err(ScheduleError::NoRoomAvailable { date }) if date == day(15)
    ));
}

#[test]
fn test_single_assignment_commits_into_grid() {
    let mut sched = single_scheduler(&[], &[]);
    let first = pending_request(1, VisitCategory::Short, 0);
    let second = pending_request(2, VisitCategory::Short, 0);

    sched.plan_single(&first, day(15)).unwrap();
    let result = sched.plan_single(&second, day(15));

    assert!(matches!(result, Err(ScheduleError::NoRoomAvailable { .. })));
}
