// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Batch assignment operation tests.

use super::helpers::{colony, day, now, outbox_len, seed_pending, setup};
use crate::{ApiError, BatchAssignRequest, run_batch_assignment};
use tashrif_domain::{ColonyId, VisitCategory, VisitStatus};
use tashrif_persistence::Persistence;

fn run(persistence: &mut Persistence, count: u32) -> Result<crate::BatchAssignResponse, ApiError> {
    run_batch_assignment(persistence, colony(), BatchAssignRequest { count }, now())
}

#[test]
fn test_rejects_out_of_range_count() {
    let mut persistence = setup(1);

    assert!(matches!(
        run(&mut persistence, 0),
        Err(ApiError::InvalidInput { .. })
    ));
    assert!(matches!(
        run(&mut persistence, 51),
        Err(ApiError::InvalidInput { .. })
    ));
}

#[test]
fn test_missing_colony_aborts_whole_batch() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let result = run_batch_assignment(
        &mut persistence,
        ColonyId::new(9).unwrap(),
        BatchAssignRequest { count: 5 },
        now(),
    );

    assert!(matches!(
        result,
        Err(ApiError::ColonyConfigMissing { colony: 9 })
    ));
}

#[test]
fn test_empty_backlog_is_a_clean_run() {
    let mut persistence = setup(1);
    let response = run(&mut persistence, 10).unwrap();

    assert_eq!(response.assigned_count, 0);
    assert_eq!(response.total_considered, 0);
    assert!(response.assignments.is_empty());
}

#[test]
fn test_batch_assigns_fifo_and_persists() {
    let mut persistence = setup(1);
    let first = seed_pending(&mut persistence, 4, VisitCategory::Short, true);
    let second = seed_pending(&mut persistence, 5, VisitCategory::Short, true);

    let response = run(&mut persistence, 10).unwrap();

    assert_eq!(response.assigned_count, 2);
    assert_eq!(response.assignments[0].booking_id, first.value());
    assert_eq!(response.assignments[0].start_date, "2026-06-11");
    assert_eq!(response.assignments[0].room, 1);
    assert_eq!(response.assignments[1].booking_id, second.value());
    assert_eq!(response.assignments[1].start_date, "2026-06-12");

    for id in [first, second] {
        let stored = persistence.get_booking(colony(), id).unwrap();
        assert_eq!(stored.status, VisitStatus::Approved);
        assert!(stored.validate_approved().is_ok());
    }
}

#[test]
fn test_batch_spreads_across_rooms() {
    let mut persistence = setup(2);
    seed_pending(&mut persistence, 4, VisitCategory::Extra, false);
    seed_pending(&mut persistence, 5, VisitCategory::Short, false);

    let response = run(&mut persistence, 10).unwrap();

    assert_eq!(response.assignments[0].room, 1);
    assert_eq!(response.assignments[0].start_date, "2026-06-11");
    assert_eq!(response.assignments[0].end_date, "2026-06-13");
    assert_eq!(response.assignments[1].room, 2);
    assert_eq!(response.assignments[1].start_date, "2026-06-11");
}

#[test]
fn test_batch_degrades_and_persists_short_category() {
    let mut persistence = setup(1);
    persistence
        .add_sanitary_day(colony(), day("2026-06-12"))
        .unwrap();
    let id = seed_pending(&mut persistence, 4, VisitCategory::Long, false);

    let response = run(&mut persistence, 10).unwrap();

    assert_eq!(response.assignments[0].visit_type, "short");
    assert_eq!(response.assignments[0].start_date, "2026-06-11");
    assert_eq!(response.assignments[0].end_date, "2026-06-11");

    let stored = persistence.get_booking(colony(), id).unwrap();
    assert_eq!(stored.category, VisitCategory::Short);
    assert!(stored.validate_approved().is_ok());
}

#[test]
fn test_batch_works_around_sanitary_days() {
    let mut persistence = setup(1);
    persistence
        .add_sanitary_day(colony(), day("2026-06-12"))
        .unwrap();
    for hour in 4..7 {
        seed_pending(&mut persistence, hour, VisitCategory::Short, false);
    }

    let response = run(&mut persistence, 10).unwrap();

    let starts: Vec<&str> = response
        .assignments
        .iter()
        .map(|a| a.start_date.as_str())
        .collect();
    // June 12 is sanitary and June 13 follows it without a buffer day.
    assert_eq!(starts, vec!["2026-06-11", "2026-06-14", "2026-06-15"]);
}

#[test]
fn test_unplaceable_request_is_skipped_not_fatal() {
    let mut persistence = setup(1);
    // Blackout wall across the whole 60-day horizon from the floor.
    let mut d = day("2026-06-11");
    for _ in 0..=60 {
        persistence.add_sanitary_day(colony(), d).unwrap();
        d = d.succ_opt().unwrap();
    }
    let id = seed_pending(&mut persistence, 4, VisitCategory::Short, true);

    let response = run(&mut persistence, 10).unwrap();

    assert_eq!(response.assigned_count, 0);
    assert_eq!(response.total_considered, 1);
    assert_eq!(response.skipped.len(), 1);
    assert_eq!(response.skipped[0].booking_id, id.value());
    assert!(response.skipped[0].reason.contains("horizon"));

    // The request stays pending and nothing was announced.
    let stored = persistence.get_booking(colony(), id).unwrap();
    assert_eq!(stored.status, VisitStatus::Pending);
    assert_eq!(outbox_len(&mut persistence), 0);
}

#[test]
fn test_batch_queues_admin_and_applicant_messages() {
    let mut persistence = setup(2);
    seed_pending(&mut persistence, 4, VisitCategory::Short, true);
    seed_pending(&mut persistence, 5, VisitCategory::Short, false);

    run(&mut persistence, 10).unwrap();

    // Two messages for the chat-carrying booking, one for the other.
    assert_eq!(outbox_len(&mut persistence), 3);
    let queued = persistence.unsent_notifications(10).unwrap();
    assert_eq!(queued[0].chat_id, "-100200300");
    assert_eq!(queued[1].chat_id, "5500123");
    assert!(queued[1].body.contains("Tasdiqlangan"));
}

#[test]
fn test_count_limits_how_many_are_considered() {
    let mut persistence = setup(3);
    for hour in 4..9 {
        seed_pending(&mut persistence, hour, VisitCategory::Short, false);
    }

    let response = run(&mut persistence, 2).unwrap();

    assert_eq!(response.total_considered, 2);
    assert_eq!(response.assigned_count, 2);

    let pending = persistence.pending_requests(colony(), 50).unwrap();
    assert_eq!(pending.len(), 3);
}

#[test]
fn test_batch_sees_previously_approved_bookings() {
    let mut persistence = setup(1);
    seed_pending(&mut persistence, 4, VisitCategory::Short, false);
    run(&mut persistence, 10).unwrap(); // takes June 11

    seed_pending(&mut persistence, 5, VisitCategory::Short, false);
    let response = run(&mut persistence, 10).unwrap();

    // The second run starts from current storage state.
    assert_eq!(response.assignments[0].start_date, "2026-06-12");
}
