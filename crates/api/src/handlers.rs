// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API operations.
//!
//! Every operation follows the same shape: validate input, load current
//! state, invoke the scheduling core, persist the outcome, queue
//! notifications. The assignment record is always persisted before its
//! notifications are queued, and a notification problem is logged and
//! swallowed - booking state is authoritative regardless of delivery.

use crate::error::{ApiError, translate_persistence_error, translate_schedule_error};
use crate::request_response::{
    AssignBookingRequest, AssignBookingResponse, AssignedBooking, BatchAssignRequest,
    BatchAssignResponse, BookingSummary, CancelBookingRequest, ChangeDaysBatchRequest,
    ChangeDaysBatchResponse, ChangeDaysRequest, CloseExpiredResponse, ListBookingsResponse,
    PurgeClosedResponse, RejectBookingRequest, SanitaryDaysResponse, SanitaryToggleRequest,
    SanitaryToggleResponse, SkippedBooking, StatusChangeResponse,
};
use chrono::{DateTime, NaiveDate, Utc};
use tashrif::{
    BlackoutCalendar, OccupancyGrid, Scheduler, notify,
    notify::NotificationMessage,
};
use tashrif_domain::{
    BookingId, ColonyId, VisitCategory, VisitRequest, VisitStatus, calendar,
};
use tashrif_persistence::{ColonyConfig, Persistence, PersistenceError};
use tracing::{info, warn};

/// Upper bound on batch sizes accepted from the admin panel.
const MAX_BATCH_COUNT: u32 = 50;

fn validate_count(count: u32) -> Result<(), ApiError> {
    if (1..=MAX_BATCH_COUNT).contains(&count) {
        return Ok(());
    }
    Err(ApiError::InvalidInput {
        field: String::from("count"),
        message: format!("must be between 1 and {MAX_BATCH_COUNT}, got {count}"),
    })
}

fn parse_request_day(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    calendar::parse_day(value).map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: e.to_string(),
    })
}

/// Loads a colony's configuration, mapping a missing row to the dedicated
/// error: without a room count nothing can be scheduled.
fn load_colony_config(
    persistence: &mut Persistence,
    colony: ColonyId,
) -> Result<ColonyConfig, ApiError> {
    persistence.get_colony_config(colony).map_err(|err| match err {
        PersistenceError::NotFound(_) => ApiError::ColonyConfigMissing {
            colony: colony.value(),
        },
        other => translate_persistence_error(other),
    })
}

/// Builds a scheduler from the colony's current stored state.
fn build_scheduler(
    persistence: &mut Persistence,
    colony: ColonyId,
    config: &ColonyConfig,
) -> Result<Scheduler, ApiError> {
    let blackouts = BlackoutCalendar::from_dates(
        persistence
            .sanitary_dates(colony)
            .map_err(translate_persistence_error)?,
    );
    let grid = OccupancyGrid::from_bookings(
        config.rooms_count,
        persistence
            .approved_room_spans(colony)
            .map_err(translate_persistence_error)?,
    )
    .map_err(translate_schedule_error)?;
    Scheduler::new(blackouts, grid, config.policy).map_err(translate_schedule_error)
}

/// Queues composed messages, logging and swallowing enqueue failures.
fn enqueue_messages(
    persistence: &mut Persistence,
    colony: ColonyId,
    messages: &[NotificationMessage],
    now: DateTime<Utc>,
) {
    for message in messages {
        if let Err(err) =
            persistence.enqueue_notification(colony, &message.channel, &message.text, now)
        {
            warn!(
                colony = colony.value(),
                chat = %message.channel,
                error = %err,
                "Failed to queue notification"
            );
        }
    }
}

fn require_pending(request: &VisitRequest) -> Result<(), ApiError> {
    if request.status == VisitStatus::Pending {
        return Ok(());
    }
    Err(ApiError::DomainRuleViolation {
        rule: String::from("booking_status"),
        message: format!(
            "booking {} is '{}', expected 'pending'",
            request.id, request.status
        ),
    })
}

fn load_booking(
    persistence: &mut Persistence,
    colony: ColonyId,
    booking_id: i64,
) -> Result<VisitRequest, ApiError> {
    persistence
        .get_booking(colony, BookingId::new(booking_id))
        .map_err(|err| match err {
            PersistenceError::NotFound(_) => ApiError::BookingNotFound { booking_id },
            other => translate_persistence_error(other),
        })
}

/// Runs batch assignment over the oldest pending requests of a colony.
///
/// Requests are processed oldest-submission-first; each successful slot is
/// persisted and announced before the next request is considered. A
/// request that cannot be placed or persisted is reported in `skipped` and
/// never aborts its siblings.
///
/// # Errors
///
/// Returns an error if the input is invalid, the colony has no
/// configuration, or loading state fails. Per-request failures are
/// reported in the response instead.
pub fn run_batch_assignment(
    persistence: &mut Persistence,
    colony: ColonyId,
    request: BatchAssignRequest,
    now: DateTime<Utc>,
) -> Result<BatchAssignResponse, ApiError> {
    validate_count(request.count)?;

    let config = load_colony_config(persistence, colony)?;
    let pending = persistence
        .pending_requests(colony, i64::from(request.count))
        .map_err(translate_persistence_error)?;
    let mut scheduler = build_scheduler(persistence, colony, &config)?;

    let today = calendar::local_date(now);
    let plan = scheduler.plan_batch(&pending, today);

    info!(
        colony = colony.value(),
        considered = plan.considered_count(),
        planned = plan.assigned_count(),
        "Planned batch assignment"
    );

    let mut response = BatchAssignResponse {
        assigned_count: 0,
        total_considered: plan.considered_count(),
        assignments: Vec::new(),
        skipped: Vec::new(),
    };

    for skipped in &plan.skipped {
        response
            .skipped
            .push(SkippedBooking::new(skipped.booking, &skipped.reason));
    }

    for planned in &plan.assigned {
        let Some(visit) = pending.iter().find(|r| r.id == planned.booking) else {
            continue;
        };
        match persistence.apply_assignment(planned.booking, &planned.assignment) {
            Ok(()) => {
                let messages = notify::fan_out(
                    &config.admin_chat,
                    notify::approved_admin_text(visit, &planned.assignment),
                    visit,
                    notify::approved_applicant_text(visit, &planned.assignment),
                );
                enqueue_messages(persistence, colony, &messages, now);
                response
                    .assignments
                    .push(AssignedBooking::from_assignment(visit, &planned.assignment));
            }
            Err(err) => {
                // This request's write failed; its slot stays unused for
                // this run and the batch moves on.
                warn!(
                    booking = planned.booking.value(),
                    error = %err,
                    "Failed to persist assignment, skipping request"
                );
                response
                    .skipped
                    .push(SkippedBooking::new(planned.booking, &err));
            }
        }
    }

    response.assigned_count = response.assignments.len();
    info!(
        colony = colony.value(),
        assigned = response.assigned_count,
        "Completed batch assignment"
    );
    Ok(response)
}

/// Assigns one pending booking at an administrator-chosen date.
///
/// # Errors
///
/// Returns an error if the booking is missing or not pending, the date is
/// malformed or precedes the lead-time floor, the span touches a sanitary
/// day, no room is free, or persistence fails. No mutation happens on any
/// of these paths.
pub fn assign_booking(
    persistence: &mut Persistence,
    colony: ColonyId,
    request: AssignBookingRequest,
    now: DateTime<Utc>,
) -> Result<AssignBookingResponse, ApiError> {
    let assigned_date = parse_request_day("assigned_date", &request.assigned_date)?;
    let visit = load_booking(persistence, colony, request.booking_id)?;
    require_pending(&visit)?;

    let config = load_colony_config(persistence, colony)?;
    let mut scheduler = build_scheduler(persistence, colony, &config)?;

    let assignment = scheduler
        .plan_single(&visit, assigned_date)
        .map_err(translate_schedule_error)?;

    persistence
        .apply_assignment(visit.id, &assignment)
        .map_err(translate_persistence_error)?;

    let messages = notify::fan_out(
        &config.admin_chat,
        notify::approved_admin_text(&visit, &assignment),
        &visit,
        notify::approved_applicant_text(&visit, &assignment),
    );
    enqueue_messages(persistence, colony, &messages, now);

    info!(
        colony = colony.value(),
        booking = visit.id.value(),
        start = %assignment.start(),
        room = %assignment.room,
        "Assigned booking"
    );

    Ok(AssignBookingResponse {
        assignment: AssignedBooking::from_assignment(&visit, &assignment),
    })
}

/// Rejects a pending booking, recording the reason.
///
/// # Errors
///
/// Returns an error if the booking is missing, not pending, or the write
/// fails.
pub fn reject_booking(
    persistence: &mut Persistence,
    colony: ColonyId,
    request: RejectBookingRequest,
    now: DateTime<Utc>,
) -> Result<StatusChangeResponse, ApiError> {
    if request.reason.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("reason"),
            message: String::from("must not be empty"),
        });
    }
    let visit = load_booking(persistence, colony, request.booking_id)?;
    require_pending(&visit)?;
    let config = load_colony_config(persistence, colony)?;

    persistence
        .reject_booking(visit.id, &request.reason)
        .map_err(translate_persistence_error)?;

    let text = notify::rejected_text(&visit, &request.reason);
    let messages = notify::fan_out(&config.admin_chat, text.clone(), &visit, text);
    enqueue_messages(persistence, colony, &messages, now);

    info!(
        colony = colony.value(),
        booking = visit.id.value(),
        "Rejected booking"
    );
    Ok(StatusChangeResponse {
        booking_id: visit.id.value(),
        status: VisitStatus::Rejected.as_str().to_string(),
    })
}

/// Cancels a pending or approved booking, recording the reason.
///
/// # Errors
///
/// Returns an error if the booking is missing, already terminal, or the
/// write fails.
pub fn cancel_booking(
    persistence: &mut Persistence,
    colony: ColonyId,
    request: CancelBookingRequest,
    now: DateTime<Utc>,
) -> Result<StatusChangeResponse, ApiError> {
    if request.reason.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("reason"),
            message: String::from("must not be empty"),
        });
    }
    let visit = load_booking(persistence, colony, request.booking_id)?;
    if visit.status.is_terminal() {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("booking_status"),
            message: format!("booking {} is already '{}'", visit.id, visit.status),
        });
    }
    let config = load_colony_config(persistence, colony)?;

    persistence
        .cancel_booking(visit.id, &request.reason)
        .map_err(translate_persistence_error)?;

    let text = notify::canceled_text(&visit, &request.reason);
    let messages = notify::fan_out(&config.admin_chat, text.clone(), &visit, text);
    enqueue_messages(persistence, colony, &messages, now);

    info!(
        colony = colony.value(),
        booking = visit.id.value(),
        "Canceled booking"
    );
    Ok(StatusChangeResponse {
        booking_id: visit.id.value(),
        status: VisitStatus::Canceled.as_str().to_string(),
    })
}

/// Re-categorizes one pending booking to the given duration.
///
/// # Errors
///
/// Returns an error if the duration is out of range, the booking is
/// missing or not pending, or the write fails.
pub fn change_visit_days(
    persistence: &mut Persistence,
    colony: ColonyId,
    request: ChangeDaysRequest,
    now: DateTime<Utc>,
) -> Result<StatusChangeResponse, ApiError> {
    let category = VisitCategory::from_days(request.days).map_err(|e| ApiError::InvalidInput {
        field: String::from("days"),
        message: e.to_string(),
    })?;
    let visit = load_booking(persistence, colony, request.booking_id)?;
    require_pending(&visit)?;
    let config = load_colony_config(persistence, colony)?;

    persistence
        .change_visit_category(visit.id, category)
        .map_err(translate_persistence_error)?;

    let text = notify::days_changed_text(&visit, request.days);
    let messages = notify::fan_out(&config.admin_chat, text.clone(), &visit, text);
    enqueue_messages(persistence, colony, &messages, now);

    Ok(StatusChangeResponse {
        booking_id: visit.id.value(),
        status: VisitStatus::Pending.as_str().to_string(),
    })
}

/// Re-categorizes up to `count` oldest pending bookings.
///
/// Bookings already in the target category are counted but not rewritten
/// and get no notification.
///
/// # Errors
///
/// Returns an error if the input is invalid or the colony has no
/// configuration. Per-booking write failures are logged and skipped.
pub fn change_days_batch(
    persistence: &mut Persistence,
    colony: ColonyId,
    request: ChangeDaysBatchRequest,
    now: DateTime<Utc>,
) -> Result<ChangeDaysBatchResponse, ApiError> {
    validate_count(request.count)?;
    let category = VisitCategory::from_days(request.days).map_err(|e| ApiError::InvalidInput {
        field: String::from("days"),
        message: e.to_string(),
    })?;
    let config = load_colony_config(persistence, colony)?;

    let pending = persistence
        .pending_requests(colony, i64::from(request.count))
        .map_err(translate_persistence_error)?;

    let mut changed = 0usize;
    for visit in &pending {
        if visit.category == category {
            continue;
        }
        if let Err(err) = persistence.change_visit_category(visit.id, category) {
            warn!(
                booking = visit.id.value(),
                error = %err,
                "Failed to change visit category, skipping"
            );
            continue;
        }
        changed += 1;
        let text = notify::days_changed_text(visit, request.days);
        let messages = notify::fan_out(&config.admin_chat, text.clone(), visit, text);
        enqueue_messages(persistence, colony, &messages, now);
    }

    info!(
        colony = colony.value(),
        changed,
        considered = pending.len(),
        "Completed batch day change"
    );
    Ok(ChangeDaysBatchResponse {
        changed_count: changed,
        total_considered: pending.len(),
    })
}

/// Adds or removes a sanitary day.
///
/// # Errors
///
/// Returns an error if the date is malformed or in the past, the action is
/// unknown, or the write fails.
pub fn toggle_sanitary_day(
    persistence: &mut Persistence,
    colony: ColonyId,
    request: SanitaryToggleRequest,
    now: DateTime<Utc>,
) -> Result<SanitaryToggleResponse, ApiError> {
    let day = parse_request_day("date", &request.date)?;
    let today = calendar::local_date(now);
    if day < today {
        return Err(ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("{} is in the past", request.date),
        });
    }

    match request.action.as_str() {
        "add" => persistence
            .add_sanitary_day(colony, day)
            .map_err(translate_persistence_error)?,
        "remove" => {
            persistence
                .remove_sanitary_day(colony, day)
                .map_err(translate_persistence_error)?;
        }
        other => {
            return Err(ApiError::InvalidInput {
                field: String::from("action"),
                message: format!("expected 'add' or 'remove', got '{other}'"),
            });
        }
    }

    info!(
        colony = colony.value(),
        date = %day,
        action = %request.action,
        "Toggled sanitary day"
    );
    Ok(SanitaryToggleResponse {
        date: request.date,
        action: request.action,
    })
}

/// Lists a colony's sanitary days.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_sanitary_days(
    persistence: &mut Persistence,
    colony: ColonyId,
) -> Result<SanitaryDaysResponse, ApiError> {
    let dates = persistence
        .sanitary_dates(colony)
        .map_err(translate_persistence_error)?;
    Ok(SanitaryDaysResponse {
        dates: dates.into_iter().map(calendar::format_day).collect(),
    })
}

/// Closes approved bookings whose visit ended before today and notifies
/// the applicants.
///
/// # Errors
///
/// Returns an error if the colony has no configuration or loading fails.
/// Per-booking write failures are logged and skipped.
pub fn close_expired_bookings(
    persistence: &mut Persistence,
    colony: ColonyId,
    now: DateTime<Utc>,
) -> Result<CloseExpiredResponse, ApiError> {
    let _config = load_colony_config(persistence, colony)?;
    let today = calendar::local_date(now);
    let expired = persistence
        .approved_ending_before(colony, today)
        .map_err(translate_persistence_error)?;

    let mut closed = Vec::new();
    for visit in &expired {
        if let Err(err) = persistence.close_booking(visit.id) {
            warn!(
                booking = visit.id.value(),
                error = %err,
                "Failed to close booking, skipping"
            );
            continue;
        }
        closed.push(visit.id.value());
        if let (Some(chat), Some(end_date)) = (&visit.chat, visit.end_date) {
            let message = NotificationMessage {
                channel: chat.clone(),
                text: notify::closed_text(visit, end_date),
            };
            enqueue_messages(persistence, colony, &[message], now);
        }
    }

    info!(
        colony = colony.value(),
        closed = closed.len(),
        "Closed expired bookings"
    );
    Ok(CloseExpiredResponse {
        closed_count: closed.len(),
        booking_ids: closed,
    })
}

/// Hard-deletes closed bookings whose visit ended before today.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn purge_closed_bookings(
    persistence: &mut Persistence,
    colony: ColonyId,
    now: DateTime<Utc>,
) -> Result<PurgeClosedResponse, ApiError> {
    let today = calendar::local_date(now);
    let purged = persistence
        .purge_closed(colony, today)
        .map_err(translate_persistence_error)?;
    info!(colony = colony.value(), purged, "Purged closed bookings");
    Ok(PurgeClosedResponse {
        purged_count: purged,
    })
}

/// Lists a colony's bookings for the admin table, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_bookings(
    persistence: &mut Persistence,
    colony: ColonyId,
) -> Result<ListBookingsResponse, ApiError> {
    let bookings = persistence
        .list_bookings(colony)
        .map_err(translate_persistence_error)?;
    Ok(ListBookingsResponse {
        bookings: bookings.iter().map(BookingSummary::from_request).collect(),
    })
}
