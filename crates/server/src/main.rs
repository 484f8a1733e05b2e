// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP server for the Tashrif visit booking back office.
//!
//! A thin axum wrapper over `tashrif-api`: each route locks the shared
//! persistence adapter, runs one operation at the current clock, and maps
//! the result to JSON. The mutex serializes every operation for the
//! deployment's colony, which is what keeps concurrent batch runs from
//! racing each other over the same rooms and days.
//!
//! Notification delivery happens off the request path: a background task
//! periodically drains the outbox through the configured sink.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::State as AxumState,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tashrif_api::{
    ApiError, AssignBookingRequest, BatchAssignRequest, CancelBookingRequest,
    ChangeDaysBatchRequest, ChangeDaysRequest, RejectBookingRequest, SanitaryToggleRequest,
    TracingSink, assign_booking, cancel_booking, change_days_batch, change_visit_days,
    close_expired_bookings, drain_outbox, list_bookings, list_sanitary_days,
    purge_closed_bookings, reject_booking, run_batch_assignment, toggle_sanitary_day,
};
use tashrif_domain::ColonyId;
use tashrif_persistence::Persistence;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Tashrif Server - HTTP server for the visit booking back office
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses an
    /// in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Colony this deployment serves
    #[arg(short, long, default_value_t = 1)]
    colony: i64,

    /// Seconds between notification outbox drain passes
    #[arg(long, default_value_t = 60)]
    drain_interval: u64,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer behind a mutex; operations are serialized.
    persistence: Arc<Mutex<Persistence>>,
    /// The colony this deployment serves.
    colony: ColonyId,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status = match &err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::BookingNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::SanitaryConflict { .. }
            | ApiError::NoRoomAvailable { .. }
            | ApiError::NoSlotFound { .. } => StatusCode::CONFLICT,
            ApiError::ColonyConfigMissing { .. } | ApiError::Persistence { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

async fn handle_accept_batch(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<BatchAssignRequest>,
) -> Result<impl IntoResponse, HttpError> {
    info!(count = request.count, "Handling accept-batch request");
    let mut persistence = state.persistence.lock().await;
    let response = run_batch_assignment(&mut persistence, state.colony, request, Utc::now())?;
    Ok(Json(response))
}

async fn handle_accept_booking(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<AssignBookingRequest>,
) -> Result<impl IntoResponse, HttpError> {
    info!(
        booking_id = request.booking_id,
        date = %request.assigned_date,
        "Handling accept-booking request"
    );
    let mut persistence = state.persistence.lock().await;
    let response = assign_booking(&mut persistence, state.colony, request, Utc::now())?;
    Ok(Json(response))
}

async fn handle_reject_booking(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<RejectBookingRequest>,
) -> Result<impl IntoResponse, HttpError> {
    info!(booking_id = request.booking_id, "Handling reject-booking request");
    let mut persistence = state.persistence.lock().await;
    let response = reject_booking(&mut persistence, state.colony, request, Utc::now())?;
    Ok(Json(response))
}

async fn handle_cancel_booking(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<CancelBookingRequest>,
) -> Result<impl IntoResponse, HttpError> {
    info!(booking_id = request.booking_id, "Handling cancel-booking request");
    let mut persistence = state.persistence.lock().await;
    let response = cancel_booking(&mut persistence, state.colony, request, Utc::now())?;
    Ok(Json(response))
}

async fn handle_change_days(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<ChangeDaysRequest>,
) -> Result<impl IntoResponse, HttpError> {
    info!(
        booking_id = request.booking_id,
        days = request.days,
        "Handling change-days request"
    );
    let mut persistence = state.persistence.lock().await;
    let response = change_visit_days(&mut persistence, state.colony, request, Utc::now())?;
    Ok(Json(response))
}

async fn handle_change_days_batch(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<ChangeDaysBatchRequest>,
) -> Result<impl IntoResponse, HttpError> {
    info!(
        count = request.count,
        days = request.days,
        "Handling change-days-batch request"
    );
    let mut persistence = state.persistence.lock().await;
    let response = change_days_batch(&mut persistence, state.colony, request, Utc::now())?;
    Ok(Json(response))
}

async fn handle_change_sanitary(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<SanitaryToggleRequest>,
) -> Result<impl IntoResponse, HttpError> {
    info!(
        date = %request.date,
        action = %request.action,
        "Handling change-sanitary request"
    );
    let mut persistence = state.persistence.lock().await;
    let response = toggle_sanitary_day(&mut persistence, state.colony, request, Utc::now())?;
    Ok(Json(response))
}

async fn handle_get_sanitary(
    AxumState(state): AxumState<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response = list_sanitary_days(&mut persistence, state.colony)?;
    Ok(Json(response))
}

async fn handle_list_bookings(
    AxumState(state): AxumState<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response = list_bookings(&mut persistence, state.colony)?;
    Ok(Json(response))
}

async fn handle_close_expired(
    AxumState(state): AxumState<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    info!("Handling close-expired-bookings request");
    let mut persistence = state.persistence.lock().await;
    let response = close_expired_bookings(&mut persistence, state.colony, Utc::now())?;
    Ok(Json(response))
}

async fn handle_purge_closed(
    AxumState(state): AxumState<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    info!("Handling purge-closed-bookings request");
    let mut persistence = state.persistence.lock().await;
    let response = purge_closed_bookings(&mut persistence, state.colony, Utc::now())?;
    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/accept-batch", post(handle_accept_batch))
        .route("/api/accept-booking", post(handle_accept_booking))
        .route("/api/reject-booking", post(handle_reject_booking))
        .route("/api/cancel-booking", post(handle_cancel_booking))
        .route("/api/change-days", post(handle_change_days))
        .route("/api/change-days-batch", post(handle_change_days_batch))
        .route("/api/change-sanitary", post(handle_change_sanitary))
        .route("/api/get-sanitary", get(handle_get_sanitary))
        .route("/api/bookings", get(handle_list_bookings))
        .route(
            "/api/close-expired-bookings",
            post(handle_close_expired),
        )
        .route("/api/purge-closed-bookings", post(handle_purge_closed))
        .with_state(app_state)
}

/// Periodically drains the notification outbox through the logging sink.
///
/// Delivery failures are already swallowed inside `drain_outbox`; an error
/// here means the queue itself could not be read, which is worth a log
/// line but never a crash.
async fn run_drain_loop(state: AppState, interval_secs: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    let mut sink = TracingSink;
    loop {
        interval.tick().await;
        let mut persistence = state.persistence.lock().await;
        match drain_outbox(&mut persistence, &mut sink, 50, Utc::now()) {
            Ok(report) if report.sent > 0 || report.failed > 0 => {
                info!(sent = report.sent, failed = report.failed, "Drained outbox");
            }
            Ok(_) => {}
            Err(err) => warn!(error = %err, "Outbox drain failed"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Tashrif server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        colony: ColonyId::new(args.colony)?,
    };

    tokio::spawn(run_drain_loop(app_state.clone(), args.drain_interval));

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode as HttpStatusCode, header};
    use chrono::TimeZone;
    use tashrif_api::{BatchAssignResponse, SanitaryDaysResponse};
    use tashrif_domain::{ChatChannel, VisitCategory, Visitor};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let colony = ColonyId::new(1).unwrap();
        let mut persistence = Persistence::new_in_memory().unwrap();
        persistence
            .insert_colony(colony, 2, &ChatChannel::new("-100200300"), 10, 60)
            .unwrap();
        persistence
            .insert_booking(
                colony,
                "1-0001",
                "Prisoner",
                VisitCategory::Short,
                Utc.with_ymd_and_hms(2026, 6, 1, 4, 0, 0).unwrap(),
                &[Visitor {
                    full_name: String::from("Visitor"),
                    passport: String::from("AA0000001"),
                }],
                None,
            )
            .unwrap();
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            colony,
        }
    }

    fn json_post(uri: &str, body: &impl Serialize) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_accept_batch_assigns_pending_booking() {
        let app = build_router(test_state());

        let response = app
            .oneshot(json_post("/api/accept-batch", &BatchAssignRequest { count: 5 }))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let batch: BatchAssignResponse = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(batch.assigned_count, 1);
        assert_eq!(batch.assignments[0].room, 1);
    }

    #[tokio::test]
    async fn test_invalid_count_is_bad_request() {
        let app = build_router(test_state());

        let response = app
            .oneshot(json_post("/api/accept-batch", &BatchAssignRequest { count: 0 }))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body_bytes).unwrap();
        assert!(error.error);
        assert!(error.message.contains("count"));
    }

    #[tokio::test]
    async fn test_sanitary_round_trip_over_http() {
        let state = test_state();
        let toggle = SanitaryToggleRequest {
            date: String::from("2099-01-15"),
            action: String::from("add"),
        };

        let response = build_router(state.clone())
            .oneshot(json_post("/api/change-sanitary", &toggle))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/get-sanitary")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let listed: SanitaryDaysResponse = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(listed.dates, vec!["2099-01-15"]);
    }

    #[tokio::test]
    async fn test_unknown_booking_is_not_found() {
        let app = build_router(test_state());

        let response = app
            .oneshot(json_post(
                "/api/accept-booking",
                &AssignBookingRequest {
                    booking_id: 404,
                    assigned_date: String::from("2099-01-15"),
                },
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }
}
