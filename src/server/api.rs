//! HTTP trigger handlers
//!
//! A scheduler calls `/` at the moment bookings open. The response body is
//! the run's result record; the status code tells the scheduler whether to
//! flag the invocation as failed.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::booking::{resolve_target, BookingOrchestrator};
use crate::models::AttemptResult;

use super::trigger::AppState;

/// Optional overrides accepted by the trigger
#[derive(Debug, Default, Deserialize)]
pub struct TriggerParams {
    /// Time range, `HH:MM-HH:MM`
    pub schedule: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Create the trigger router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(trigger_booking).post(trigger_booking))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Map a result onto the status code the scheduler sees
pub fn status_for(result: &AttemptResult) -> StatusCode {
    if result.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

async fn trigger_booking(
    State(state): State<AppState>,
    Query(params): Query<TriggerParams>,
) -> impl IntoResponse {
    let schedule = params
        .schedule
        .unwrap_or_else(|| state.config.booking.schedule.clone());

    let slot = match resolve_target(None, &schedule, state.config.booking.day_offset) {
        Ok(slot) => slot,
        Err(rejected) => return (StatusCode::BAD_REQUEST, Json(rejected)),
    };

    tracing::info!(
        date = %slot.date_str(),
        schedule = %schedule,
        "Booking triggered"
    );

    let result = match BookingOrchestrator::from_config(&state.config, state.credentials.clone()) {
        Ok(orchestrator) => orchestrator.run(slot.date, &schedule).await,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start booking session");
            AttemptResult::failed(e.to_string(), 0).for_request(slot.date_str(), schedule)
        }
    };

    (status_for(&result), Json(result))
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_result() {
        let ok = AttemptResult::booked("2026-10-25", "20:00-21:00", 1);
        assert_eq!(status_for(&ok), StatusCode::OK);

        let failed = AttemptResult::failed("Login failed for ana", 0);
        assert_eq!(status_for(&failed), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
