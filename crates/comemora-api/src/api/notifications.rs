// Notification trigger HTTP routes
//
// The check is driven externally (cron, scheduler, operator). Both routes run
// the same check; GET /trigger-check exists for tools that can only send GETs.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use comemora_core::NotifyReport;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common::{service_error, ApiError, ErrorResponse};
use super::AppState;

/// Summary of one check-and-notify run
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckResponse {
    /// Date treated as today (server local time)
    #[schema(example = "2026-06-15")]
    pub date: String,
    /// Date checked for important events
    #[schema(example = "2026-06-18")]
    pub upcoming_date: String,
    pub due_today: usize,
    pub upcoming_important: usize,
    /// Notifications attempted (delivered + failed)
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
}

impl From<NotifyReport> for CheckResponse {
    fn from(report: NotifyReport) -> Self {
        Self {
            date: report.date.to_string(),
            upcoming_date: report.upcoming_date.to_string(),
            due_today: report.due_today,
            upcoming_important: report.upcoming_important,
            attempted: report.attempted(),
            delivered: report.delivered,
            failed: report.failed,
        }
    }
}

/// Create notification routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/notifications/check", post(check_and_notify))
        .route("/trigger-check", get(trigger_check))
        .with_state(state)
}

/// POST /v1/notifications/check - Notify today's and upcoming important events
///
/// Delivery failures are counted in the response, not reported as errors.
#[utoipa::path(
    post,
    path = "/v1/notifications/check",
    responses(
        (status = 200, description = "Check finished", body = CheckResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
        (status = 503, description = "Server shutting down", body = ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn check_and_notify(
    State(state): State<AppState>,
) -> Result<Json<CheckResponse>, ApiError> {
    let report = state
        .service
        .check_and_notify(&state.request_token())
        .await
        .map_err(|e| service_error("check and notify", e))?;

    Ok(Json(report.into()))
}

/// GET /trigger-check - Same as POST /v1/notifications/check
#[utoipa::path(
    get,
    path = "/trigger-check",
    responses(
        (status = 200, description = "Check finished", body = CheckResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
        (status = 503, description = "Server shutting down", body = ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn trigger_check(state: State<AppState>) -> Result<Json<CheckResponse>, ApiError> {
    check_and_notify(state).await
}
