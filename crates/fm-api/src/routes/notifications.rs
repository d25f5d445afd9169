//! # Notification Polling Endpoint
//!
//! The presentation layer polls here instead of the core running timers;
//! expired records simply stop appearing.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::state::AppState;

/// Response envelope for active notifications.
#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationListResponse {
    #[schema(value_type = Vec<Object>)]
    pub notifications: Vec<serde_json::Value>,
    pub total: usize,
}

/// Build the notification router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/notifications", get(list_notifications))
}

/// GET /v1/notifications — Notifications not yet expired.
#[utoipa::path(
    get,
    path = "/v1/notifications",
    responses(
        (status = 200, description = "Active notifications, oldest first", body = NotificationListResponse),
    ),
    tag = "notifications"
)]
pub(crate) async fn list_notifications(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    // Opportunistic cleanup: polling is the only reader, so expired
    // records can be dropped here.
    state.notifications.prune_expired(now);
    let notifications: Vec<serde_json::Value> = state
        .notifications
        .active(now)
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let total = notifications.len();
    Ok(Json(NotificationListResponse {
        notifications,
        total,
    }))
}
