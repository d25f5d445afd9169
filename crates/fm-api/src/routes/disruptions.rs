//! # Disruption and Reroute Endpoints
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `POST` | `/v1/disruptions` | `raise_disruption` |
//! | `GET` | `/v1/disruptions` | `list_disruptions` |
//! | `POST` | `/v1/disruptions/:disruption_id/acknowledge` | `acknowledge` |
//! | `POST` | `/v1/disruptions/:disruption_id/escalate` | `escalate` |
//! | `POST` | `/v1/disruptions/:disruption_id/resolve` | `resolve` |
//! | `POST` | `/v1/disruptions/:disruption_id/customer-notified` | `customer_notified` |
//! | `POST` | `/v1/disruptions/:disruption_id/reroute` | `request_reroute` |
//! | `POST` | `/v1/disruptions/:disruption_id/reroute/apply` | `apply_reroute` |
//! | `DELETE` | `/v1/disruptions/:disruption_id/reroute` | `abandon_reroute` |
//!
//! Reroute sessions are transient: requesting one generates candidates,
//! applying commits the selection atomically, deleting abandons with no
//! state change.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use fm_core::{DisruptionId, HoursRange, RouteCandidateId, Severity, ShipmentId};
use fm_coord::DisruptionAlert;

use crate::error::AppError;
use crate::routes::RoleQuery;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request to raise a disruption against a shipment.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RaiseDisruptionRequest {
    pub shipment_id: Uuid,
    /// Free-form classification, e.g. "Severe Weather Alert".
    pub kind: String,
    pub description: String,
    /// Estimated delay, lower bound in hours.
    pub delay_min_hours: u32,
    /// Estimated delay, upper bound in hours.
    pub delay_max_hours: u32,
    /// "low", "medium", or "high".
    #[schema(value_type = String)]
    pub severity: Severity,
    pub location: String,
    /// Suggested operator actions, in recommendation order.
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Request to resolve a disruption.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ResolveDisruptionRequest {
    /// Operator note recorded on resolution.
    #[serde(default)]
    pub note: Option<String>,
}

/// Request to commit a route selection.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ApplyRerouteRequest {
    pub candidate_id: Uuid,
}

/// Response envelope for single-disruption operations.
#[derive(Debug, Serialize, ToSchema)]
pub struct DisruptionResponse {
    #[schema(value_type = Object)]
    pub disruption: serde_json::Value,
}

impl DisruptionResponse {
    fn try_from(alert: &DisruptionAlert) -> Result<Self, AppError> {
        Ok(Self {
            disruption: serde_json::to_value(alert)
                .map_err(|e| AppError::Internal(e.to_string()))?,
        })
    }
}

/// Response envelope for disruption listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct DisruptionListResponse {
    #[schema(value_type = Vec<Object>)]
    pub disruptions: Vec<serde_json::Value>,
    pub total: usize,
}

/// Response envelope for a reroute session's candidate set.
#[derive(Debug, Serialize, ToSchema)]
pub struct RouteCandidatesResponse {
    #[schema(value_type = Vec<Object>)]
    pub candidates: Vec<serde_json::Value>,
}

/// Response envelope for a committed reroute.
#[derive(Debug, Serialize, ToSchema)]
pub struct RerouteAppliedResponse {
    /// The shipment carrying the committed route figures.
    #[schema(value_type = Object)]
    pub shipment: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the disruption router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/disruptions",
            post(raise_disruption).get(list_disruptions),
        )
        .route(
            "/v1/disruptions/:disruption_id/acknowledge",
            post(acknowledge),
        )
        .route("/v1/disruptions/:disruption_id/escalate", post(escalate))
        .route("/v1/disruptions/:disruption_id/resolve", post(resolve))
        .route(
            "/v1/disruptions/:disruption_id/customer-notified",
            post(customer_notified),
        )
        .route(
            "/v1/disruptions/:disruption_id/reroute",
            post(request_reroute).delete(abandon_reroute),
        )
        .route(
            "/v1/disruptions/:disruption_id/reroute/apply",
            post(apply_reroute),
        )
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/disruptions — Raise a disruption alert.
#[utoipa::path(
    post,
    path = "/v1/disruptions",
    request_body = RaiseDisruptionRequest,
    responses(
        (status = 201, description = "Disruption raised", body = DisruptionResponse),
        (status = 404, description = "Unknown shipment", body = crate::error::ErrorBody),
    ),
    tag = "disruptions"
)]
pub(crate) async fn raise_disruption(
    State(state): State<AppState>,
    Json(req): Json<RaiseDisruptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let delay = HoursRange::new(req.delay_min_hours, req.delay_max_hours)
        .map_err(fm_coord::CoordError::from)?;
    let alert = state.disruptions.raise(
        ShipmentId::from_uuid(req.shipment_id),
        req.kind,
        req.description,
        delay,
        req.severity,
        req.location,
        req.suggestions,
    )?;
    Ok((
        StatusCode::CREATED,
        Json(DisruptionResponse::try_from(&alert)?),
    ))
}

/// GET /v1/disruptions — Active disruptions visible to a role.
#[utoipa::path(
    get,
    path = "/v1/disruptions",
    params(RoleQuery),
    responses(
        (status = 200, description = "Active disruptions", body = DisruptionListResponse),
    ),
    tag = "disruptions"
)]
pub(crate) async fn list_disruptions(
    State(state): State<AppState>,
    Query(query): Query<RoleQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = query.filter()?;
    let disruptions: Vec<serde_json::Value> = state
        .store
        .list_active_disruptions(&filter)
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let total = disruptions.len();
    Ok(Json(DisruptionListResponse { disruptions, total }))
}

/// POST /v1/disruptions/:disruption_id/acknowledge
#[utoipa::path(
    post,
    path = "/v1/disruptions/{disruption_id}/acknowledge",
    params(("disruption_id" = Uuid, Path, description = "Disruption id")),
    responses(
        (status = 200, description = "Acknowledged", body = DisruptionResponse),
        (status = 409, description = "Not acknowledgeable", body = crate::error::ErrorBody),
    ),
    tag = "disruptions"
)]
pub(crate) async fn acknowledge(
    State(state): State<AppState>,
    Path(disruption_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let alert = state
        .disruptions
        .acknowledge(DisruptionId::from_uuid(disruption_id))?;
    Ok(Json(DisruptionResponse::try_from(&alert)?))
}

/// POST /v1/disruptions/:disruption_id/escalate
#[utoipa::path(
    post,
    path = "/v1/disruptions/{disruption_id}/escalate",
    params(("disruption_id" = Uuid, Path, description = "Disruption id")),
    responses(
        (status = 200, description = "Escalated", body = DisruptionResponse),
        (status = 404, description = "Unknown disruption", body = crate::error::ErrorBody),
    ),
    tag = "disruptions"
)]
pub(crate) async fn escalate(
    State(state): State<AppState>,
    Path(disruption_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let alert = state
        .disruptions
        .escalate(DisruptionId::from_uuid(disruption_id))?;
    Ok(Json(DisruptionResponse::try_from(&alert)?))
}

/// POST /v1/disruptions/:disruption_id/resolve
#[utoipa::path(
    post,
    path = "/v1/disruptions/{disruption_id}/resolve",
    params(("disruption_id" = Uuid, Path, description = "Disruption id")),
    request_body = ResolveDisruptionRequest,
    responses(
        (status = 200, description = "Resolved and removed from the active set", body = DisruptionResponse),
        (status = 404, description = "Unknown disruption", body = crate::error::ErrorBody),
    ),
    tag = "disruptions"
)]
pub(crate) async fn resolve(
    State(state): State<AppState>,
    Path(disruption_id): Path<Uuid>,
    Json(req): Json<ResolveDisruptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let note = req.note.unwrap_or_else(|| "resolved by operator".to_string());
    let alert = state
        .disruptions
        .resolve(DisruptionId::from_uuid(disruption_id), note)?;
    Ok(Json(DisruptionResponse::try_from(&alert)?))
}

/// POST /v1/disruptions/:disruption_id/customer-notified
#[utoipa::path(
    post,
    path = "/v1/disruptions/{disruption_id}/customer-notified",
    params(("disruption_id" = Uuid, Path, description = "Disruption id")),
    responses(
        (status = 200, description = "Customer contact recorded", body = DisruptionResponse),
        (status = 404, description = "Unknown disruption", body = crate::error::ErrorBody),
    ),
    tag = "disruptions"
)]
pub(crate) async fn customer_notified(
    State(state): State<AppState>,
    Path(disruption_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let alert = state
        .disruptions
        .mark_customer_notified(DisruptionId::from_uuid(disruption_id))?;
    Ok(Json(DisruptionResponse::try_from(&alert)?))
}

/// POST /v1/disruptions/:disruption_id/reroute — Open a reroute session.
#[utoipa::path(
    post,
    path = "/v1/disruptions/{disruption_id}/reroute",
    params(("disruption_id" = Uuid, Path, description = "Disruption id")),
    responses(
        (status = 200, description = "Candidate routes", body = RouteCandidatesResponse),
        (status = 404, description = "Unknown disruption", body = crate::error::ErrorBody),
    ),
    tag = "reroute"
)]
pub(crate) async fn request_reroute(
    State(state): State<AppState>,
    Path(disruption_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let candidates = state
        .reroute
        .request_reroute(DisruptionId::from_uuid(disruption_id))?;
    let candidates: Vec<serde_json::Value> = candidates
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(RouteCandidatesResponse { candidates }))
}

/// POST /v1/disruptions/:disruption_id/reroute/apply — Commit a selection.
#[utoipa::path(
    post,
    path = "/v1/disruptions/{disruption_id}/reroute/apply",
    params(("disruption_id" = Uuid, Path, description = "Disruption id")),
    request_body = ApplyRerouteRequest,
    responses(
        (status = 200, description = "Reroute committed", body = RerouteAppliedResponse),
        (status = 404, description = "Unknown disruption or candidate", body = crate::error::ErrorBody),
        (status = 409, description = "Candidate not available", body = crate::error::ErrorBody),
    ),
    tag = "reroute"
)]
pub(crate) async fn apply_reroute(
    State(state): State<AppState>,
    Path(disruption_id): Path<Uuid>,
    Json(req): Json<ApplyRerouteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let shipment = state.reroute.apply_reroute(
        DisruptionId::from_uuid(disruption_id),
        RouteCandidateId::from_uuid(req.candidate_id),
    )?;
    Ok(Json(RerouteAppliedResponse {
        shipment: serde_json::to_value(&shipment)
            .map_err(|e| AppError::Internal(e.to_string()))?,
    }))
}

/// DELETE /v1/disruptions/:disruption_id/reroute — Abandon the session.
#[utoipa::path(
    delete,
    path = "/v1/disruptions/{disruption_id}/reroute",
    params(("disruption_id" = Uuid, Path, description = "Disruption id")),
    responses(
        (status = 204, description = "Session dropped, no state change"),
    ),
    tag = "reroute"
)]
pub(crate) async fn abandon_reroute(
    State(state): State<AppState>,
    Path(disruption_id): Path<Uuid>,
) -> impl IntoResponse {
    state.reroute.abandon(DisruptionId::from_uuid(disruption_id));
    StatusCode::NO_CONTENT
}
