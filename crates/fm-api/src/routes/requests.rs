//! # Carrier Request Endpoints
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `POST` | `/v1/requests` | `submit_request` |
//! | `GET` | `/v1/requests` | `list_requests` |
//! | `POST` | `/v1/requests/:request_id/decision` | `decide_request` |
//!
//! Decisions are one-shot: accept materializes a pending shipment,
//! decline only removes the request, and either way the request cannot
//! be replayed.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use fm_core::{CarrierRequestId, PartyRef, Priority, TransportMode};
use fm_coord::{CarrierRequest, RequestDecision};

use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request to enqueue a carrier request for a transporter.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SubmitRequestRequest {
    #[schema(value_type = String)]
    pub supplier: PartyRef,
    #[schema(value_type = String)]
    pub customer: PartyRef,
    /// The transporter being asked to carry the load.
    #[schema(value_type = String)]
    pub transporter: PartyRef,
    pub origin: String,
    pub destination: String,
    #[schema(value_type = String)]
    pub mode: TransportMode,
    #[schema(value_type = String)]
    pub priority: Priority,
    pub weight_kg: u32,
    /// Revenue the transporter would earn, whole currency units.
    pub estimated_revenue: u64,
    #[schema(value_type = String)]
    pub pickup_date: NaiveDate,
    #[schema(value_type = String)]
    pub delivery_date: NaiveDate,
}

/// Request carrying a transporter's decision.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct DecideRequestRequest {
    /// "accept" or "decline".
    #[schema(value_type = String)]
    pub decision: RequestDecision,
}

/// Response envelope for a single carrier request.
#[derive(Debug, Serialize, ToSchema)]
pub struct CarrierRequestResponse {
    #[schema(value_type = Object)]
    pub request: serde_json::Value,
}

/// Response envelope for request listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct CarrierRequestListResponse {
    #[schema(value_type = Vec<Object>)]
    pub requests: Vec<serde_json::Value>,
    pub total: usize,
}

/// Response envelope for a decision outcome.
#[derive(Debug, Serialize, ToSchema)]
pub struct DecisionResponse {
    /// The materialized shipment when the decision was an accept.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub shipment: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the carrier request router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/requests", post(submit_request).get(list_requests))
        .route("/v1/requests/:request_id/decision", post(decide_request))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/requests — Enqueue a carrier request.
#[utoipa::path(
    post,
    path = "/v1/requests",
    request_body = SubmitRequestRequest,
    responses(
        (status = 201, description = "Request enqueued", body = CarrierRequestResponse),
        (status = 422, description = "Malformed request", body = crate::error::ErrorBody),
    ),
    tag = "requests"
)]
pub(crate) async fn submit_request(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequestRequest>,
) -> Result<impl IntoResponse, AppError> {
    let request = state.lifecycle.submit_carrier_request(CarrierRequest {
        id: CarrierRequestId::new(),
        supplier: req.supplier,
        customer: req.customer,
        transporter: req.transporter,
        origin: req.origin,
        destination: req.destination,
        mode: req.mode,
        priority: req.priority,
        weight_kg: req.weight_kg,
        estimated_revenue: req.estimated_revenue,
        pickup_date: req.pickup_date,
        delivery_date: req.delivery_date,
        submitted_at: Utc::now(),
    })?;
    Ok((
        StatusCode::CREATED,
        Json(CarrierRequestResponse {
            request: serde_json::to_value(&request)
                .map_err(|e| AppError::Internal(e.to_string()))?,
        }),
    ))
}

/// GET /v1/requests — Pending carrier requests, oldest first.
#[utoipa::path(
    get,
    path = "/v1/requests",
    responses(
        (status = 200, description = "Pending requests", body = CarrierRequestListResponse),
    ),
    tag = "requests"
)]
pub(crate) async fn list_requests(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let requests: Vec<serde_json::Value> = state
        .store
        .list_requests()
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let total = requests.len();
    Ok(Json(CarrierRequestListResponse { requests, total }))
}

/// POST /v1/requests/:request_id/decision — Accept or decline, one-shot.
#[utoipa::path(
    post,
    path = "/v1/requests/{request_id}/decision",
    params(("request_id" = Uuid, Path, description = "Carrier request id")),
    request_body = DecideRequestRequest,
    responses(
        (status = 200, description = "Decision applied", body = DecisionResponse),
        (status = 404, description = "Unknown or already decided request", body = crate::error::ErrorBody),
    ),
    tag = "requests"
)]
pub(crate) async fn decide_request(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(req): Json<DecideRequestRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state
        .lifecycle
        .decide_request(CarrierRequestId::from_uuid(request_id), req.decision)?;
    let shipment = outcome
        .map(|s| serde_json::to_value(&s))
        .transpose()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(DecisionResponse { shipment }))
}
