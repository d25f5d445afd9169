//! # Shipment Endpoints
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `POST` | `/v1/shipments` | `create_shipment` |
//! | `GET` | `/v1/shipments` | `list_shipments` |
//! | `GET` | `/v1/shipments/:shipment_id` | `get_shipment` |
//! | `POST` | `/v1/shipments/:shipment_id/status` | `update_status` |
//! | `POST` | `/v1/shipments/:shipment_id/rating` | `submit_rating` |
//!
//! Creation replays the request through the three-step wizard state
//! machine, so the API enforces exactly the same step validation as an
//! interactive client walking the steps one at a time.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use fm_core::{PartyRef, Priority, ShipmentId, TransportMode};
use fm_coord::{
    CoordError, Shipment, ShipmentDetails, ShipmentStatus, ShipmentWizard,
};

use crate::error::AppError;
use crate::routes::RoleQuery;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request to create a new shipment.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateShipmentRequest {
    /// The issuing supplier.
    #[schema(value_type = String)]
    pub supplier: PartyRef,
    /// The addressed customer.
    #[schema(value_type = String)]
    pub customer: PartyRef,
    /// The carrying transporter.
    #[schema(value_type = String)]
    pub transporter: PartyRef,
    pub origin: String,
    pub destination: String,
    pub weight_kg: u32,
    /// "standard", "high", or "urgent".
    #[schema(value_type = String)]
    pub priority: Priority,
    /// "truck", "ship", "air", or "electric-truck".
    #[schema(value_type = String)]
    pub mode: TransportMode,
}

/// Request to advance a shipment's status.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateStatusRequest {
    /// Target status, e.g. "dispatched" or "in-transit".
    #[schema(value_type = String)]
    pub status: ShipmentStatus,
}

/// Request to rate a delivered shipment.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SubmitRatingRequest {
    /// Score from 1 to 5.
    pub score: u8,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Response envelope for single-shipment operations.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShipmentResponse {
    #[schema(value_type = Object)]
    pub shipment: serde_json::Value,
}

impl ShipmentResponse {
    fn try_from(shipment: &Shipment) -> Result<Self, AppError> {
        Ok(Self {
            shipment: serde_json::to_value(shipment)
                .map_err(|e| AppError::Internal(e.to_string()))?,
        })
    }
}

/// Response envelope for shipment listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShipmentListResponse {
    #[schema(value_type = Vec<Object>)]
    pub shipments: Vec<serde_json::Value>,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the shipment router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/shipments", post(create_shipment).get(list_shipments))
        .route("/v1/shipments/:shipment_id", get(get_shipment))
        .route("/v1/shipments/:shipment_id/status", post(update_status))
        .route("/v1/shipments/:shipment_id/rating", post(submit_rating))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/shipments — Create a shipment through the wizard state machine.
#[utoipa::path(
    post,
    path = "/v1/shipments",
    request_body = CreateShipmentRequest,
    responses(
        (status = 201, description = "Shipment created", body = ShipmentResponse),
        (status = 422, description = "Missing or malformed step data", body = crate::error::ErrorBody),
    ),
    tag = "shipments"
)]
pub(crate) async fn create_shipment(
    State(state): State<AppState>,
    Json(req): Json<CreateShipmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut wizard = ShipmentWizard::new(req.supplier);
    wizard.select_customer(req.customer);
    wizard.select_transporter(req.transporter)?;
    wizard.enter_details(ShipmentDetails {
        origin: req.origin,
        destination: req.destination,
        weight_kg: req.weight_kg,
        priority: req.priority,
        mode: req.mode,
    })?;
    let draft = wizard.submit()?;

    let shipment = state.lifecycle.create_shipment(draft)?;
    Ok((
        StatusCode::CREATED,
        Json(ShipmentResponse::try_from(&shipment)?),
    ))
}

/// GET /v1/shipments — List shipments visible to a role.
#[utoipa::path(
    get,
    path = "/v1/shipments",
    params(RoleQuery),
    responses(
        (status = 200, description = "Shipments visible to the role", body = ShipmentListResponse),
    ),
    tag = "shipments"
)]
pub(crate) async fn list_shipments(
    State(state): State<AppState>,
    Query(query): Query<RoleQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = query.filter()?;
    let shipments: Vec<serde_json::Value> = state
        .store
        .list_shipments(&filter)
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let total = shipments.len();
    Ok(Json(ShipmentListResponse { shipments, total }))
}

/// GET /v1/shipments/:shipment_id — Fetch one shipment.
#[utoipa::path(
    get,
    path = "/v1/shipments/{shipment_id}",
    params(("shipment_id" = Uuid, Path, description = "Shipment id")),
    responses(
        (status = 200, description = "The shipment", body = ShipmentResponse),
        (status = 404, description = "Unknown shipment", body = crate::error::ErrorBody),
    ),
    tag = "shipments"
)]
pub(crate) async fn get_shipment(
    State(state): State<AppState>,
    Path(shipment_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let id = ShipmentId::from_uuid(shipment_id);
    let shipment = state
        .store
        .get_shipment(&id)
        .ok_or(CoordError::UnknownShipment(id))?;
    Ok(Json(ShipmentResponse::try_from(&shipment)?))
}

/// POST /v1/shipments/:shipment_id/status — Advance the lifecycle status.
#[utoipa::path(
    post,
    path = "/v1/shipments/{shipment_id}/status",
    params(("shipment_id" = Uuid, Path, description = "Shipment id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status advanced", body = ShipmentResponse),
        (status = 404, description = "Unknown shipment", body = crate::error::ErrorBody),
        (status = 409, description = "Invalid transition", body = crate::error::ErrorBody),
    ),
    tag = "shipments"
)]
pub(crate) async fn update_status(
    State(state): State<AppState>,
    Path(shipment_id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let shipment = state
        .lifecycle
        .update_status(ShipmentId::from_uuid(shipment_id), req.status)?;
    Ok(Json(ShipmentResponse::try_from(&shipment)?))
}

/// POST /v1/shipments/:shipment_id/rating — Rate a delivered shipment.
#[utoipa::path(
    post,
    path = "/v1/shipments/{shipment_id}/rating",
    params(("shipment_id" = Uuid, Path, description = "Shipment id")),
    request_body = SubmitRatingRequest,
    responses(
        (status = 200, description = "Rating recorded", body = ShipmentResponse),
        (status = 404, description = "Unknown shipment", body = crate::error::ErrorBody),
        (status = 422, description = "Not ratable", body = crate::error::ErrorBody),
    ),
    tag = "shipments"
)]
pub(crate) async fn submit_rating(
    State(state): State<AppState>,
    Path(shipment_id): Path<Uuid>,
    Json(req): Json<SubmitRatingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let shipment = state.lifecycle.submit_rating(
        ShipmentId::from_uuid(shipment_id),
        req.score,
        req.feedback,
    )?;
    Ok(Json(ShipmentResponse::try_from(&shipment)?))
}
