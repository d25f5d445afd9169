//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps engine errors from fm-coord to HTTP status codes and returns a
//! JSON error body with a machine-readable code, so the presentation
//! layer can render an actionable message instead of a generic failure.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use fm_coord::CoordError;

/// Structured JSON error response body.
///
/// All error responses use this format for consistency across the API
/// surface.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "UNKNOWN_SHIPMENT",
    /// "ROUTE_UNAVAILABLE", "INVALID_TRANSITION").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only where a handler attaches them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Domain error from the coordination engine.
    #[error(transparent)]
    Coord(#[from] CoordError),

    /// Malformed query parameter combination (e.g. a role filter without
    /// a party).
    #[error("invalid query: {0}")]
    Query(String),

    /// Internal server error (500). Message is logged but not returned
    /// to clients.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Coord(err) => {
                let status = match err {
                    CoordError::UnknownShipment(_)
                    | CoordError::UnknownDisruption(_)
                    | CoordError::UnknownRouteCandidate(_)
                    | CoordError::UnknownCarrierRequest(_) => StatusCode::NOT_FOUND,
                    CoordError::RouteUnavailable { .. }
                    | CoordError::InvalidShipmentTransition { .. }
                    | CoordError::InvalidDisruptionTransition { .. } => StatusCode::CONFLICT,
                    CoordError::IncompleteShipment { .. } | CoordError::Validation(_) => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                };
                (status, err.code())
            }
            Self::Query(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                "An internal error occurred".to_string()
            }
            other => {
                if status == StatusCode::CONFLICT {
                    tracing::warn!(error = %other, "command rejected");
                }
                other.to_string()
            }
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fm_core::ShipmentId;

    #[test]
    fn unknown_entities_map_to_not_found() {
        let err = AppError::from(CoordError::UnknownShipment(ShipmentId::new()));
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "UNKNOWN_SHIPMENT");
    }

    #[test]
    fn transition_conflicts_map_to_409() {
        let err = AppError::from(CoordError::InvalidShipmentTransition {
            from: fm_coord::ShipmentStatus::Delivered,
            attempted: fm_coord::ShipmentStatus::Pending,
        });
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "INVALID_TRANSITION");
    }

    #[test]
    fn validation_maps_to_422() {
        let err = AppError::from(CoordError::Validation(fm_core::ValidationError::new(
            "priority",
            "select a priority before submitting",
        )));
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "VALIDATION_ERROR");
    }
}
