//! Structured error hierarchy for coordination engine operations.
//!
//! Every failed command reports a specific error kind so the presentation
//! layer can render an actionable message. Commands validate before they
//! mutate: a returned error guarantees the entity store is unchanged.

use thiserror::Error;

use fm_core::{
    CarrierRequestId, DisruptionId, RouteCandidateId, ShipmentId, ValidationError,
};

use crate::disruption::DisruptionStatus;
use crate::routing::RouteAvailability;
use crate::shipment::ShipmentStatus;

/// Errors arising from coordination engine commands.
#[derive(Error, Debug)]
pub enum CoordError {
    /// The referenced shipment does not exist in the store.
    #[error("unknown shipment: {0}")]
    UnknownShipment(ShipmentId),

    /// The referenced disruption does not exist (never raised, or already
    /// resolved and removed from the active set).
    #[error("unknown disruption: {0}")]
    UnknownDisruption(DisruptionId),

    /// The referenced route candidate is not in the most recently
    /// generated set for the disruption.
    #[error("unknown route candidate: {0}")]
    UnknownRouteCandidate(RouteCandidateId),

    /// The referenced carrier request is not pending (never submitted, or
    /// already decided — decisions are one-shot).
    #[error("unknown carrier request: {0}")]
    UnknownCarrierRequest(CarrierRequestId),

    /// The selected route candidate is not available for selection.
    #[error("route candidate {candidate} is {availability}, only available routes may be selected")]
    RouteUnavailable {
        candidate: RouteCandidateId,
        availability: RouteAvailability,
    },

    /// Invalid shipment status transition.
    #[error("invalid shipment transition: {from} -> {attempted}")]
    InvalidShipmentTransition {
        from: ShipmentStatus,
        attempted: ShipmentStatus,
    },

    /// Invalid disruption status transition.
    #[error("invalid disruption transition: {from} -> {attempted}")]
    InvalidDisruptionTransition {
        from: DisruptionStatus,
        attempted: DisruptionStatus,
    },

    /// Wizard submission with one or more steps still unfilled.
    #[error("incomplete shipment: missing {missing}")]
    IncompleteShipment { missing: String },

    /// A required field is missing or malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl CoordError {
    /// Machine-readable error code for the API boundary.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownShipment(_) => "UNKNOWN_SHIPMENT",
            Self::UnknownDisruption(_) => "UNKNOWN_DISRUPTION",
            Self::UnknownRouteCandidate(_) => "UNKNOWN_ROUTE_CANDIDATE",
            Self::UnknownCarrierRequest(_) => "UNKNOWN_CARRIER_REQUEST",
            Self::RouteUnavailable { .. } => "ROUTE_UNAVAILABLE",
            Self::InvalidShipmentTransition { .. } | Self::InvalidDisruptionTransition { .. } => {
                "INVALID_TRANSITION"
            }
            Self::IncompleteShipment { .. } => "INCOMPLETE_SHIPMENT",
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }
}
