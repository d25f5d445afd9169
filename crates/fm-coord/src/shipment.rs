//! # Shipment Records and Lifecycle States
//!
//! The canonical shipment record shared by all three roles, and the
//! status state machine governing its progression.
//!
//! ## Design Choice: Validated Enum over Typestate
//!
//! Shipment status is a runtime-checked enum rather than a typestate.
//! Shipments are stored in a shared map and serialized across the API
//! boundary, where the state is not known at compile time; a validated
//! enum serializes directly via serde and keeps the transition table in
//! one place ([`ShipmentStatus::valid_transitions`]).
//!
//! ## Transition Graph
//!
//! ```text
//! Pending ──▶ Dispatched ──▶ InTransit ──▶ Delivered
//!                 │              │  ▲           ▲
//!                 ▼              ▼  │           │
//!               Delayed ◀────────┘  └────── Delayed
//! ```
//!
//! `Delivered` is terminal. The main chain is strictly forward — a
//! delivered shipment can never return to `pending`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fm_core::{HoursRange, PartyRef, Priority, RiskLevel, ShipmentId, TransportMode};

use crate::error::CoordError;

// ---------------------------------------------------------------------------
// Shipment status
// ---------------------------------------------------------------------------

/// The lifecycle stage of a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShipmentStatus {
    /// Created, awaiting dispatch.
    Pending,
    /// Handed to the transporter, not yet moving.
    Dispatched,
    /// Moving toward the destination.
    InTransit,
    /// Held up by a disruption; can resume or complete.
    Delayed,
    /// Arrived. Terminal state.
    Delivered,
}

impl ShipmentStatus {
    /// The canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Dispatched => "dispatched",
            Self::InTransit => "in-transit",
            Self::Delayed => "delayed",
            Self::Delivered => "delivered",
        }
    }

    /// Whether this state is terminal (no further transitions allowed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Valid target states from this state.
    pub fn valid_transitions(&self) -> &'static [ShipmentStatus] {
        match self {
            Self::Pending => &[Self::Dispatched],
            Self::Dispatched => &[Self::InTransit, Self::Delayed],
            Self::InTransit => &[Self::Delivered, Self::Delayed],
            Self::Delayed => &[Self::InTransit, Self::Delivered],
            Self::Delivered => &[],
        }
    }

    /// The minimum progress value a shipment in this state reports.
    ///
    /// Advancing a status raises progress to at least this floor;
    /// `Delayed` keeps whatever progress the shipment had.
    pub fn progress_floor(&self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Dispatched => Some(25),
            Self::InTransit => Some(50),
            Self::Delayed => None,
            Self::Delivered => Some(100),
        }
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validate a status transition, returning the target state on success.
pub fn validate_status_transition(
    from: ShipmentStatus,
    attempted: ShipmentStatus,
) -> Result<ShipmentStatus, CoordError> {
    if from.valid_transitions().contains(&attempted) {
        Ok(attempted)
    } else {
        Err(CoordError::InvalidShipmentTransition { from, attempted })
    }
}

// ---------------------------------------------------------------------------
// Rating
// ---------------------------------------------------------------------------

/// A customer rating recorded against a delivered shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Score from 1 (worst) to 5 (best).
    pub score: u8,
    /// Optional free-form feedback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Shipment record
// ---------------------------------------------------------------------------

/// Canonical shipment record.
///
/// Owned by the entity store; all roles see projections of this record.
/// Cost is whole currency units and carbon is kilograms — both unsigned,
/// so the non-negativity invariants hold by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    pub id: ShipmentId,
    /// The supplier that issued the shipment.
    pub supplier: PartyRef,
    /// The customer the shipment is addressed to.
    pub customer: PartyRef,
    /// The transporter carrying the shipment.
    pub transporter: PartyRef,
    pub mode: TransportMode,
    pub origin: String,
    pub destination: String,
    /// Human-readable route description (e.g. "NYC → LA", or the name of
    /// a committed alternative route).
    pub route: String,
    pub status: ShipmentStatus,
    /// Completion percentage, 0–100.
    pub progress: u8,
    pub eta: HoursRange,
    /// Monetary cost in whole currency units.
    pub cost: u64,
    /// Carbon footprint in kilograms.
    pub carbon_kg: u32,
    pub risk: RiskLevel,
    /// Likelihood of disruption, 0–100.
    pub disruption_probability: u8,
    pub weight_kg: u32,
    pub priority: Priority,
    /// Assigned vehicle, if one has been allocated yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
    /// Customer rating, present once submitted after delivery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shipment {
    /// Check the record-level invariants.
    ///
    /// The store runs this on every write so that no partial-field merge
    /// can leave an inconsistent shipment behind.
    pub fn validate(&self) -> Result<(), CoordError> {
        if self.progress > 100 {
            return Err(fm_core::ValidationError::new(
                "progress",
                "must be between 0 and 100",
            )
            .into());
        }
        if self.disruption_probability > 100 {
            return Err(fm_core::ValidationError::new(
                "disruption_probability",
                "must be between 0 and 100",
            )
            .into());
        }
        if self.status == ShipmentStatus::Delivered && self.progress != 100 {
            return Err(fm_core::ValidationError::new(
                "progress",
                "a delivered shipment must report 100% progress",
            )
            .into());
        }
        if let Some(rating) = &self.rating {
            if !(1..=5).contains(&rating.score) {
                return Err(
                    fm_core::ValidationError::new("rating", "must be between 1 and 5").into(),
                );
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
