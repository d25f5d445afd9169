//! # Entity Store
//!
//! Canonical in-memory owner of shipment and disruption records, plus the
//! pending carrier request queue. Single source of truth for every role's
//! view.
//!
//! All reads hand out clones — consumers never hold references into the
//! maps. All writes are whole-record upserts re-validated against the
//! record invariants, so a failed command leaves the store exactly as it
//! was.

use dashmap::DashMap;

use fm_core::{CarrierRequestId, DisruptionId, PartyRef, ShipmentId};

use crate::disruption::DisruptionAlert;
use crate::error::CoordError;
use crate::lifecycle::CarrierRequest;
use crate::shipment::Shipment;

// ---------------------------------------------------------------------------
// Role projections
// ---------------------------------------------------------------------------

/// Which slice of the store a caller is entitled to see.
///
/// Suppliers see shipments they issued, transporters see shipments
/// assigned to them, customers see shipments addressed to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleFilter {
    /// Operator view: everything.
    All,
    Supplier(PartyRef),
    Transporter(PartyRef),
    Customer(PartyRef),
}

impl RoleFilter {
    /// Whether the given shipment belongs in this projection.
    pub fn matches(&self, shipment: &Shipment) -> bool {
        match self {
            Self::All => true,
            Self::Supplier(party) => shipment.supplier == *party,
            Self::Transporter(party) => shipment.transporter == *party,
            Self::Customer(party) => shipment.customer == *party,
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// In-memory canonical collections, keyed by id.
pub struct EntityStore {
    shipments: DashMap<ShipmentId, Shipment>,
    disruptions: DashMap<DisruptionId, DisruptionAlert>,
    requests: DashMap<CarrierRequestId, CarrierRequest>,
}

impl EntityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            shipments: DashMap::new(),
            disruptions: DashMap::new(),
            requests: DashMap::new(),
        }
    }

    // -- Shipments ----------------------------------------------------------

    /// Insert or replace a shipment, re-validating record invariants.
    ///
    /// Rejected records leave the previous version in place.
    pub fn upsert_shipment(&self, shipment: Shipment) -> Result<(), CoordError> {
        shipment.validate()?;
        self.shipments.insert(shipment.id, shipment);
        Ok(())
    }

    /// Get a shipment by id.
    pub fn get_shipment(&self, id: &ShipmentId) -> Option<Shipment> {
        self.shipments.get(id).map(|entry| entry.value().clone())
    }

    /// Shipments visible to the given role, oldest first.
    pub fn list_shipments(&self, filter: &RoleFilter) -> Vec<Shipment> {
        let mut out: Vec<Shipment> = self
            .shipments
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        out.sort_by_key(|s| (s.created_at, *s.id.as_uuid()));
        out
    }

    /// Number of shipments in the store, across all roles.
    pub fn shipment_count(&self) -> usize {
        self.shipments.len()
    }

    // -- Disruptions --------------------------------------------------------

    /// Insert or replace a disruption alert.
    ///
    /// Every alert must reference a shipment that exists; dangling
    /// references are rejected with [`CoordError::UnknownShipment`].
    pub fn upsert_disruption(&self, alert: DisruptionAlert) -> Result<(), CoordError> {
        if !self.shipments.contains_key(&alert.shipment_id) {
            return Err(CoordError::UnknownShipment(alert.shipment_id));
        }
        self.disruptions.insert(alert.id, alert);
        Ok(())
    }

    /// Get a disruption by id.
    pub fn get_disruption(&self, id: &DisruptionId) -> Option<DisruptionAlert> {
        self.disruptions.get(id).map(|entry| entry.value().clone())
    }

    /// Remove a disruption from the active set, returning it if present.
    pub fn remove_disruption(&self, id: &DisruptionId) -> Option<DisruptionAlert> {
        self.disruptions.remove(id).map(|(_, alert)| alert)
    }

    /// Non-terminal disruptions whose shipment is visible to the given
    /// role, oldest first.
    pub fn list_active_disruptions(&self, filter: &RoleFilter) -> Vec<DisruptionAlert> {
        let mut out: Vec<DisruptionAlert> = self
            .disruptions
            .iter()
            .filter(|entry| !entry.value().status.is_terminal())
            .filter(|entry| match filter {
                RoleFilter::All => true,
                _ => self
                    .get_shipment(&entry.value().shipment_id)
                    .is_some_and(|s| filter.matches(&s)),
            })
            .map(|entry| entry.value().clone())
            .collect();
        out.sort_by_key(|d| (d.detected_at, *d.id.as_uuid()));
        out
    }

    // -- Carrier requests ---------------------------------------------------

    /// Enqueue a pending carrier request.
    pub fn push_request(&self, request: CarrierRequest) {
        self.requests.insert(request.id, request);
    }

    /// Remove and return a pending request. Decisions are one-shot: once
    /// taken, the request cannot be replayed.
    pub fn take_request(&self, id: &CarrierRequestId) -> Option<CarrierRequest> {
        self.requests.remove(id).map(|(_, request)| request)
    }

    /// Pending requests, oldest first.
    pub fn list_requests(&self) -> Vec<CarrierRequest> {
        let mut out: Vec<CarrierRequest> = self
            .requests
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        out.sort_by_key(|r| (r.submitted_at, *r.id.as_uuid()));
        out
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("shipments", &self.shipments.len())
            .field("disruptions", &self.disruptions.len())
            .field("requests", &self.requests.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
