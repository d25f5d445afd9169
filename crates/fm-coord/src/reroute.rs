//! # Reroute Resolver
//!
//! Commits a route selection: the affected shipment takes the candidate's
//! route, ETA, cost, carbon, and risk, and the disruption that prompted
//! the reroute is retired — atomically, all-or-nothing.
//!
//! Candidate sets are transient. A reroute request generates one set per
//! disruption and caches it until a selection is committed or the request
//! is abandoned; abandonment is free and leaves no partial writes.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;

use fm_core::{DisruptionId, RouteCandidateId};

use crate::error::CoordError;
use crate::notify::{NotificationKind, NotificationSink};
use crate::routing::{RouteAvailability, RouteCandidate, RouteCandidateSource};
use crate::shipment::Shipment;
use crate::store::EntityStore;

/// Applies reroute decisions to disrupted shipments.
pub struct RerouteResolver {
    store: Arc<EntityStore>,
    source: Arc<dyn RouteCandidateSource>,
    notifier: Arc<dyn NotificationSink>,
    /// Most recently generated candidate set per disruption.
    sessions: DashMap<DisruptionId, Vec<RouteCandidate>>,
}

impl RerouteResolver {
    pub fn new(
        store: Arc<EntityStore>,
        source: Arc<dyn RouteCandidateSource>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            store,
            source,
            notifier,
            sessions: DashMap::new(),
        }
    }

    /// Generate alternative routes for a disruption and open a reroute
    /// session. A repeated request replaces the previous set.
    pub fn request_reroute(
        &self,
        disruption_id: DisruptionId,
    ) -> Result<Vec<RouteCandidate>, CoordError> {
        let disruption = self
            .store
            .get_disruption(&disruption_id)
            .ok_or(CoordError::UnknownDisruption(disruption_id))?;
        let candidates = self.source.generate(&disruption);
        debug_assert!(!candidates.is_empty(), "route source returned no candidates");
        self.sessions.insert(disruption_id, candidates.clone());
        tracing::info!(
            disruption = %disruption_id,
            candidates = candidates.len(),
            "reroute session opened"
        );
        Ok(candidates)
    }

    /// Commit a selection from the open session.
    ///
    /// Validate-then-write: every lookup runs before the first mutation,
    /// so a failure of any step leaves shipment, disruption, and session
    /// untouched. On success the shipment carries exactly the candidate's
    /// route figures, the disruption is resolved and removed from the
    /// active set, and the session is closed.
    pub fn apply_reroute(
        &self,
        disruption_id: DisruptionId,
        candidate_id: RouteCandidateId,
    ) -> Result<Shipment, CoordError> {
        let disruption = self
            .store
            .get_disruption(&disruption_id)
            .ok_or(CoordError::UnknownDisruption(disruption_id))?;

        let candidate = self
            .sessions
            .get(&disruption_id)
            .and_then(|set| set.iter().find(|c| c.id == candidate_id).cloned())
            .ok_or(CoordError::UnknownRouteCandidate(candidate_id))?;

        if candidate.availability != RouteAvailability::Available {
            return Err(CoordError::RouteUnavailable {
                candidate: candidate_id,
                availability: candidate.availability,
            });
        }

        let mut shipment = self
            .store
            .get_shipment(&disruption.shipment_id)
            .ok_or(CoordError::UnknownShipment(disruption.shipment_id))?;

        // All lookups passed; mutate.
        shipment.route = candidate.name.clone();
        shipment.eta = candidate.duration;
        shipment.cost = candidate.cost;
        shipment.carbon_kg = candidate.carbon_kg;
        shipment.risk = candidate.risk;
        shipment.updated_at = Utc::now();
        self.store.upsert_shipment(shipment.clone())?;

        self.store.remove_disruption(&disruption_id);
        self.sessions.remove(&disruption_id);

        tracing::info!(
            disruption = %disruption_id,
            shipment = %shipment.id,
            route = %candidate.name,
            "reroute applied"
        );
        self.notifier.emit(
            NotificationKind::Success,
            "Route Updated",
            &format!(
                "Shipment rerouted via {}. New ETA: {}",
                candidate.name, candidate.duration
            ),
        );
        Ok(shipment)
    }

    /// Abandon an open reroute session without committing anything.
    ///
    /// Free of side effects on shipment and disruption state; calling it
    /// with no session open is a no-op.
    pub fn abandon(&self, disruption_id: DisruptionId) {
        if self.sessions.remove(&disruption_id).is_some() {
            tracing::debug!(disruption = %disruption_id, "reroute session abandoned");
        }
    }

    /// Whether a session is currently open for the disruption.
    pub fn has_session(&self, disruption_id: &DisruptionId) -> bool {
        self.sessions.contains_key(disruption_id)
    }
}

impl std::fmt::Debug for RerouteResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RerouteResolver")
            .field("open_sessions", &self.sessions.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
