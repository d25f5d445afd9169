//! # Disruption Alerts and Registry
//!
//! Disruption alerts record events degrading a shipment's expected
//! delivery: weather, mechanical failure, congestion. The registry owns
//! alert creation and every non-reroute status transition; committing a
//! reroute retires the alert through the [reroute resolver](crate::reroute)
//! instead.
//!
//! ## Transition Graph
//!
//! ```text
//! Active ──▶ Acknowledged ──▶ InProgress ──▶ Monitoring
//!   │  ▲          │               │             │
//!   │  └──────────┼───────────────┼─────────────┘
//!   │             ▼               ▼
//!   ├────────▶ Escalated ◀────────┘
//!   │             │
//!   └─────────────┴──▶ Resolved   (terminal)
//! ```
//!
//! `escalate` is allowed from any non-resolved state; `resolve` removes
//! the alert from the active set. A `Monitoring` alert can re-activate.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fm_core::{DisruptionId, HoursRange, Severity, ShipmentId};

use crate::error::CoordError;
use crate::notify::{NotificationKind, NotificationSink};
use crate::store::EntityStore;

// ── Disruption status ──────────────────────────────────────────────────

/// The lifecycle state of a disruption alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisruptionStatus {
    /// Newly detected, nobody has responded yet.
    Active,
    /// An operator has seen the alert.
    Acknowledged,
    /// Mitigation is underway.
    InProgress,
    /// Watched without active mitigation; may re-activate.
    Monitoring,
    /// Raised to supervisory attention.
    Escalated,
    /// Closed out. Terminal state.
    Resolved,
}

impl DisruptionStatus {
    /// The canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Acknowledged => "acknowledged",
            Self::InProgress => "in-progress",
            Self::Monitoring => "monitoring",
            Self::Escalated => "escalated",
            Self::Resolved => "resolved",
        }
    }

    /// Whether this state is terminal (no further transitions allowed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved)
    }

    /// Valid target states from this state.
    pub fn valid_transitions(&self) -> &'static [DisruptionStatus] {
        match self {
            Self::Active => &[
                Self::Acknowledged,
                Self::InProgress,
                Self::Escalated,
                Self::Monitoring,
                Self::Resolved,
            ],
            Self::Acknowledged => &[Self::InProgress, Self::Escalated, Self::Resolved],
            Self::InProgress => &[Self::Escalated, Self::Monitoring, Self::Resolved],
            Self::Monitoring => &[Self::Active, Self::Escalated, Self::Resolved],
            Self::Escalated => &[Self::Resolved],
            Self::Resolved => &[],
        }
    }

    /// Initial status derived from severity at detection time: high
    /// severity demands immediate response, low severity starts under
    /// observation.
    pub fn initial_for(severity: Severity) -> Self {
        match severity {
            Severity::High => Self::Active,
            Severity::Medium => Self::InProgress,
            Severity::Low => Self::Monitoring,
        }
    }
}

impl std::fmt::Display for DisruptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validate a disruption status transition, returning the target state.
pub fn validate_disruption_transition(
    from: DisruptionStatus,
    attempted: DisruptionStatus,
) -> Result<DisruptionStatus, CoordError> {
    if from.valid_transitions().contains(&attempted) {
        Ok(attempted)
    } else {
        Err(CoordError::InvalidDisruptionTransition { from, attempted })
    }
}

// ── Disruption alert record ────────────────────────────────────────────

/// A disruption alert against a single shipment.
///
/// A shipment may carry any number of concurrent alerts; every alert
/// references exactly one shipment that existed when it was raised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisruptionAlert {
    pub id: DisruptionId,
    pub shipment_id: ShipmentId,
    /// Free-form classification (e.g. "Severe Weather Alert",
    /// "Mechanical Failure", "Port Congestion").
    pub kind: String,
    pub description: String,
    /// Estimated delay this disruption adds.
    pub delay: HoursRange,
    pub status: DisruptionStatus,
    pub severity: Severity,
    pub location: String,
    pub detected_at: DateTime<Utc>,
    /// Suggested operator actions, in recommendation order.
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_notified_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_note: Option<String>,
}

// ── Registry ───────────────────────────────────────────────────────────

/// Creates disruption alerts and manages their non-reroute transitions.
pub struct DisruptionRegistry {
    store: Arc<EntityStore>,
    notifier: Arc<dyn NotificationSink>,
}

impl DisruptionRegistry {
    pub fn new(store: Arc<EntityStore>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { store, notifier }
    }

    /// Raise a new alert against a shipment.
    ///
    /// The initial status is severity-derived. Fails with
    /// [`CoordError::UnknownShipment`] if the shipment does not exist;
    /// nothing is recorded in that case.
    #[allow(clippy::too_many_arguments)]
    pub fn raise(
        &self,
        shipment_id: ShipmentId,
        kind: impl Into<String>,
        description: impl Into<String>,
        delay: HoursRange,
        severity: Severity,
        location: impl Into<String>,
        suggestions: Vec<String>,
    ) -> Result<DisruptionAlert, CoordError> {
        let alert = DisruptionAlert {
            id: DisruptionId::new(),
            shipment_id,
            kind: kind.into(),
            description: description.into(),
            delay,
            status: DisruptionStatus::initial_for(severity),
            severity,
            location: location.into(),
            detected_at: Utc::now(),
            suggestions,
            resolved_at: None,
            escalated_at: None,
            customer_notified_at: None,
            resolution_note: None,
        };
        // upsert_disruption checks the shipment reference.
        self.store.upsert_disruption(alert.clone())?;
        tracing::info!(disruption = %alert.id, shipment = %shipment_id, severity = %severity, "disruption raised");
        self.notifier.emit(
            NotificationKind::Warning,
            "Disruption Detected",
            &format!("{} near {}: {}", alert.kind, alert.location, alert.description),
        );
        Ok(alert)
    }

    /// Mark an active alert as seen by an operator.
    ///
    /// Only `Active` alerts can be acknowledged; acknowledging an
    /// escalated or resolved alert fails with
    /// [`CoordError::InvalidDisruptionTransition`].
    pub fn acknowledge(&self, id: DisruptionId) -> Result<DisruptionAlert, CoordError> {
        self.transition(id, DisruptionStatus::Acknowledged, |alert| {
            if alert.status != DisruptionStatus::Active {
                return Err(CoordError::InvalidDisruptionTransition {
                    from: alert.status,
                    attempted: DisruptionStatus::Acknowledged,
                });
            }
            Ok(())
        })
    }

    /// Escalate an alert to supervisory attention.
    ///
    /// Allowed from any non-resolved state; records the escalation
    /// timestamp.
    pub fn escalate(&self, id: DisruptionId) -> Result<DisruptionAlert, CoordError> {
        let updated = self.transition(id, DisruptionStatus::Escalated, |_| Ok(()))?;
        self.notifier.emit(
            NotificationKind::Warning,
            "Disruption Escalated",
            &format!("{} has been escalated for supervisory review", updated.kind),
        );
        Ok(updated)
    }

    /// Resolve an alert and remove it from the active set.
    pub fn resolve(
        &self,
        id: DisruptionId,
        note: impl Into<String>,
    ) -> Result<DisruptionAlert, CoordError> {
        let mut alert = self
            .store
            .get_disruption(&id)
            .ok_or(CoordError::UnknownDisruption(id))?;
        validate_disruption_transition(alert.status, DisruptionStatus::Resolved)?;
        alert.status = DisruptionStatus::Resolved;
        alert.resolved_at = Some(Utc::now());
        alert.resolution_note = Some(note.into());
        self.store.remove_disruption(&id);
        tracing::info!(disruption = %id, "disruption resolved");
        self.notifier.emit(
            NotificationKind::Success,
            "Disruption Resolved",
            &format!("{} has been resolved", alert.kind),
        );
        Ok(alert)
    }

    /// Record that the affected customer has been contacted. Does not
    /// change the alert's status.
    pub fn mark_customer_notified(&self, id: DisruptionId) -> Result<DisruptionAlert, CoordError> {
        let mut alert = self
            .store
            .get_disruption(&id)
            .ok_or(CoordError::UnknownDisruption(id))?;
        alert.customer_notified_at = Some(Utc::now());
        self.store.upsert_disruption(alert.clone())?;
        Ok(alert)
    }

    /// Shared transition path: look up, pre-check, validate against the
    /// table, stamp timestamps, write back.
    fn transition(
        &self,
        id: DisruptionId,
        attempted: DisruptionStatus,
        precheck: impl FnOnce(&DisruptionAlert) -> Result<(), CoordError>,
    ) -> Result<DisruptionAlert, CoordError> {
        let mut alert = self
            .store
            .get_disruption(&id)
            .ok_or(CoordError::UnknownDisruption(id))?;
        precheck(&alert)?;
        alert.status = validate_disruption_transition(alert.status, attempted)?;
        if attempted == DisruptionStatus::Escalated {
            alert.escalated_at = Some(Utc::now());
        }
        self.store.upsert_disruption(alert.clone())?;
        Ok(alert)
    }
}

impl std::fmt::Debug for DisruptionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisruptionRegistry").finish_non_exhaustive()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationHub;
    use crate::store::RoleFilter;
    use fm_core::{PartyRef, Priority, RiskLevel, TransportMode};

    fn sample_shipment() -> crate::shipment::Shipment {
        let now = Utc::now();
        crate::shipment::Shipment {
            id: ShipmentId::new(),
            supplier: PartyRef::new("S-001").expect("supplier"),
            customer: PartyRef::new("C-001").expect("customer"),
            transporter: PartyRef::new("T-001").expect("transporter"),
            mode: TransportMode::Truck,
            origin: "NYC".to_string(),
            destination: "LA".to_string(),
            route: "NYC → LA".to_string(),
            status: crate::shipment::ShipmentStatus::InTransit,
            progress: 50,
            eta: HoursRange::new(72, 120).expect("eta"),
            cost: 1450,
            carbon_kg: 120,
            risk: RiskLevel::Low,
            disruption_probability: 12,
            weight_kg: 500,
            priority: Priority::Standard,
            vehicle: None,
            rating: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn registry_with_shipment() -> (DisruptionRegistry, Arc<EntityStore>, ShipmentId) {
        let store = Arc::new(EntityStore::new());
        let hub: Arc<dyn NotificationSink> = Arc::new(NotificationHub::new());
        let shipment = sample_shipment();
        let shipment_id = shipment.id;
        store.upsert_shipment(shipment).expect("seed shipment");
        (
            DisruptionRegistry::new(Arc::clone(&store), hub),
            store,
            shipment_id,
        )
    }

    fn raise_sample(
        registry: &DisruptionRegistry,
        shipment_id: ShipmentId,
        severity: Severity,
    ) -> DisruptionAlert {
        registry
            .raise(
                shipment_id,
                "Severe Weather Alert",
                "Heavy snowstorm causing delays on I-80",
                HoursRange::new(12, 24).expect("delay"),
                severity,
                "I-80, WY",
                vec!["Reroute shipment".to_string(), "Contact customer".to_string()],
            )
            .expect("raise")
    }

    #[test]
    fn raise_against_unknown_shipment_fails() {
        let (registry, store, _) = registry_with_shipment();
        let result = registry.raise(
            ShipmentId::new(),
            "Port Congestion",
            "Unloading delays",
            HoursRange::new(24, 48).expect("delay"),
            Severity::High,
            "Los Angeles, CA",
            vec![],
        );
        assert!(matches!(result, Err(CoordError::UnknownShipment(_))));
        assert!(store.list_active_disruptions(&RoleFilter::All).is_empty());
    }

    #[test]
    fn initial_status_is_severity_derived() {
        let (registry, _, shipment_id) = registry_with_shipment();
        assert_eq!(
            raise_sample(&registry, shipment_id, Severity::High).status,
            DisruptionStatus::Active
        );
        assert_eq!(
            raise_sample(&registry, shipment_id, Severity::Medium).status,
            DisruptionStatus::InProgress
        );
        assert_eq!(
            raise_sample(&registry, shipment_id, Severity::Low).status,
            DisruptionStatus::Monitoring
        );
    }

    #[test]
    fn acknowledge_only_from_active() {
        let (registry, _, shipment_id) = registry_with_shipment();
        let alert = raise_sample(&registry, shipment_id, Severity::High);
        let acked = registry.acknowledge(alert.id).expect("acknowledge");
        assert_eq!(acked.status, DisruptionStatus::Acknowledged);

        // A second acknowledge fails: the alert is no longer Active.
        assert!(matches!(
            registry.acknowledge(alert.id),
            Err(CoordError::InvalidDisruptionTransition { .. })
        ));
    }

    #[test]
    fn escalate_from_any_non_resolved_state() {
        let (registry, _, shipment_id) = registry_with_shipment();
        for severity in [Severity::High, Severity::Medium, Severity::Low] {
            let alert = raise_sample(&registry, shipment_id, severity);
            let escalated = registry.escalate(alert.id).expect("escalate");
            assert_eq!(escalated.status, DisruptionStatus::Escalated);
            assert!(escalated.escalated_at.is_some());
        }
    }

    #[test]
    fn resolve_removes_from_active_set() {
        let (registry, store, shipment_id) = registry_with_shipment();
        let alert = raise_sample(&registry, shipment_id, Severity::High);
        let other = raise_sample(&registry, shipment_id, Severity::Medium);

        let resolved = registry.resolve(alert.id, "storm cleared").expect("resolve");
        assert_eq!(resolved.status, DisruptionStatus::Resolved);
        assert!(resolved.resolved_at.is_some());
        assert_eq!(resolved.resolution_note.as_deref(), Some("storm cleared"));

        let active = store.list_active_disruptions(&RoleFilter::All);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, other.id);
    }

    #[test]
    fn resolve_twice_reports_unknown_disruption() {
        let (registry, _, shipment_id) = registry_with_shipment();
        let alert = raise_sample(&registry, shipment_id, Severity::High);
        registry.resolve(alert.id, "done").expect("first resolve");
        assert!(matches!(
            registry.resolve(alert.id, "again"),
            Err(CoordError::UnknownDisruption(_))
        ));
    }

    #[test]
    fn escalated_cannot_be_acknowledged() {
        let (registry, _, shipment_id) = registry_with_shipment();
        let alert = raise_sample(&registry, shipment_id, Severity::High);
        registry.escalate(alert.id).expect("escalate");
        assert!(registry.acknowledge(alert.id).is_err());
    }

    #[test]
    fn monitoring_can_reactivate() {
        assert!(validate_disruption_transition(
            DisruptionStatus::Monitoring,
            DisruptionStatus::Active
        )
        .is_ok());
    }

    #[test]
    fn customer_notified_keeps_status() {
        let (registry, _, shipment_id) = registry_with_shipment();
        let alert = raise_sample(&registry, shipment_id, Severity::High);
        let updated = registry.mark_customer_notified(alert.id).expect("notify");
        assert_eq!(updated.status, alert.status);
        assert!(updated.customer_notified_at.is_some());
    }
}
