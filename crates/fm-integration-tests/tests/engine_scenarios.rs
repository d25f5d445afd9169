//! Cross-crate lifecycle scenarios driving the coordination engine
//! directly, without the HTTP surface in between.
//!
//! Each test tells one operator story: the records it touches, the
//! transitions it takes, and the state every role observes afterwards.

use std::sync::Arc;

use fm_core::{HoursRange, PartyRef, Priority, Severity, TransportMode};
use fm_coord::{
    CoordError, DisruptionRegistry, DisruptionStatus, EntityStore, LifecycleController,
    NotificationHub, NotificationSink, RerouteResolver, RoleFilter, RouteAvailability,
    ShipmentDetails, ShipmentStatus, ShipmentWizard, SyntheticRouteSource, TariffTable,
};

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct Engine {
    store: Arc<EntityStore>,
    lifecycle: LifecycleController,
    disruptions: DisruptionRegistry,
    reroute: RerouteResolver,
    hub: Arc<NotificationHub>,
}

fn engine() -> Engine {
    let store = Arc::new(EntityStore::new());
    let hub = Arc::new(NotificationHub::new());
    let sink: Arc<dyn NotificationSink> = hub.clone();
    Engine {
        lifecycle: LifecycleController::new(
            Arc::clone(&store),
            Arc::new(TariffTable::new()),
            Arc::clone(&sink),
        ),
        disruptions: DisruptionRegistry::new(Arc::clone(&store), Arc::clone(&sink)),
        reroute: RerouteResolver::new(
            Arc::clone(&store),
            Arc::new(SyntheticRouteSource::new()),
            Arc::clone(&sink),
        ),
        store,
        hub,
    }
}

fn party(id: &str) -> PartyRef {
    PartyRef::new(id).expect("party")
}

fn create_urgent_truck_shipment(engine: &Engine) -> fm_coord::Shipment {
    let mut wizard = ShipmentWizard::new(party("S-001"));
    wizard.select_customer(party("C-001"));
    wizard.select_transporter(party("T-001")).expect("transporter");
    wizard
        .enter_details(ShipmentDetails {
            origin: "NYC".to_string(),
            destination: "LA".to_string(),
            weight_kg: 500,
            priority: Priority::Urgent,
            mode: TransportMode::Truck,
        })
        .expect("details");
    engine
        .lifecycle
        .create_shipment(wizard.submit().expect("submit"))
        .expect("create")
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn urgent_creation_scenario() {
    let engine = engine();
    let shipment = create_urgent_truck_shipment(&engine);
    assert_eq!(shipment.risk, fm_core::RiskLevel::High);
    assert_eq!(shipment.status, ShipmentStatus::Pending);
    assert_eq!(shipment.route, "NYC → LA");
}

#[test]
fn disruption_escalation_scenario() {
    let engine = engine();
    let shipment = create_urgent_truck_shipment(&engine);

    let alert = engine
        .disruptions
        .raise(
            shipment.id,
            "Severe Weather Alert",
            "Heavy snowstorm causing delays on I-80",
            HoursRange::new(12, 24).expect("delay"),
            Severity::High,
            "I-80, WY",
            vec!["Reroute shipment".to_string(), "Contact customer".to_string()],
        )
        .expect("raise");
    assert_eq!(alert.status, DisruptionStatus::Active);
    assert_eq!(
        engine.store.list_active_disruptions(&RoleFilter::All).len(),
        1
    );

    let escalated = engine.disruptions.escalate(alert.id).expect("escalate");
    assert_eq!(escalated.status, DisruptionStatus::Escalated);
    assert!(escalated.escalated_at.is_some());

    engine
        .disruptions
        .resolve(alert.id, "storm passed")
        .expect("resolve");
    assert!(engine
        .store
        .list_active_disruptions(&RoleFilter::All)
        .is_empty());
}

#[test]
fn reroute_commit_scenario() {
    let engine = engine();
    let shipment = create_urgent_truck_shipment(&engine);
    engine
        .lifecycle
        .update_status(shipment.id, ShipmentStatus::Dispatched)
        .expect("dispatch");
    engine
        .lifecycle
        .update_status(shipment.id, ShipmentStatus::InTransit)
        .expect("transit");

    let alert = engine
        .disruptions
        .raise(
            shipment.id,
            "Port Congestion",
            "Unloading delays",
            HoursRange::new(24, 48).expect("delay"),
            Severity::Medium,
            "Los Angeles, CA",
            vec![],
        )
        .expect("raise");

    let candidates = engine.reroute.request_reroute(alert.id).expect("request");
    assert!(!candidates.is_empty());
    let chosen = candidates
        .iter()
        .find(|c| c.availability == RouteAvailability::Available)
        .expect("available candidate");

    let updated = engine
        .reroute
        .apply_reroute(alert.id, chosen.id)
        .expect("apply");
    assert_eq!(updated.route, chosen.name);
    assert_eq!(updated.eta, chosen.duration);
    assert_eq!(updated.cost, chosen.cost);
    assert_eq!(updated.carbon_kg, chosen.carbon_kg);
    assert_eq!(updated.risk, chosen.risk);

    // Retired from every role's disruption view.
    for filter in [
        RoleFilter::All,
        RoleFilter::Supplier(party("S-001")),
        RoleFilter::Transporter(party("T-001")),
        RoleFilter::Customer(party("C-001")),
    ] {
        assert!(engine.store.list_active_disruptions(&filter).is_empty());
    }

    // A second apply is a stale command: the disruption is gone.
    assert!(matches!(
        engine.reroute.apply_reroute(alert.id, chosen.id),
        Err(CoordError::UnknownDisruption(_))
    ));
}

#[test]
fn resolving_one_disruption_leaves_other_shipments_alone() {
    let engine = engine();
    let first = create_urgent_truck_shipment(&engine);
    let second = create_urgent_truck_shipment(&engine);

    let delay = HoursRange::new(6, 8).expect("delay");
    let on_first = engine
        .disruptions
        .raise(first.id, "Mechanical Failure", "Truck breakdown", delay, Severity::Medium, "Denver, CO", vec![])
        .expect("first alert");
    let on_second = engine
        .disruptions
        .raise(second.id, "Mechanical Failure", "Truck breakdown", delay, Severity::Medium, "Denver, CO", vec![])
        .expect("second alert");

    engine
        .disruptions
        .resolve(on_first.id, "repaired")
        .expect("resolve");

    let remaining = engine.store.list_active_disruptions(&RoleFilter::All);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, on_second.id);
    assert_eq!(remaining[0].shipment_id, second.id);
}

#[test]
fn delivery_and_rating_scenario() {
    let engine = engine();
    let shipment = create_urgent_truck_shipment(&engine);

    for status in [
        ShipmentStatus::Dispatched,
        ShipmentStatus::InTransit,
        ShipmentStatus::Delivered,
    ] {
        engine.lifecycle.update_status(shipment.id, status).expect("advance");
    }

    let rated = engine
        .lifecycle
        .submit_rating(shipment.id, 5, Some("arrived early".to_string()))
        .expect("rate");
    assert_eq!(rated.rating.map(|r| r.score), Some(5));

    // Delivered is terminal: no command can regress it.
    assert!(matches!(
        engine
            .lifecycle
            .update_status(shipment.id, ShipmentStatus::Pending),
        Err(CoordError::InvalidShipmentTransition { .. })
    ));
}

#[test]
fn every_command_leaves_a_notification_trail() {
    let engine = engine();
    create_urgent_truck_shipment(&engine);
    let titles: Vec<String> = engine
        .hub
        .active(chrono::Utc::now())
        .into_iter()
        .map(|n| n.title)
        .collect();
    assert!(titles.contains(&"Shipment Created".to_string()));
}
