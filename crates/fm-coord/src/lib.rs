//! # fm-coord — Coordination Engine
//!
//! The shipment lifecycle and disruption-rerouting coordination engine
//! behind the Freightmesh dashboard. Suppliers, transporters, and
//! customers act on shared shipment records; this crate owns the state,
//! the state machines, and the decision flows:
//!
//! - **Entity Store** ([`store`]): canonical in-memory collections of
//!   shipments and disruption alerts plus the pending carrier request
//!   queue, with role-filtered read projections.
//!
//! - **Shipment Lifecycle** ([`shipment`], [`lifecycle`]): the status
//!   state machine (`pending → dispatched → in-transit → delivered`,
//!   with a `delayed` branch), the three-step creation wizard, carrier
//!   request decisions, and ratings.
//!
//! - **Disruption Registry** ([`disruption`]): alert creation and the
//!   non-reroute status transitions (`acknowledge`, `escalate`,
//!   `resolve`).
//!
//! - **Route Candidates** ([`routing`]): the [`RouteCandidateSource`] and
//!   [`PricingEstimator`] capability seams with deterministic synthetic
//!   implementations.
//!
//! - **Reroute Resolver** ([`reroute`]): transient per-disruption
//!   candidate sessions and the atomic commit that moves a shipment onto
//!   a selected route and retires its disruption.
//!
//! - **Notifications** ([`notify`]): the emit-only boundary toward the
//!   presentation layer, with expiry as data rather than timers.
//!
//! ## Concurrency Model
//!
//! Commands are discrete and run to completion — a single logical actor.
//! The shared collections are `DashMap`s so the engine is nonetheless
//! safe to share across threads; every mutation is a whole-record
//! validate-then-write, never a partial field merge.

pub mod disruption;
pub mod error;
pub mod lifecycle;
pub mod notify;
pub mod reroute;
pub mod routing;
pub mod shipment;
pub mod store;

// Re-export primary types.
pub use disruption::{
    validate_disruption_transition, DisruptionAlert, DisruptionRegistry, DisruptionStatus,
};
pub use error::CoordError;
pub use lifecycle::{
    CarrierRequest, LifecycleController, RequestDecision, ShipmentDetails, ShipmentDraft,
    ShipmentWizard, WizardStep,
};
pub use notify::{Notification, NotificationHub, NotificationKind, NotificationSink};
pub use reroute::RerouteResolver;
pub use routing::{
    transit_window, PriceQuote, PricingEstimator, RouteAvailability, RouteCandidate,
    RouteCandidateSource, SyntheticRouteSource, TariffTable,
};
pub use shipment::{validate_status_transition, Rating, Shipment, ShipmentStatus};
pub use store::{EntityStore, RoleFilter};
