//! # fm-core — Foundational Types
//!
//! Shared vocabulary for the Freightmesh coordination engine:
//!
//! - **Identifiers** ([`identity`]): domain-primitive newtypes for every
//!   record id. A [`ShipmentId`] cannot be passed where a [`DisruptionId`]
//!   is expected.
//!
//! - **Transport vocabulary** ([`transport`]): transport modes, risk
//!   levels, priorities, disruption severities, and the [`HoursRange`]
//!   window used for ETAs and delay estimates.
//!
//! - **Validation** ([`error`]): the structured [`ValidationError`] raised
//!   by constructors throughout the stack.
//!
//! This crate has no I/O and no async. Everything downstream (the engine,
//! the API surface) builds on these types.

pub mod error;
pub mod identity;
pub mod transport;

// Re-export primary types.
pub use error::ValidationError;
pub use identity::{
    CarrierRequestId, DisruptionId, NotificationId, PartyRef, RouteCandidateId, ShipmentId,
};
pub use transport::{HoursRange, Priority, RiskLevel, Severity, TransportMode};
