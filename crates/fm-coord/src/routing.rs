//! # Route Candidates and Pricing
//!
//! Capability seams the engine depends on rather than computing itself:
//!
//! - [`RouteCandidateSource`] produces alternative routes for a disrupted
//!   shipment. Production deployments would back this with a routing
//!   service; [`SyntheticRouteSource`] synthesizes a deterministic set
//!   from the disruption context.
//!
//! - [`PricingEstimator`] quotes cost and carbon for a new shipment.
//!   [`TariffTable`] implements a flat per-mode tariff.
//!
//! Both implementations are pure: same inputs, same outputs. Tests can
//! substitute their own fakes through the traits.

use serde::{Deserialize, Serialize};

use fm_core::{HoursRange, Priority, RiskLevel, RouteCandidateId, TransportMode};

use crate::disruption::DisruptionAlert;

// ---------------------------------------------------------------------------
// Route candidate
// ---------------------------------------------------------------------------

/// Selectability of a route candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteAvailability {
    /// May be selected.
    Available,
    /// Shown for context, not selectable.
    Congested,
    /// Shown for context, not selectable.
    Delayed,
}

impl RouteAvailability {
    /// The canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Congested => "congested",
            Self::Delayed => "delayed",
        }
    }
}

impl std::fmt::Display for RouteAvailability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A proposed alternative route, scoped to a single reroute request.
///
/// Candidates are transient: they live in the reroute resolver's session
/// cache until a selection is committed or the request is abandoned, and
/// are never stored on shipment or disruption records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteCandidate {
    pub id: RouteCandidateId,
    pub name: String,
    pub distance_km: u32,
    pub duration: HoursRange,
    /// Monetary cost in whole currency units.
    pub cost: u64,
    /// Carbon footprint in kilograms.
    pub carbon_kg: u32,
    pub risk: RiskLevel,
    pub availability: RouteAvailability,
}

/// Produces alternative routes for a disrupted shipment.
///
/// Contract: returns at least one candidate, and the output is a pure
/// function of the disruption (no clock, no randomness) so a repeated
/// request for the same disruption offers the same choices.
pub trait RouteCandidateSource: Send + Sync {
    fn generate(&self, disruption: &DisruptionAlert) -> Vec<RouteCandidate>;
}

// ---------------------------------------------------------------------------
// Synthetic source
// ---------------------------------------------------------------------------

/// Corridor archetypes the synthetic source draws from. Figures are the
/// operator-facing baseline; the seed perturbs cost and distance so
/// different disruptions see different numbers.
const CORRIDORS: &[(&str, u32, (u32, u32), u64, u32, RiskLevel)] = &[
    ("Alternate Highway", 450, (6, 8), 1200, 85, RiskLevel::Low),
    ("Coastal Corridor", 520, (8, 10), 1100, 95, RiskLevel::Medium),
    ("Mountain Pass", 380, (5, 7), 1350, 70, RiskLevel::High),
    ("Express Lane", 420, (4, 6), 1500, 90, RiskLevel::Low),
];

/// Deterministic stand-in for a routing service.
///
/// Candidate identity and figures are derived from the disruption id, so
/// the same disruption always yields the same set. The first corridor is
/// always available; the high-risk corridor congests under medium or
/// high severity, and the fastest corridor reports delays while the
/// disruption itself is severe.
#[derive(Debug, Default, Clone)]
pub struct SyntheticRouteSource;

impl SyntheticRouteSource {
    pub fn new() -> Self {
        Self
    }
}

/// FNV-1a fold of the disruption id into a stable 64-bit seed.
fn seed_for(disruption: &DisruptionAlert) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in disruption.id.as_uuid().as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

impl RouteCandidateSource for SyntheticRouteSource {
    fn generate(&self, disruption: &DisruptionAlert) -> Vec<RouteCandidate> {
        let seed = seed_for(disruption);
        let severe = disruption.severity >= fm_core::Severity::Medium;

        CORRIDORS
            .iter()
            .enumerate()
            .map(|(index, (name, distance, (lo, hi), cost, carbon, risk))| {
                let jitter = (seed >> (index * 8)) & 0xff;
                let availability = match index {
                    2 if severe => RouteAvailability::Congested,
                    3 if disruption.severity == fm_core::Severity::High => {
                        RouteAvailability::Delayed
                    }
                    _ => RouteAvailability::Available,
                };
                RouteCandidate {
                    // Stable per (disruption, corridor): repeated requests
                    // produce identical candidate ids.
                    id: RouteCandidateId::from_uuid(uuid::Uuid::from_u64_pair(
                        seed,
                        index as u64,
                    )),
                    name: (*name).to_string(),
                    distance_km: distance + (jitter % 40) as u32,
                    duration: HoursRange { min: *lo, max: *hi },
                    cost: cost + (jitter % 8) * 25,
                    carbon_kg: carbon + (jitter % 10) as u32,
                    risk: *risk,
                    availability,
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// A cost and carbon quote for a new shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Monetary cost in whole currency units.
    pub cost: u64,
    /// Carbon footprint in kilograms.
    pub carbon_kg: u32,
}

/// Quotes cost and carbon for a shipment at creation time.
///
/// Production deployments would back this with a pricing service.
pub trait PricingEstimator: Send + Sync {
    fn estimate(&self, mode: TransportMode, weight_kg: u32, priority: Priority) -> PriceQuote;
}

/// Flat per-mode tariff: base charge plus a per-100kg rate, with a
/// priority surcharge. Carbon scales with weight per mode.
#[derive(Debug, Default, Clone)]
pub struct TariffTable;

impl TariffTable {
    pub fn new() -> Self {
        Self
    }

    fn mode_rates(mode: TransportMode) -> (u64, u64, u32) {
        // (base cost, cost per 100 kg, carbon grams per kg carried)
        match mode {
            TransportMode::Truck => (500, 120, 180),
            TransportMode::Ship => (900, 60, 40),
            TransportMode::Air => (1500, 400, 600),
            TransportMode::ElectricTruck => (650, 140, 30),
        }
    }

    fn priority_percent(priority: Priority) -> u64 {
        match priority {
            Priority::Standard => 100,
            Priority::High => 120,
            Priority::Urgent => 150,
        }
    }
}

impl PricingEstimator for TariffTable {
    fn estimate(&self, mode: TransportMode, weight_kg: u32, priority: Priority) -> PriceQuote {
        let (base, per_100kg, carbon_g_per_kg) = Self::mode_rates(mode);
        let weight = u64::from(weight_kg);
        let cost = (base + per_100kg * weight.div_ceil(100)) * Self::priority_percent(priority)
            / 100;
        let carbon_kg = ((u64::from(carbon_g_per_kg) * weight) / 1000) as u32;
        PriceQuote { cost, carbon_kg }
    }
}

/// Expected transit window for a freshly created shipment, by mode.
pub fn transit_window(mode: TransportMode) -> HoursRange {
    let (min, max) = match mode {
        TransportMode::Truck | TransportMode::ElectricTruck => (72, 120),
        TransportMode::Ship => (240, 336),
        TransportMode::Air => (24, 48),
    };
    HoursRange { min, max }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fm_core::{DisruptionId, Severity, ShipmentId};

    use crate::disruption::{DisruptionAlert, DisruptionStatus};

    fn sample_disruption(severity: Severity) -> DisruptionAlert {
        DisruptionAlert {
            id: DisruptionId::new(),
            shipment_id: ShipmentId::new(),
            kind: "Severe Weather Alert".to_string(),
            description: "Heavy snowstorm on I-80".to_string(),
            delay: HoursRange::new(12, 24).expect("delay"),
            status: DisruptionStatus::initial_for(severity),
            severity,
            location: "I-80, WY".to_string(),
            detected_at: Utc::now(),
            suggestions: vec![],
            resolved_at: None,
            escalated_at: None,
            customer_notified_at: None,
            resolution_note: None,
        }
    }

    #[test]
    fn generation_is_deterministic_per_disruption() {
        let source = SyntheticRouteSource::new();
        let disruption = sample_disruption(Severity::High);
        let first = source.generate(&disruption);
        let second = source.generate(&disruption);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.cost, b.cost);
            assert_eq!(a.distance_km, b.distance_km);
        }
    }

    #[test]
    fn different_disruptions_see_different_figures() {
        let source = SyntheticRouteSource::new();
        let a = source.generate(&sample_disruption(Severity::High));
        let b = source.generate(&sample_disruption(Severity::High));
        // Names match (same corridors); identities must not.
        assert_ne!(a[0].id, b[0].id);
    }

    #[test]
    fn at_least_one_candidate_is_available() {
        let source = SyntheticRouteSource::new();
        for severity in [Severity::Low, Severity::Medium, Severity::High] {
            let candidates = source.generate(&sample_disruption(severity));
            assert!(!candidates.is_empty());
            assert!(candidates
                .iter()
                .any(|c| c.availability == RouteAvailability::Available));
        }
    }

    #[test]
    fn high_severity_congests_the_risky_corridor() {
        let source = SyntheticRouteSource::new();
        let candidates = source.generate(&sample_disruption(Severity::High));
        let mountain = candidates
            .iter()
            .find(|c| c.name == "Mountain Pass")
            .expect("corridor present");
        assert_eq!(mountain.availability, RouteAvailability::Congested);
    }

    #[test]
    fn low_severity_leaves_all_corridors_available() {
        let source = SyntheticRouteSource::new();
        let candidates = source.generate(&sample_disruption(Severity::Low));
        assert!(candidates
            .iter()
            .all(|c| c.availability == RouteAvailability::Available));
    }

    #[test]
    fn tariff_scales_with_weight_and_priority() {
        let tariff = TariffTable::new();
        let light = tariff.estimate(TransportMode::Truck, 100, Priority::Standard);
        let heavy = tariff.estimate(TransportMode::Truck, 1000, Priority::Standard);
        assert!(heavy.cost > light.cost);
        assert!(heavy.carbon_kg > light.carbon_kg);

        let urgent = tariff.estimate(TransportMode::Truck, 100, Priority::Urgent);
        assert!(urgent.cost > light.cost);
        // Priority does not change the physics.
        assert_eq!(urgent.carbon_kg, light.carbon_kg);
    }

    #[test]
    fn electric_truck_runs_cleaner_than_diesel() {
        let tariff = TariffTable::new();
        let diesel = tariff.estimate(TransportMode::Truck, 500, Priority::Standard);
        let electric = tariff.estimate(TransportMode::ElectricTruck, 500, Priority::Standard);
        assert!(electric.carbon_kg < diesel.carbon_kg);
    }

    #[test]
    fn transit_windows_by_mode() {
        assert!(transit_window(TransportMode::Air).max < transit_window(TransportMode::Ship).min);
    }
}
