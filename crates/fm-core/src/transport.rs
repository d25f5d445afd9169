//! # Transport Vocabulary
//!
//! Shared enums and value types used across shipment records, disruption
//! alerts, and route candidates. Wire names are kebab-case to match the
//! dashboard protocol (`"electric-truck"`, `"in-transit"`).

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Transport mode
// ---------------------------------------------------------------------------

/// The physical mode a shipment travels by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportMode {
    Truck,
    Ship,
    Air,
    ElectricTruck,
}

impl TransportMode {
    /// All transport modes as a slice.
    pub fn all() -> &'static [TransportMode] {
        &[Self::Truck, Self::Ship, Self::Air, Self::ElectricTruck]
    }

    /// The canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Truck => "truck",
            Self::Ship => "ship",
            Self::Air => "air",
            Self::ElectricTruck => "electric-truck",
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Risk, priority, severity
// ---------------------------------------------------------------------------

/// Risk classification for a shipment or a route candidate.
///
/// Ordered: `Low < Medium < High`, so candidates can be compared by risk.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// The canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shipment priority selected at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Standard,
    High,
    Urgent,
}

impl Priority {
    /// The canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Priority> for RiskLevel {
    /// Derive the initial risk classification from the chosen priority:
    /// urgent shipments run hot, standard shipments run safe.
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Urgent => RiskLevel::High,
            Priority::High => RiskLevel::Medium,
            Priority::Standard => RiskLevel::Low,
        }
    }
}

/// Severity of a disruption alert.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// The canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// HoursRange
// ---------------------------------------------------------------------------

/// An inclusive window expressed in whole hours.
///
/// Used for shipment ETAs ("72-120 hours"), route candidate durations
/// ("6-8 hours"), and disruption delay estimates ("12-24 hours").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursRange {
    pub min: u32,
    pub max: u32,
}

impl HoursRange {
    /// Create a window, rejecting inverted bounds.
    pub fn new(min: u32, max: u32) -> Result<Self, ValidationError> {
        if min > max {
            return Err(ValidationError::new(
                "hours",
                format!("window is inverted: {min} > {max}"),
            ));
        }
        Ok(Self { min, max })
    }

    /// The midpoint of the window, used for ordering candidates by time.
    pub fn midpoint(&self) -> u32 {
        self.min + (self.max - self.min) / 2
    }
}

impl std::fmt::Display for HoursRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{} hours", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_derivation_from_priority() {
        assert_eq!(RiskLevel::from(Priority::Urgent), RiskLevel::High);
        assert_eq!(RiskLevel::from(Priority::High), RiskLevel::Medium);
        assert_eq!(RiskLevel::from(Priority::Standard), RiskLevel::Low);
    }

    #[test]
    fn risk_levels_are_ordered() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
    }

    #[test]
    fn mode_wire_names_are_kebab_case() {
        let json = serde_json::to_string(&TransportMode::ElectricTruck).expect("serialize");
        assert_eq!(json, "\"electric-truck\"");
    }

    #[test]
    fn hours_range_rejects_inverted_bounds() {
        assert!(HoursRange::new(8, 6).is_err());
        assert!(HoursRange::new(6, 6).is_ok());
    }

    #[test]
    fn hours_range_display() {
        let w = HoursRange::new(6, 8).expect("window");
        assert_eq!(w.to_string(), "6-8 hours");
        assert_eq!(w.midpoint(), 7);
    }
}
