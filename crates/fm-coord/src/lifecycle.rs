//! # Shipment Lifecycle Controller
//!
//! Owns shipment creation and post-creation progression, independent of
//! disruption handling:
//!
//! - the three-step creation wizard (`customer → transporter → details`)
//!   as an explicit finite-state machine with one transition method per
//!   step and a single source of truth for the current step;
//! - status progression along the [`ShipmentStatus`] table;
//! - the pending carrier request queue with one-shot accept/decline;
//! - customer ratings against delivered shipments.
//!
//! Pricing is delegated to the [`PricingEstimator`] seam; the controller
//! never invents figures of its own.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use fm_core::{
    CarrierRequestId, PartyRef, Priority, RiskLevel, ShipmentId, TransportMode, ValidationError,
};

use crate::error::CoordError;
use crate::notify::{NotificationKind, NotificationSink};
use crate::routing::{transit_window, PricingEstimator};
use crate::shipment::{validate_status_transition, Rating, Shipment, ShipmentStatus};
use crate::store::EntityStore;

// ---------------------------------------------------------------------------
// Wizard
// ---------------------------------------------------------------------------

/// The step the creation wizard is currently on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    Customer,
    Transporter,
    Details,
}

impl WizardStep {
    /// The canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Transporter => "transporter",
            Self::Details => "details",
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The final wizard step's payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentDetails {
    pub origin: String,
    pub destination: String,
    pub weight_kg: u32,
    pub priority: Priority,
    pub mode: TransportMode,
}

impl ShipmentDetails {
    /// Field-level validation, reporting the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.origin.trim().is_empty() {
            return Err(ValidationError::new("origin", "must not be empty"));
        }
        if self.destination.trim().is_empty() {
            return Err(ValidationError::new("destination", "must not be empty"));
        }
        if self.weight_kg == 0 {
            return Err(ValidationError::new(
                "weight_kg",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// A completed wizard, ready for submission to the controller.
#[derive(Debug, Clone)]
pub struct ShipmentDraft {
    pub supplier: PartyRef,
    pub customer: PartyRef,
    pub transporter: PartyRef,
    pub details: ShipmentDetails,
}

/// The three-step shipment creation wizard.
///
/// Each step validates its own field before the wizard advances. Changing
/// an earlier selection clears everything downstream of it: the mode
/// choice entered at the details step is tied to the selected
/// transporter's capability set, so a different transporter (or a
/// different customer) invalidates it.
#[derive(Debug, Clone)]
pub struct ShipmentWizard {
    supplier: PartyRef,
    step: WizardStep,
    customer: Option<PartyRef>,
    transporter: Option<PartyRef>,
    details: Option<ShipmentDetails>,
}

impl ShipmentWizard {
    /// Start a fresh wizard for the issuing supplier.
    pub fn new(supplier: PartyRef) -> Self {
        Self {
            supplier,
            step: WizardStep::Customer,
            customer: None,
            transporter: None,
            details: None,
        }
    }

    /// The step currently awaiting input.
    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Select the addressed customer and advance to transporter selection.
    ///
    /// Selecting a different customer than before clears the transporter
    /// and details steps.
    pub fn select_customer(&mut self, customer: PartyRef) {
        if self.customer.as_ref() != Some(&customer) {
            self.transporter = None;
            self.details = None;
        }
        self.customer = Some(customer);
        self.step = WizardStep::Transporter;
    }

    /// Select the carrying transporter and advance to the details step.
    ///
    /// Fails if no customer has been selected yet. Selecting a different
    /// transporter than before clears any entered details.
    pub fn select_transporter(&mut self, transporter: PartyRef) -> Result<(), CoordError> {
        if self.customer.is_none() {
            return Err(ValidationError::new("customer", "select a customer first").into());
        }
        if self.transporter.as_ref() != Some(&transporter) {
            self.details = None;
        }
        self.transporter = Some(transporter);
        self.step = WizardStep::Details;
        Ok(())
    }

    /// Enter shipment details.
    ///
    /// Fails if no transporter has been selected, or if any detail field
    /// is missing or malformed.
    pub fn enter_details(&mut self, details: ShipmentDetails) -> Result<(), CoordError> {
        if self.transporter.is_none() {
            return Err(ValidationError::new("transporter", "select a transporter first").into());
        }
        details.validate()?;
        self.details = Some(details);
        Ok(())
    }

    /// Step back, clearing the data of the step being left and everything
    /// after it.
    pub fn back(&mut self) {
        match self.step {
            WizardStep::Details => {
                self.details = None;
                self.step = WizardStep::Transporter;
            }
            WizardStep::Transporter => {
                self.transporter = None;
                self.details = None;
                self.step = WizardStep::Customer;
            }
            WizardStep::Customer => {}
        }
    }

    /// Finish the wizard, producing a draft for submission.
    ///
    /// Fails with [`CoordError::IncompleteShipment`] naming the missing
    /// steps unless all three hold data.
    pub fn submit(self) -> Result<ShipmentDraft, CoordError> {
        let mut missing = Vec::new();
        if self.customer.is_none() {
            missing.push("customer");
        }
        if self.transporter.is_none() {
            missing.push("transporter");
        }
        if self.details.is_none() {
            missing.push("details");
        }
        match (self.customer, self.transporter, self.details) {
            (Some(customer), Some(transporter), Some(details)) => Ok(ShipmentDraft {
                supplier: self.supplier,
                customer,
                transporter,
                details,
            }),
            _ => Err(CoordError::IncompleteShipment {
                missing: missing.join(", "),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Carrier requests
// ---------------------------------------------------------------------------

/// How a transporter answers a pending carrier request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestDecision {
    Accept,
    Decline,
}

/// A supplier's request for a transporter to carry a load.
///
/// Sits in the pending queue until the transporter decides; decisions are
/// one-shot and remove the request either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierRequest {
    pub id: CarrierRequestId,
    pub supplier: PartyRef,
    pub customer: PartyRef,
    /// The transporter being asked.
    pub transporter: PartyRef,
    pub origin: String,
    pub destination: String,
    pub mode: TransportMode,
    pub priority: Priority,
    pub weight_kg: u32,
    /// Revenue the transporter would earn, whole currency units.
    pub estimated_revenue: u64,
    pub pickup_date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub submitted_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns shipment creation and post-creation status progression.
pub struct LifecycleController {
    store: Arc<EntityStore>,
    pricing: Arc<dyn PricingEstimator>,
    notifier: Arc<dyn NotificationSink>,
}

impl LifecycleController {
    pub fn new(
        store: Arc<EntityStore>,
        pricing: Arc<dyn PricingEstimator>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            store,
            pricing,
            notifier,
        }
    }

    /// Materialize a submitted wizard draft as a pending shipment.
    ///
    /// Risk is derived from priority, cost and carbon come from the
    /// pricing seam, and the ETA is the mode's standard transit window.
    pub fn create_shipment(&self, draft: ShipmentDraft) -> Result<Shipment, CoordError> {
        draft.details.validate()?;
        let id = ShipmentId::new();
        let quote =
            self.pricing
                .estimate(draft.details.mode, draft.details.weight_kg, draft.details.priority);
        let now = Utc::now();
        let shipment = Shipment {
            id,
            supplier: draft.supplier,
            customer: draft.customer,
            transporter: draft.transporter,
            mode: draft.details.mode,
            route: format!("{} → {}", draft.details.origin, draft.details.destination),
            origin: draft.details.origin,
            destination: draft.details.destination,
            status: ShipmentStatus::Pending,
            progress: 0,
            eta: transit_window(draft.details.mode),
            cost: quote.cost,
            carbon_kg: quote.carbon_kg,
            risk: RiskLevel::from(draft.details.priority),
            disruption_probability: derive_disruption_probability(&id),
            weight_kg: draft.details.weight_kg,
            priority: draft.details.priority,
            vehicle: None,
            rating: None,
            created_at: now,
            updated_at: now,
        };
        self.store.upsert_shipment(shipment.clone())?;
        tracing::info!(shipment = %shipment.id, route = %shipment.route, "shipment created");
        self.notifier.emit(
            NotificationKind::Success,
            "Shipment Created",
            &format!("Shipment {} has been created", shipment.id),
        );
        Ok(shipment)
    }

    /// Advance a shipment's status along the lifecycle table.
    ///
    /// Progress is raised to the new status's floor; regressions fail
    /// with [`CoordError::InvalidShipmentTransition`].
    pub fn update_status(
        &self,
        id: ShipmentId,
        new_status: ShipmentStatus,
    ) -> Result<Shipment, CoordError> {
        let mut shipment = self
            .store
            .get_shipment(&id)
            .ok_or(CoordError::UnknownShipment(id))?;
        shipment.status = validate_status_transition(shipment.status, new_status)?;
        if let Some(floor) = new_status.progress_floor() {
            shipment.progress = shipment.progress.max(floor);
        }
        shipment.updated_at = Utc::now();
        self.store.upsert_shipment(shipment.clone())?;
        self.notifier.emit(
            NotificationKind::Info,
            "Status Updated",
            &format!("Shipment {} is now {}", shipment.id, shipment.status),
        );
        Ok(shipment)
    }

    /// Enqueue a carrier request for a transporter to decide on.
    pub fn submit_carrier_request(
        &self,
        request: CarrierRequest,
    ) -> Result<CarrierRequest, CoordError> {
        if request.origin.trim().is_empty() {
            return Err(ValidationError::new("origin", "must not be empty").into());
        }
        if request.destination.trim().is_empty() {
            return Err(ValidationError::new("destination", "must not be empty").into());
        }
        if request.weight_kg == 0 {
            return Err(ValidationError::new("weight_kg", "must be greater than zero").into());
        }
        if request.delivery_date < request.pickup_date {
            return Err(
                ValidationError::new("delivery_date", "must not precede pickup date").into(),
            );
        }
        self.store.push_request(request.clone());
        self.notifier.emit(
            NotificationKind::Info,
            "Carrier Request Submitted",
            &format!(
                "{} → {} for {}",
                request.origin, request.destination, request.transporter
            ),
        );
        Ok(request)
    }

    /// Decide a pending carrier request. One-shot and non-retriable: the
    /// request leaves the queue whichever way the decision goes, and a
    /// second decision fails with [`CoordError::UnknownCarrierRequest`].
    ///
    /// Accepting materializes a pending shipment with no vehicle assigned
    /// yet; declining creates nothing.
    pub fn decide_request(
        &self,
        id: CarrierRequestId,
        decision: RequestDecision,
    ) -> Result<Option<Shipment>, CoordError> {
        let request = self
            .store
            .take_request(&id)
            .ok_or(CoordError::UnknownCarrierRequest(id))?;

        match decision {
            RequestDecision::Decline => {
                tracing::info!(request = %id, "carrier request declined");
                self.notifier.emit(
                    NotificationKind::Info,
                    "Request Declined",
                    &format!("Request {} has been declined", id),
                );
                Ok(None)
            }
            RequestDecision::Accept => {
                let shipment_id = ShipmentId::new();
                let quote =
                    self.pricing
                        .estimate(request.mode, request.weight_kg, request.priority);
                let now = Utc::now();
                let shipment = Shipment {
                    id: shipment_id,
                    supplier: request.supplier,
                    customer: request.customer,
                    transporter: request.transporter,
                    mode: request.mode,
                    route: format!("{} → {}", request.origin, request.destination),
                    origin: request.origin,
                    destination: request.destination,
                    status: ShipmentStatus::Pending,
                    progress: 0,
                    eta: transit_window(request.mode),
                    cost: quote.cost,
                    carbon_kg: quote.carbon_kg,
                    risk: RiskLevel::from(request.priority),
                    disruption_probability: derive_disruption_probability(&shipment_id),
                    weight_kg: request.weight_kg,
                    priority: request.priority,
                    vehicle: None,
                    rating: None,
                    created_at: now,
                    updated_at: now,
                };
                self.store.upsert_shipment(shipment.clone())?;
                tracing::info!(request = %id, shipment = %shipment_id, "carrier request accepted");
                self.notifier.emit(
                    NotificationKind::Success,
                    "Request Accepted",
                    &format!("Request {} accepted as shipment {}", id, shipment_id),
                );
                Ok(Some(shipment))
            }
        }
    }

    /// Record a customer rating against a delivered shipment.
    pub fn submit_rating(
        &self,
        id: ShipmentId,
        score: u8,
        feedback: Option<String>,
    ) -> Result<Shipment, CoordError> {
        if !(1..=5).contains(&score) {
            return Err(ValidationError::new("rating", "must be between 1 and 5").into());
        }
        let mut shipment = self
            .store
            .get_shipment(&id)
            .ok_or(CoordError::UnknownShipment(id))?;
        if shipment.status != ShipmentStatus::Delivered {
            return Err(ValidationError::new(
                "rating",
                "only delivered shipments can be rated",
            )
            .into());
        }
        shipment.rating = Some(Rating {
            score,
            feedback,
            submitted_at: Utc::now(),
        });
        shipment.updated_at = Utc::now();
        self.store.upsert_shipment(shipment.clone())?;
        self.notifier.emit(
            NotificationKind::Success,
            "Rating Submitted",
            &format!("Shipment {} rated {}/5", shipment.id, score),
        );
        Ok(shipment)
    }
}

impl std::fmt::Debug for LifecycleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleController").finish_non_exhaustive()
    }
}

/// Fold a shipment id into a stable disruption probability (5–35%).
///
/// A pricing/forecast service would supply this in production; the fold
/// keeps the figure stable across reads instead of re-rolling.
fn derive_disruption_probability(id: &ShipmentId) -> u8 {
    let sum: u32 = id.as_uuid().as_bytes().iter().map(|b| u32::from(*b)).sum();
    (5 + (sum % 31)) as u8
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
