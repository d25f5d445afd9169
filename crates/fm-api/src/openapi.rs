//! OpenAPI document assembly via utoipa derive macros.

use utoipa::OpenApi;

use crate::error;
use crate::routes::{disruptions, notifications, requests, shipments};

/// Aggregated OpenAPI 3 document for the command/query surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Freightmesh Coordination API",
        description = "Shipment lifecycle, disruption handling, and reroute coordination for suppliers, transporters, and customers."
    ),
    paths(
        shipments::create_shipment,
        shipments::list_shipments,
        shipments::get_shipment,
        shipments::update_status,
        shipments::submit_rating,
        disruptions::raise_disruption,
        disruptions::list_disruptions,
        disruptions::acknowledge,
        disruptions::escalate,
        disruptions::resolve,
        disruptions::customer_notified,
        disruptions::request_reroute,
        disruptions::apply_reroute,
        disruptions::abandon_reroute,
        requests::submit_request,
        requests::list_requests,
        requests::decide_request,
        notifications::list_notifications,
    ),
    components(schemas(
        error::ErrorBody,
        error::ErrorDetail,
        shipments::CreateShipmentRequest,
        shipments::UpdateStatusRequest,
        shipments::SubmitRatingRequest,
        shipments::ShipmentResponse,
        shipments::ShipmentListResponse,
        disruptions::RaiseDisruptionRequest,
        disruptions::ResolveDisruptionRequest,
        disruptions::ApplyRerouteRequest,
        disruptions::DisruptionResponse,
        disruptions::DisruptionListResponse,
        disruptions::RouteCandidatesResponse,
        disruptions::RerouteAppliedResponse,
        requests::SubmitRequestRequest,
        requests::DecideRequestRequest,
        requests::CarrierRequestResponse,
        requests::CarrierRequestListResponse,
        requests::DecisionResponse,
        notifications::NotificationListResponse,
    )),
    tags(
        (name = "shipments", description = "Shipment lifecycle commands and queries"),
        (name = "disruptions", description = "Disruption alert handling"),
        (name = "reroute", description = "Reroute sessions and commits"),
        (name = "requests", description = "Carrier request queue"),
        (name = "notifications", description = "Transient notification polling"),
    )
)]
pub struct ApiDoc;
