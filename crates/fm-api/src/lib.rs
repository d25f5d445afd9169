//! # fm-api — Command/Query Surface for the Coordination Engine
//!
//! The presentation layer (dashboards, out of scope here) drives the
//! engine exclusively through this API. Commands flow one way (UI action
//! → handler → engine → store mutation) and state projections flow the
//! other (store → role-filtered read views).
//!
//! ## API Surface
//!
//! | Prefix | Module | Domain |
//! |--------|--------|--------|
//! | `/v1/shipments/*` | [`routes::shipments`] | Shipment lifecycle |
//! | `/v1/disruptions/*` | [`routes::disruptions`] | Disruptions and reroutes |
//! | `/v1/requests/*` | [`routes::requests`] | Carrier request queue |
//! | `/v1/notifications` | [`routes::notifications`] | Notification polling |
//!
//! Health probes (`/health/live`) and `/openapi.json` sit outside the
//! business routes. Request/response tracing via `tower_http::TraceLayer`.

pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::shipments::router())
        .merge(routes::disruptions::router())
        .merge(routes::requests::router())
        .merge(routes::notifications::router())
        .route("/openapi.json", get(openapi_json))
        .route("/health/live", get(health_live))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /openapi.json — the assembled OpenAPI document.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// GET /health/live — liveness probe.
async fn health_live() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
