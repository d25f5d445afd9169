//! # End-to-End API Scenario: A Storm Over I-80
//!
//! One test function, six acts, one story: a supplier books an urgent
//! truck shipment from NYC to LA, the transporter dispatches it, a
//! snowstorm raises a disruption, the operator reroutes onto an
//! alternative corridor, the shipment completes delivery, and the
//! customer rates it. Exercises the full HTTP surface as a unified
//! system — every act reads the state the previous act produced.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use fm_api::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn test_app() -> axum::Router {
    fm_api::app(AppState::new())
}

/// Parse a response body as JSON.
async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Build a POST request with a JSON body.
fn post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a GET request.
fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Build a DELETE request.
fn del(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// ---------------------------------------------------------------------------
// The scenario
// ---------------------------------------------------------------------------

#[tokio::test]
async fn storm_over_i80_full_coordination_story() {
    let app = test_app();

    // ── Act 1: the supplier books an urgent shipment ─────────────────
    let response = app
        .clone()
        .oneshot(post(
            "/v1/shipments",
            serde_json::json!({
                "supplier": "S-001",
                "customer": "C-001",
                "transporter": "T-001",
                "origin": "NYC",
                "destination": "LA",
                "weight_kg": 500,
                "priority": "urgent",
                "mode": "truck"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let shipment = body_json(response).await["shipment"].clone();
    let shipment_id = shipment["id"].as_str().unwrap().to_string();
    assert_eq!(shipment["status"], "pending");
    assert_eq!(shipment["risk"], "high");

    // Every role sees the same record.
    for query in [
        "/v1/shipments?role=supplier&party=S-001",
        "/v1/shipments?role=transporter&party=T-001",
        "/v1/shipments?role=customer&party=C-001",
    ] {
        let listing = app.clone().oneshot(get(query)).await.unwrap();
        assert_eq!(body_json(listing).await["total"], 1, "projection {query}");
    }

    // ── Act 2: the transporter dispatches and gets moving ────────────
    for status in ["dispatched", "in-transit"] {
        let response = app
            .clone()
            .oneshot(post(
                &format!("/v1/shipments/{shipment_id}/status"),
                serde_json::json!({ "status": status }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "advance to {status}");
    }

    // ── Act 3: a snowstorm raises a disruption ───────────────────────
    let response = app
        .clone()
        .oneshot(post(
            "/v1/disruptions",
            serde_json::json!({
                "shipment_id": shipment_id,
                "kind": "Severe Weather Alert",
                "description": "Heavy snowstorm causing delays on I-80 in Wyoming",
                "delay_min_hours": 12,
                "delay_max_hours": 24,
                "severity": "high",
                "location": "I-80, WY",
                "suggestions": ["Reroute shipment", "Delay delivery", "Contact customer"]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let disruption = body_json(response).await["disruption"].clone();
    let disruption_id = disruption["id"].as_str().unwrap().to_string();
    assert_eq!(disruption["status"], "active");

    // The customer's disruption feed carries it too.
    let listing = app
        .clone()
        .oneshot(get("/v1/disruptions?role=customer&party=C-001"))
        .await
        .unwrap();
    assert_eq!(body_json(listing).await["total"], 1);

    // The operator acknowledges.
    let response = app
        .clone()
        .oneshot(post(
            &format!("/v1/disruptions/{disruption_id}/acknowledge"),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["disruption"]["status"], "acknowledged");

    // ── Act 4: a first reroute look is abandoned, free of charge ─────
    let session = app
        .clone()
        .oneshot(post(
            &format!("/v1/disruptions/{disruption_id}/reroute"),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(session.status(), StatusCode::OK);

    let abandoned = app
        .clone()
        .oneshot(del(&format!("/v1/disruptions/{disruption_id}/reroute")))
        .await
        .unwrap();
    assert_eq!(abandoned.status(), StatusCode::NO_CONTENT);

    // Abandonment left no partial writes.
    let check = app
        .clone()
        .oneshot(get(&format!("/v1/shipments/{shipment_id}")))
        .await
        .unwrap();
    assert_eq!(body_json(check).await["shipment"]["route"], "NYC → LA");

    // ── Act 5: the reroute is requested again and committed ──────────
    let session = app
        .clone()
        .oneshot(post(
            &format!("/v1/disruptions/{disruption_id}/reroute"),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    let candidates = body_json(session).await["candidates"].clone();
    let candidates = candidates.as_array().unwrap();
    assert!(!candidates.is_empty());

    // A congested corridor is on offer but must be refused.
    if let Some(congested) = candidates.iter().find(|c| c["availability"] == "congested") {
        let refused = app
            .clone()
            .oneshot(post(
                &format!("/v1/disruptions/{disruption_id}/reroute/apply"),
                serde_json::json!({ "candidate_id": congested["id"] }),
            ))
            .await
            .unwrap();
        assert_eq!(refused.status(), StatusCode::CONFLICT);
        assert_eq!(
            body_json(refused).await["error"]["code"],
            "ROUTE_UNAVAILABLE"
        );
    }

    let chosen = candidates
        .iter()
        .find(|c| c["availability"] == "available")
        .expect("available candidate")
        .clone();
    let applied = app
        .clone()
        .oneshot(post(
            &format!("/v1/disruptions/{disruption_id}/reroute/apply"),
            serde_json::json!({ "candidate_id": chosen["id"] }),
        ))
        .await
        .unwrap();
    assert_eq!(applied.status(), StatusCode::OK);
    let rerouted = body_json(applied).await["shipment"].clone();
    assert_eq!(rerouted["route"], chosen["name"]);
    assert_eq!(rerouted["cost"], chosen["cost"]);
    assert_eq!(rerouted["carbon_kg"], chosen["carbon_kg"]);
    assert_eq!(rerouted["risk"], chosen["risk"]);

    // The disruption is gone from the active set.
    let listing = app.clone().oneshot(get("/v1/disruptions")).await.unwrap();
    assert_eq!(body_json(listing).await["total"], 0);

    // ── Act 6: delivery and rating ───────────────────────────────────
    let response = app
        .clone()
        .oneshot(post(
            &format!("/v1/shipments/{shipment_id}/status"),
            serde_json::json!({ "status": "delivered" }),
        ))
        .await
        .unwrap();
    let delivered = body_json(response).await["shipment"].clone();
    assert_eq!(delivered["status"], "delivered");
    assert_eq!(delivered["progress"], 100);

    let response = app
        .clone()
        .oneshot(post(
            &format!("/v1/shipments/{shipment_id}/rating"),
            serde_json::json!({ "score": 5, "feedback": "made it despite the storm" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let rated = body_json(response).await["shipment"].clone();
    assert_eq!(rated["rating"]["score"], 5);

    // A delivered shipment is terminal.
    let regress = app
        .oneshot(post(
            &format!("/v1/shipments/{shipment_id}/status"),
            serde_json::json!({ "status": "pending" }),
        ))
        .await
        .unwrap();
    assert_eq!(regress.status(), StatusCode::CONFLICT);
}
