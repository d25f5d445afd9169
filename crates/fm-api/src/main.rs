//! Freightmesh coordination API server.
//!
//! In-memory engine behind an Axum surface — no database, no external
//! services. Data is lost on restart; persistence belongs to a separate
//! layer.

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use fm_api::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr: SocketAddr = std::env::var("FM_BIND_ADDR")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)));

    let state = AppState::new();
    let app = fm_api::app(state);

    tracing::info!("fm-api listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
