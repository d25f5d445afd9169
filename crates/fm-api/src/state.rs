//! Shared application state: the wired coordination engine.

use std::sync::Arc;

use fm_coord::{
    DisruptionRegistry, EntityStore, LifecycleController, NotificationHub, NotificationSink,
    PricingEstimator, RerouteResolver, RouteCandidateSource, SyntheticRouteSource, TariffTable,
};

/// Engine components shared across request handlers.
///
/// Cheap to clone — everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EntityStore>,
    pub lifecycle: Arc<LifecycleController>,
    pub disruptions: Arc<DisruptionRegistry>,
    pub reroute: Arc<RerouteResolver>,
    pub notifications: Arc<NotificationHub>,
}

impl AppState {
    /// Wire the engine with its default collaborators: the synthetic
    /// route source and the flat tariff table.
    pub fn new() -> Self {
        Self::with_collaborators(
            Arc::new(SyntheticRouteSource::new()),
            Arc::new(TariffTable::new()),
        )
    }

    /// Wire the engine with explicit collaborator implementations.
    pub fn with_collaborators(
        source: Arc<dyn RouteCandidateSource>,
        pricing: Arc<dyn PricingEstimator>,
    ) -> Self {
        let store = Arc::new(EntityStore::new());
        let notifications = Arc::new(NotificationHub::new());
        let sink: Arc<dyn NotificationSink> = notifications.clone();

        Self {
            lifecycle: Arc::new(LifecycleController::new(
                Arc::clone(&store),
                pricing,
                Arc::clone(&sink),
            )),
            disruptions: Arc::new(DisruptionRegistry::new(
                Arc::clone(&store),
                Arc::clone(&sink),
            )),
            reroute: Arc::new(RerouteResolver::new(
                Arc::clone(&store),
                source,
                Arc::clone(&sink),
            )),
            store,
            notifications,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
