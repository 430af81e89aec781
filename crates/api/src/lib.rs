//! HTTP API server with observability for the fulfillment engine.
//!
//! Exposes the engine's order lifecycle operations to the surrounding admin
//! UI, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use engine::{FulfillmentEngine, InMemoryNotificationGateway, InMemorySettings};
use metrics_exporter_prometheus::PrometheusHandle;
use store::RecordStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: RecordStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", get(routes::orders::list::<S>))
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .route("/orders/{id}", delete(routes::orders::remove::<S>))
        .route("/orders/{id}/approve", post(routes::orders::approve::<S>))
        .route("/orders/{id}/reject", post(routes::orders::reject::<S>))
        .route("/orders/{id}/status", post(routes::orders::update_status::<S>))
        .route("/orders/bulk", post(routes::orders::bulk::<S>))
        .route("/settings", get(routes::settings::get::<S>))
        .route("/settings", put(routes::settings::update::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state over a record store, wiring the
/// in-memory notification gateway and settings.
pub fn create_default_state<S: RecordStore + Clone + 'static>(store: S) -> Arc<AppState<S>> {
    let notifier = InMemoryNotificationGateway::new();
    let settings = InMemorySettings::new();
    let engine = FulfillmentEngine::new(store.clone(), notifier, settings.clone());

    Arc::new(AppState {
        engine,
        settings,
        store,
    })
}
