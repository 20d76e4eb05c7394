//! API Router configuration

use super::call_handler::{create_outbound_call, health_check, inbound_call, AppState};
use super::metrics_handler::metrics_handler;
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the API router. `/metrics` is only mounted when a Prometheus
/// handle is supplied.
pub fn build_router(state: AppState, prometheus_handle: Option<PrometheusHandle>) -> Router {
    let health_routes = Router::new().route("/health", get(health_check));

    let call_routes = Router::new()
        .route("/outbound", post(create_outbound_call))
        .route("/inbound_call", post(inbound_call));

    let mut router = Router::new()
        .merge(health_routes)
        .merge(call_routes)
        .with_state(state);

    if let Some(handle) = prometheus_handle {
        let metrics_routes = Router::new()
            .route("/metrics", get(metrics_handler))
            .with_state(handle);
        router = router.merge(metrics_routes);
    }

    router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
