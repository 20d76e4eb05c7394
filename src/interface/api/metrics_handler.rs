//! Prometheus metrics handler

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and describe the metrics we emit
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_counter!(
        "outbound_calls_total",
        "Total number of outbound calls started"
    );
    describe_counter!(
        "outbound_calls_failed",
        "Total number of outbound call requests that failed, by reason"
    );
    describe_counter!(
        "inbound_calls_total",
        "Total number of inbound calls accepted from the carrier webhook"
    );
    describe_counter!(
        "inbound_calls_failed",
        "Total number of inbound call webhooks that failed, by reason"
    );
    describe_counter!(
        "actions_dispatched_total",
        "Total number of agent actions dispatched, by action type and outcome"
    );
    describe_counter!(
        "call_events_total",
        "Total number of call lifecycle events handled by the event sink"
    );
    describe_counter!(
        "event_sink_failures_total",
        "Total number of call events the event sink failed to record"
    );
    describe_gauge!(
        "active_calls",
        "Number of conversations currently running on the call engine"
    );

    Ok(handle)
}

/// HTTP metrics handler
pub async fn metrics_handler(
    axum::extract::State(prometheus_handle): axum::extract::State<PrometheusHandle>,
) -> Response {
    let metrics = prometheus_handle.render();
    (StatusCode::OK, metrics).into_response()
}
