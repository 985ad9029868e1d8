//! `GET /metrics` in Prometheus text format.
//!
//! Besides the HTTP counters this exposes the freight counters
//! `tariffs_created_total{mode}`, `quotations_created_total{mode}` and
//! `quotations_rejected_total{reason}`.

use axum::{extract::State, http::header, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}
