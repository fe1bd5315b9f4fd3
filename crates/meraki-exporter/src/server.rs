// ── Scrape endpoint ──
//
// Reads the shared registry on every request. Never waits on, or triggers,
// a collection cycle.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tracing::error;

use meraki_core::ExporterMetrics;
use meraki_core::metrics::CONTENT_TYPE;

pub fn router(metrics: Arc<ExporterMetrics>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(metrics)
}

async fn root_handler() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head><title>Meraki Exporter</title></head>
<body>
    <h1>Meraki Exporter</h1>
    <p>Prometheus exporter for Cisco Meraki Dashboard device health and uplink quality.</p>
    <ul>
        <li><a href="/metrics">/metrics</a> - Prometheus metrics</li>
        <li><a href="/health">/health</a> - Health check</li>
    </ul>
</body>
</html>"#,
    )
}

async fn metrics_handler(State(metrics): State<Arc<ExporterMetrics>>) -> Response {
    match metrics.encode() {
        Ok(body) => ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            error!(error = %e, "failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to encode metrics: {e}"),
            )
                .into_response()
        }
    }
}

async fn health_handler() -> &'static str {
    "OK"
}
