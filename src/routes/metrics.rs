//! Prometheus metrics
//!
//! The exporter runs on its own listener (`METRICS_ADDR`) because every path
//! on the main listener belongs to the proxy.

use std::net::SocketAddr;

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;

/// Install the Prometheus exporter if an address is configured
///
/// Must be called from within the tokio runtime. Without an exporter the
/// recording functions below are no-ops.
pub fn init_metrics(addr: Option<SocketAddr>) -> Result<()> {
    let Some(addr) = addr else {
        return Ok(());
    };

    PrometheusBuilder::new().with_http_listener(addr).install()?;
    register_metrics();
    info!(addr = %addr, "Prometheus exporter listening");
    Ok(())
}

/// Register all custom metrics
fn register_metrics() {
    metrics::describe_counter!(
        "keyrelay_requests_total",
        "Total number of requests processed"
    );
    metrics::describe_histogram!(
        "keyrelay_request_duration_seconds",
        "Time until the response head is ready, in seconds"
    );
}

/// Record a handled request
pub fn record_request(branch: &str, status: u16, duration_secs: f64) {
    metrics::counter!(
        "keyrelay_requests_total",
        "branch" => branch.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("keyrelay_request_duration_seconds", "branch" => branch.to_string())
        .record(duration_secs);
}
