//! Metrics collection and exposition.
//!
//! # Metrics
//! - `deployer_deployments_total` (counter): finished runs by result
//! - `deployer_confirmation_polls_total` (counter): chain polls by kind and result
//! - `deployer_confirmation_wait_seconds` (histogram): submit-to-confirmed time
//! - `deployer_verification_attempts_total` (counter): verifier calls by result
//! - `deployer_rpc_failures_total` (counter): failed RPC calls by method
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with an HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_deployment(result: &'static str) {
    ::metrics::counter!("deployer_deployments_total", "result" => result).increment(1);
}

pub fn record_confirmation_poll(kind: &'static str, ok: bool) {
    let result = if ok { "ok" } else { "error" };
    ::metrics::counter!(
        "deployer_confirmation_polls_total",
        "kind" => kind,
        "result" => result
    )
    .increment(1);
}

pub fn record_confirmation_wait(elapsed: Duration) {
    ::metrics::histogram!("deployer_confirmation_wait_seconds").record(elapsed.as_secs_f64());
}

pub fn record_verification_attempt(result: &'static str) {
    ::metrics::counter!("deployer_verification_attempts_total", "result" => result).increment(1);
}

pub fn record_rpc_failure(method: &'static str) {
    ::metrics::counter!("deployer_rpc_failures_total", "method" => method).increment(1);
}
