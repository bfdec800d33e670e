//! Metrics collection.
//!
//! # Metrics
//! - `ourchain_gateway_requests_total` (counter): ledger calls by path, outcome
//! - `ourchain_gateway_request_duration_seconds` (histogram): ledger round trip latency
//! - `ourchain_pipeline_total` (counter): completed flows by kind, outcome
//!
//! The library only emits through the `metrics` facade; without an
//! installed recorder every call is a no-op.

use std::time::Duration;

fn outcome(ok: bool) -> &'static str {
    if ok {
        "success"
    } else {
        "error"
    }
}

/// Record one ledger round trip.
pub fn record_gateway_call(path: &str, ok: bool, elapsed: Duration) {
    metrics::counter!(
        "ourchain_gateway_requests_total",
        "path" => path.to_string(),
        "outcome" => outcome(ok)
    )
    .increment(1);
    metrics::histogram!(
        "ourchain_gateway_request_duration_seconds",
        "path" => path.to_string()
    )
    .record(elapsed.as_secs_f64());
}

/// Record the end of a transfer, deploy, or call flow.
pub fn record_pipeline(flow: &'static str, ok: bool) {
    metrics::counter!("ourchain_pipeline_total", "flow" => flow, "outcome" => outcome(ok))
        .increment(1);
}
