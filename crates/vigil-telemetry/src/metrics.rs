//! Prometheus metrics for Vigil.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `vigil_authz_decisions_total` | Counter | `outcome` | Authorization decisions |
//! | `vigil_authz_decision_duration_seconds` | Histogram | `outcome` | Decision latency |
//! | `vigil_visible_namespaces` | Histogram | - | Namespaces returned per visibility call |
//!
//! Recording functions are safe to call before [`init_metrics`]; the `metrics`
//! facade discards observations until a recorder is installed.

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::Duration;

/// Global metrics handle for rendering.
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Name of the decision counter.
pub const DECISIONS_TOTAL: &str = "vigil_authz_decisions_total";

/// Name of the decision latency histogram.
pub const DECISION_DURATION: &str = "vigil_authz_decision_duration_seconds";

/// Name of the visibility result-size histogram.
pub const VISIBLE_NAMESPACES: &str = "vigil_visible_namespaces";

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,

    /// Address to expose metrics on (e.g., "0.0.0.0:9090").
    pub addr: String,

    /// Histogram buckets for decision duration, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            addr: "0.0.0.0:9090".to_string(),
            // Decisions are store round-trips: 100us up to 1s.
            duration_buckets: vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0],
        }
    }
}

/// Initializes the metrics subsystem and starts the Prometheus listener.
///
/// Must be called from within a Tokio runtime; the listener runs on it.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidAddress`] for an unparsable address and
/// [`TelemetryError::Recorder`] if there is no runtime or the recorder cannot
/// be installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let addr: SocketAddr = config
        .addr
        .parse()
        .map_err(|e| TelemetryError::invalid_address(&config.addr, e))?;

    let runtime = tokio::runtime::Handle::try_current()
        .map_err(|_| TelemetryError::recorder("the Prometheus listener requires a Tokio runtime"))?;

    let (recorder, exporter) = PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Full(DECISION_DURATION.to_string()),
            &config.duration_buckets,
        )
        .map_err(TelemetryError::recorder)?
        .build()
        .map_err(TelemetryError::recorder)?;

    let handle = recorder.handle();
    metrics::set_global_recorder(recorder)
        .map_err(TelemetryError::recorder)?;

    runtime.spawn(async move {
        if let Err(e) = exporter.await {
            tracing::warn!(error = ?e, "prometheus exporter stopped");
        }
    });

    let _ = METRICS_HANDLE.set(handle);

    register_metric_descriptions();

    Ok(())
}

/// Renders metrics in Prometheus format.
///
/// Returns `None` if metrics are not initialized.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

fn register_metric_descriptions() {
    describe_counter!(DECISIONS_TOTAL, "Total authorization decisions by outcome");
    describe_histogram!(
        DECISION_DURATION,
        "Authorization decision duration in seconds"
    );
    describe_histogram!(
        VISIBLE_NAMESPACES,
        "Number of namespaces visible to the caller per listing"
    );
}

/// Records one authorization decision.
///
/// `outcome` is one of `allowed`, `denied`, `role_not_found` or `internal`.
pub fn record_authz_decision(outcome: &'static str, duration: Duration) {
    counter!(DECISIONS_TOTAL, "outcome" => outcome).increment(1);
    histogram!(DECISION_DURATION, "outcome" => outcome).record(duration.as_secs_f64());
}

/// Records the size of one namespace visibility result.
pub fn record_visible_namespaces(visible: usize) {
    histogram!(VISIBLE_NAMESPACES).record(visible as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.addr, "0.0.0.0:9090");
        assert!(config.duration_buckets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_record_functions_dont_panic() {
        record_authz_decision("allowed", Duration::from_micros(250));
        record_authz_decision("denied", Duration::from_millis(2));
        record_visible_namespaces(3);
    }

    #[test]
    fn test_invalid_address() {
        let config = MetricsConfig {
            addr: "not-an-address".to_string(),
            ..Default::default()
        };
        let err = init_metrics(&config).unwrap_err();
        assert!(matches!(err, TelemetryError::InvalidAddress { .. }));
    }

    #[test]
    fn test_disabled_metrics() {
        let config = MetricsConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(init_metrics(&config).is_ok());
        assert!(render_metrics().is_none());
    }
}
