//! Best-effort metric reporting.
//!
//! Translates a probe outcome into a metric submission and hands it to the
//! sink. Nothing escapes this boundary: a failed or misconfigured submission
//! is logged and swallowed, and a disabled reporter makes no sink calls at
//! all. The invocation's outcome is never affected by reporting.

use crate::config::Config;
use crate::metrics::{Dimension, MetricDatum, MetricUnit, MetricsSink};
use crate::result::ProbeResult;
use crate::{PortCheckError, Result};
use tracing::{debug, info, warn};

/// Publishes one probe outcome to the metrics sink.
pub struct ResultReporter<'a> {
    config: &'a Config,
}

impl<'a> ResultReporter<'a> {
    /// Creates a reporter over a resolved configuration
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Submits the outcome, best-effort.
    ///
    /// No-op when reporting is disabled. One synchronous submission, no
    /// retry; success logs the sink's request id, failure logs the error.
    pub async fn report(&self, sink: &dyn MetricsSink, result: &ProbeResult) {
        if !self.config.metrics_enabled() {
            debug!("metric reporting disabled, skipping submission");
            return;
        }

        match self.submit(sink, result).await {
            Ok(request_id) => info!(%request_id, "sent metric data to sink"),
            Err(error) => warn!(%error, "failed to publish metrics"),
        }
    }

    async fn submit(&self, sink: &dyn MetricsSink, result: &ProbeResult) -> Result<String> {
        let namespace = self.config.metrics_namespace().ok_or_else(|| {
            PortCheckError::configuration("CW_METRICS_NAMESPACE is not configured")
        })?;
        sink.put_metric_data(namespace, &self.metric_data(result))
            .await
    }

    /// `Available` is always emitted; `TimeTaken` only for a reachable
    /// endpoint.
    fn metric_data(&self, result: &ProbeResult) -> Vec<MetricDatum> {
        let dimensions = vec![Dimension {
            name: "Endpoint".to_string(),
            value: self.config.endpoint(),
        }];

        let mut data = vec![MetricDatum {
            metric_name: "Available".to_string(),
            dimensions: dimensions.clone(),
            unit: MetricUnit::None,
            value: if result.is_available() { 1.0 } else { 0.0 },
        }];

        if let Some(time_taken) = result.time_taken_millis() {
            #[allow(clippy::cast_precision_loss)]
            data.push(MetricDatum {
                metric_name: "TimeTaken".to_string(),
                dimensions,
                unit: MetricUnit::Milliseconds,
                value: time_taken as f64,
            });
        }

        data
    }
}
