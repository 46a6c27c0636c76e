//! Metric submission types and the sink abstraction.
//!
//! The sink is a trait so the reporter can be exercised against recording
//! and fault-injecting implementations; the production implementation POSTs
//! a JSON `PutMetricData`-shaped body to the configured HTTP endpoint.

use crate::config::Config;
use crate::{PortCheckError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// A key-value tag attached to a metric for later filtering and grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dimension {
    /// Dimension name
    pub name: String,
    /// Dimension value
    pub value: String,
}

/// Unit attached to a submitted metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetricUnit {
    /// Dimensionless value
    None,
    /// Value measured in milliseconds
    Milliseconds,
}

/// One named, dimensioned measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDatum {
    /// Metric name within the namespace
    pub metric_name: String,
    /// Tags for filtering and grouping
    pub dimensions: Vec<Dimension>,
    /// Unit of `value`
    pub unit: MetricUnit,
    /// Measured value
    pub value: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PutMetricDataRequest<'a> {
    namespace: &'a str,
    metric_data: &'a [MetricDatum],
}

/// Destination for metric submissions.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Submits one batch of metrics under the given namespace and returns
    /// the sink's request-tracking identifier.
    ///
    /// # Errors
    /// Returns an error when the submission cannot be delivered; callers
    /// treat this as best-effort and never propagate it.
    async fn put_metric_data(&self, namespace: &str, data: &[MetricDatum]) -> Result<String>;
}

/// HTTP implementation of [`MetricsSink`].
///
/// Submits to the endpoint resolved from `CW_METRICS_ENDPOINT`. An
/// unconfigured endpoint fails at submission time so the reporter can log
/// and swallow it like any other delivery failure.
pub struct HttpMetricsSink {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl HttpMetricsSink {
    /// Builds the sink from a resolved configuration
    pub fn from_config(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: config.metrics_endpoint().map(str::to_string),
        }
    }
}

#[async_trait]
impl MetricsSink for HttpMetricsSink {
    async fn put_metric_data(&self, namespace: &str, data: &[MetricDatum]) -> Result<String> {
        let endpoint = self.endpoint.as_deref().ok_or_else(|| {
            PortCheckError::configuration("CW_METRICS_ENDPOINT is not configured")
        })?;

        let body = PutMetricDataRequest {
            namespace,
            metric_data: data,
        };
        let response = self
            .client
            .post(endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| PortCheckError::metrics("request to metrics endpoint failed", e))?
            .error_for_status()
            .map_err(|e| PortCheckError::metrics("metrics endpoint rejected submission", e))?;

        let request_id = response
            .headers()
            .get("x-amzn-requestid")
            .or_else(|| response.headers().get("x-request-id"))
            .and_then(|value| value.to_str().ok())
            .unwrap_or("<none>")
            .to_string();
        Ok(request_id)
    }
}
