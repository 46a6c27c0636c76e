//! Invocation entry point.
//!
//! Sequences resolver -> probe -> reporter and returns the probe outcome.
//! No error from the internals reaches the caller; the one failure channel
//! is the `Reason` field of an unavailable result.

use crate::config::{Config, Payload};
use crate::metrics::{HttpMetricsSink, MetricsSink};
use crate::probe::PostgresProbe;
use crate::report::ResultReporter;
use crate::result::ProbeResult;
use tracing::{info, warn};

/// Runs one complete invocation: resolves configuration from the payload and
/// process environment, probes the endpoint, reports metrics best-effort,
/// and returns the outcome.
pub async fn run(payload: &Payload) -> ProbeResult {
    let config = Config::from_invocation(payload);
    let sink = HttpMetricsSink::from_config(&config);
    run_with_sink(&config, &sink).await
}

/// Runs one invocation against an explicit sink.
///
/// Split out from [`run`] so callers and tests can substitute the sink
/// implementation.
pub async fn run_with_sink(config: &Config, sink: &dyn MetricsSink) -> ProbeResult {
    let result = PostgresProbe::new(config).execute().await;

    ResultReporter::new(config).report(sink, &result).await;

    match serde_json::to_string_pretty(&result) {
        Ok(body) => info!(
            database = config.database().unwrap_or("<unset>"),
            endpoint = %config.endpoint(),
            "port check result:\n{body}"
        ),
        Err(error) => warn!(%error, "failed to serialize probe result"),
    }

    result
}
