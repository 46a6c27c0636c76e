//! End-to-end handler scenarios against local listeners.
//!
//! These tests drive the full resolver -> probe -> reporter pipeline using
//! sockets bound on loopback, so refusal and timeout behavior is
//! deterministic without a real database.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use portcheck_core::{
    config::{keys, Config, EnvSnapshot, Payload},
    handler, Dimension, MetricDatum, MetricsSink, Result,
};
use serde_json::json;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct RecordingSink {
    calls: Mutex<Vec<(String, Vec<MetricDatum>)>>,
}

impl RecordingSink {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, Vec<MetricDatum>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetricsSink for RecordingSink {
    async fn put_metric_data(&self, namespace: &str, data: &[MetricDatum]) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((namespace.to_string(), data.to_vec()));
        Ok("req-e2e".to_string())
    }
}

fn payload_of(entries: &[(&str, serde_json::Value)]) -> Payload {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

/// Binds and drops a loopback listener to obtain a port nothing listens on.
async fn closed_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

#[tokio::test]
async fn unreachable_default_host_reports_unavailable() {
    // Empty payload apart from pointing the default endpoint at a port with
    // nothing behind it; everything else resolves through defaults.
    let port = closed_port().await;
    let payload = payload_of(&[
        (keys::RDS_HOSTNAME, json!("127.0.0.1")),
        (keys::RDS_PORT, json!(port)),
        (keys::TIMEOUT, json!(5)),
    ]);
    let config = Config::resolve(&payload, &EnvSnapshot::new());
    let sink = RecordingSink::new();

    let result = handler::run_with_sink(&config, &sink).await;

    assert!(!result.is_available());
    let serialized = serde_json::to_value(&result).unwrap();
    assert_eq!(serialized["Available"], 0);
    assert!(serialized["Reason"].as_str().unwrap().contains("Database connection failed"));
    assert!(serialized.get("TimeTaken").is_none());
}

#[tokio::test]
async fn silent_endpoint_times_out_within_deadline() {
    // The listener accepts at the TCP level but never completes the
    // handshake, so only the configured deadline can end the attempt.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let payload = payload_of(&[
        (keys::RDS_HOSTNAME, json!("127.0.0.1")),
        (keys::RDS_PORT, json!(port)),
        (keys::TIMEOUT, json!(1)),
    ]);
    let config = Config::resolve(&payload, &EnvSnapshot::new());
    let sink = RecordingSink::new();

    let started = Instant::now();
    let result = handler::run_with_sink(&config, &sink).await;
    drop(listener);

    assert!(!result.is_available());
    assert!(result.reason().unwrap().contains("timed out"));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn defaulted_reporting_submits_once_with_namespace_and_dimension() {
    // REPORT_AS_CW_METRICS is left unset so the "1" default applies.
    let port = closed_port().await;
    let payload = payload_of(&[
        (keys::RDS_HOSTNAME, json!("127.0.0.1")),
        (keys::RDS_PORT, json!(port)),
        (keys::TIMEOUT, json!(5)),
    ]);
    let config = Config::resolve(&payload, &EnvSnapshot::new());
    let sink = RecordingSink::new();

    let result = handler::run_with_sink(&config, &sink).await;

    let calls = sink.calls();
    assert_eq!(calls.len(), 1);
    let (namespace, data) = &calls[0];
    assert_eq!(namespace, "TcpPortCheck");
    let expected = Dimension {
        name: "Endpoint".to_string(),
        value: format!("127.0.0.1:{port}"),
    };
    assert!(data.iter().all(|datum| datum.dimensions == vec![expected.clone()]));

    // The unavailable outcome must not carry TimeTaken to the sink either.
    assert!(!result.is_available());
    assert!(data.iter().all(|datum| datum.metric_name != "TimeTaken"));
}

#[tokio::test]
async fn disabled_reporting_makes_no_sink_calls() {
    let port = closed_port().await;
    let payload = payload_of(&[
        (keys::RDS_HOSTNAME, json!("127.0.0.1")),
        (keys::RDS_PORT, json!(port)),
        (keys::TIMEOUT, json!(5)),
        (keys::REPORT_AS_CW_METRICS, json!("0")),
    ]);
    let config = Config::resolve(&payload, &EnvSnapshot::new());
    let sink = RecordingSink::new();

    handler::run_with_sink(&config, &sink).await;
    assert!(sink.calls().is_empty());
}

#[tokio::test]
#[ignore = "requires a reachable PostgreSQL instance configured via RDS_* environment variables"]
async fn live_database_reports_available_with_elapsed_time() {
    let config = Config::from_invocation(&Payload::new());
    let sink = RecordingSink::new();

    let result = handler::run_with_sink(&config, &sink).await;

    assert!(result.is_available(), "reason: {:?}", result.reason());
    let serialized = serde_json::to_value(&result).unwrap();
    assert_eq!(serialized["Available"], 1);
    assert!(serialized["TimeTaken"].as_u64().is_some());

    let calls = sink.calls();
    assert_eq!(calls.len(), 1);
    let (_, data) = &calls[0];
    assert!(data.iter().any(|datum| datum.metric_name == "TimeTaken"));
}
