//! Layered configuration resolution.
//!
//! Every tunable is resolved per key through a fixed precedence chain:
//! invocation payload, then process environment, then built-in default. A key
//! absent from all three sources resolves to `None` rather than an error; the
//! downstream consumer (usually the probe) surfaces the gap as a failure.
//!
//! Resolution is a pure function over an environment snapshot so precedence
//! is testable without mutating process-wide state.

use crate::secret::Secret;
use crate::{PortCheckError, Result};
use std::collections::HashMap;
use std::time::Duration;

/// Raw invocation payload: a JSON object of string keys to string or number
/// values. Unrecognized keys are ignored; non-scalar values are treated as
/// absent.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Snapshot of the process environment taken at resolution time.
pub type EnvSnapshot = HashMap<String, String>;

/// Recognized configuration keys.
pub mod keys {
    /// Probe timeout in seconds
    pub const TIMEOUT: &str = "TIMEOUT";
    /// Enable metric reporting (`"1"` enables)
    pub const REPORT_AS_CW_METRICS: &str = "REPORT_AS_CW_METRICS";
    /// Namespace for submitted metrics
    pub const CW_METRICS_NAMESPACE: &str = "CW_METRICS_NAMESPACE";
    /// HTTP(S) URL of the metrics ingestion endpoint
    pub const CW_METRICS_ENDPOINT: &str = "CW_METRICS_ENDPOINT";
    /// Target database name
    pub const RDS_DATABASE: &str = "RDS_DATABASE";
    /// Target host
    pub const RDS_HOSTNAME: &str = "RDS_HOSTNAME";
    /// Target port
    pub const RDS_PORT: &str = "RDS_PORT";
    /// Connection username
    pub const RDS_USERNAME: &str = "RDS_USERNAME";
    /// Connection password
    pub const RDS_PASSWORD: &str = "RDS_PASSWORD";
}

/// Built-in default for a key, the lowest-precedence source.
///
/// The default password is a placeholder preserved for compatibility with
/// existing deployments; operators are expected to override it through the
/// payload or environment. `CW_METRICS_ENDPOINT` deliberately has no default
/// so that metric submission fails softly when the sink is not configured.
fn default_for(key: &str) -> Option<&'static str> {
    match key {
        keys::TIMEOUT => Some("120"),
        keys::REPORT_AS_CW_METRICS => Some("1"),
        keys::CW_METRICS_NAMESPACE => Some("TcpPortCheck"),
        keys::RDS_DATABASE => Some("leases16"),
        keys::RDS_HOSTNAME => Some("localhost"),
        keys::RDS_PORT => Some("5432"),
        keys::RDS_USERNAME => Some("leases16"),
        keys::RDS_PASSWORD => Some("leases16password"),
        _ => None,
    }
}

/// Coerces a payload value to its string rendering.
///
/// Strings pass through, numbers render as written; anything else falls
/// through to the next source.
fn coerce(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Resolves one key through the precedence chain.
fn lookup(key: &str, payload: &Payload, env: &EnvSnapshot) -> Option<String> {
    if let Some(value) = payload.get(key).and_then(coerce) {
        return Some(value);
    }
    if let Some(value) = env.get(key) {
        return Some(value.clone());
    }
    default_for(key).map(str::to_string)
}

/// Immutable snapshot of all tunables for one invocation.
///
/// # Security
/// The password is held in a [`Secret`] and masked in `Debug` output; no
/// method of this type ever renders it.
#[derive(Debug, Clone)]
pub struct Config {
    timeout: Option<String>,
    report_as_cw_metrics: Option<String>,
    cw_metrics_namespace: Option<String>,
    cw_metrics_endpoint: Option<String>,
    rds_database: Option<String>,
    rds_hostname: Option<String>,
    rds_port: Option<String>,
    rds_username: Option<String>,
    rds_password: Option<Secret>,
}

impl Config {
    /// Resolves a configuration from the payload and an explicit environment
    /// snapshot. Never fails; missing keys resolve to their defaults or to
    /// `None`.
    pub fn resolve(payload: &Payload, env: &EnvSnapshot) -> Self {
        Self {
            timeout: lookup(keys::TIMEOUT, payload, env),
            report_as_cw_metrics: lookup(keys::REPORT_AS_CW_METRICS, payload, env),
            cw_metrics_namespace: lookup(keys::CW_METRICS_NAMESPACE, payload, env),
            cw_metrics_endpoint: lookup(keys::CW_METRICS_ENDPOINT, payload, env),
            rds_database: lookup(keys::RDS_DATABASE, payload, env),
            rds_hostname: lookup(keys::RDS_HOSTNAME, payload, env),
            rds_port: lookup(keys::RDS_PORT, payload, env),
            rds_username: lookup(keys::RDS_USERNAME, payload, env),
            rds_password: lookup(keys::RDS_PASSWORD, payload, env).map(Secret::new),
        }
    }

    /// Resolves a configuration from the payload and the live process
    /// environment.
    pub fn from_invocation(payload: &Payload) -> Self {
        let env: EnvSnapshot = std::env::vars().collect();
        Self::resolve(payload, &env)
    }

    /// Probe timeout as a duration.
    ///
    /// # Errors
    /// Returns a configuration error when the resolved value is missing, not
    /// an integer, or zero. The probe converts this into an unavailable
    /// result; the resolver itself never raises.
    pub fn timeout(&self) -> Result<Duration> {
        let raw = self
            .timeout
            .as_deref()
            .ok_or_else(|| PortCheckError::configuration("TIMEOUT is not configured"))?;
        let seconds: u64 = raw.parse().map_err(|_| {
            PortCheckError::configuration(format!("TIMEOUT is not a valid number of seconds: {raw}"))
        })?;
        if seconds == 0 {
            return Err(PortCheckError::configuration(
                "TIMEOUT must be greater than 0",
            ));
        }
        Ok(Duration::from_secs(seconds))
    }

    /// Whether metric reporting is enabled (`REPORT_AS_CW_METRICS` == `"1"`).
    pub fn metrics_enabled(&self) -> bool {
        self.report_as_cw_metrics.as_deref() == Some("1")
    }

    /// Namespace for submitted metrics, if resolved.
    pub fn metrics_namespace(&self) -> Option<&str> {
        self.cw_metrics_namespace.as_deref()
    }

    /// URL of the metrics ingestion endpoint, if resolved.
    pub fn metrics_endpoint(&self) -> Option<&str> {
        self.cw_metrics_endpoint.as_deref()
    }

    /// Target database name, if resolved.
    pub fn database(&self) -> Option<&str> {
        self.rds_database.as_deref()
    }

    /// Target host, if resolved.
    pub fn hostname(&self) -> Option<&str> {
        self.rds_hostname.as_deref()
    }

    /// Target port as resolved text, if any.
    pub fn port(&self) -> Option<&str> {
        self.rds_port.as_deref()
    }

    /// Target port parsed for the transport layer.
    ///
    /// # Errors
    /// Returns a configuration error when missing or not a valid port number.
    pub fn port_number(&self) -> Result<u16> {
        let raw = self
            .rds_port
            .as_deref()
            .ok_or_else(|| PortCheckError::configuration("RDS_PORT is not configured"))?;
        raw.parse().map_err(|_| {
            PortCheckError::configuration(format!("RDS_PORT is not a valid port number: {raw}"))
        })
    }

    /// Connection username, if resolved.
    pub fn username(&self) -> Option<&str> {
        self.rds_username.as_deref()
    }

    /// Connection password, if resolved.
    pub fn password(&self) -> Option<&Secret> {
        self.rds_password.as_ref()
    }

    /// `host:port` label used for the metric dimension and log lines.
    /// Unresolved parts render as `<unset>`.
    pub fn endpoint(&self) -> String {
        format!(
            "{}:{}",
            self.hostname().unwrap_or("<unset>"),
            self.port().unwrap_or("<unset>")
        )
    }
}
