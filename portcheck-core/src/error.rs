//! Error types with credential sanitization.
//!
//! Every message produced here is safe to log: connection context names the
//! endpoint and database, never the credentials used to reach them.

use thiserror::Error;

/// Main error type for port check operations.
///
/// These errors never cross the handler boundary. The probe converts them
/// into an unavailable [`crate::ProbeResult`] and the reporter logs and
/// swallows them; the alias exists for the inner fallible seams.
#[derive(Debug, Error)]
pub enum PortCheckError {
    /// Database connection failed (credentials sanitized)
    #[error("Database connection failed: {context}")]
    Connection {
        /// Endpoint and database being probed
        context: String,
        /// Underlying driver error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The connection attempt exceeded the configured deadline
    #[error("Connection attempt timed out after {seconds}s")]
    Timeout {
        /// Configured upper bound in seconds
        seconds: u64,
    },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Human-readable description of the bad or missing value
        message: String,
    },

    /// Metric submission to the monitoring sink failed
    #[error("Metric submission failed: {context}")]
    Metrics {
        /// What the reporter was doing when the failure occurred
        context: String,
        /// Underlying transport error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Convenience type alias for Results with `PortCheckError`
pub type Result<T> = std::result::Result<T, PortCheckError>;

impl PortCheckError {
    /// Creates a connection error with sanitized context
    pub fn connection<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a metric submission error
    pub fn metrics<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Metrics {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Renders the error including its underlying cause, suitable for the
    /// `Reason` field of an unavailable result.
    pub fn reason(&self) -> String {
        match std::error::Error::source(self) {
            Some(cause) => format!("{self}: {cause}"),
            None => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_includes_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let error = PortCheckError::connection("leases16 at localhost:5432", io);
        let reason = error.reason();
        assert!(reason.contains("localhost:5432"));
        assert!(reason.contains("refused"));
    }

    #[test]
    fn test_timeout_reason_names_deadline() {
        let error = PortCheckError::Timeout { seconds: 1 };
        assert_eq!(error.reason(), "Connection attempt timed out after 1s");
    }

    #[test]
    fn test_configuration_has_no_source() {
        let error = PortCheckError::configuration("TIMEOUT is not a number");
        assert_eq!(error.reason(), "Configuration error: TIMEOUT is not a number");
    }
}
