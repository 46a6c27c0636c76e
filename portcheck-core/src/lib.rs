//! Core types and operations for the RDS port check.
//!
//! This crate implements a single-pass connectivity probe against a
//! PostgreSQL endpoint: resolve configuration from layered sources, attempt
//! one timed authenticated connection, publish best-effort metrics to an
//! external sink, and hand the outcome back to the invoking trigger.
//!
//! # Security Guarantees
//! - Passwords are held in zeroizing containers and never logged
//! - All error messages are credential-free
//! - The probe is a pure client; no listening sockets, no persisted state
//!
//! # Architecture
//! - Configuration resolution is a pure function over an injected
//!   environment snapshot (payload -> environment -> defaults -> unset)
//! - Probe and reporter failures are converted to data or logs at their
//!   boundaries; nothing propagates past the handler

pub mod config;
pub mod error;
pub mod handler;
pub mod logging;
pub mod metrics;
pub mod probe;
pub mod report;
pub mod result;
pub mod secret;

// Re-export commonly used types
pub use config::{Config, EnvSnapshot, Payload};
pub use error::{PortCheckError, Result};
pub use metrics::{Dimension, HttpMetricsSink, MetricDatum, MetricUnit, MetricsSink};
pub use probe::PostgresProbe;
pub use report::ResultReporter;
pub use result::ProbeResult;
pub use secret::Secret;
