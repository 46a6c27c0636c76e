//! Probe outcome model.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Outcome of one connectivity attempt.
///
/// The two variants make the contract's mutual-exclusivity invariant hold by
/// construction: elapsed time exists only for a reachable endpoint, a failure
/// reason only for an unreachable one.
///
/// Serializes to the invocation output mapping: `Available` is numeric `1`
/// or `0`, joined by `TimeTaken` (milliseconds) on success or `Reason` on
/// failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// The endpoint accepted an authenticated connection
    Available {
        /// Elapsed wall-clock milliseconds, floored
        time_taken_millis: u64,
    },
    /// The connection attempt failed
    Unavailable {
        /// Human-readable description including the underlying cause
        reason: String,
    },
}

impl ProbeResult {
    /// Creates a successful outcome
    pub fn available(time_taken_millis: u64) -> Self {
        Self::Available { time_taken_millis }
    }

    /// Creates a failed outcome
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Whether the endpoint was reachable
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// Elapsed milliseconds, present only on success
    pub fn time_taken_millis(&self) -> Option<u64> {
        match self {
            Self::Available { time_taken_millis } => Some(*time_taken_millis),
            Self::Unavailable { .. } => None,
        }
    }

    /// Failure description, present only on failure
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Available { .. } => None,
            Self::Unavailable { reason } => Some(reason.as_str()),
        }
    }
}

impl Serialize for ProbeResult {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        match self {
            Self::Available { time_taken_millis } => {
                map.serialize_entry("Available", &1u8)?;
                map.serialize_entry("TimeTaken", time_taken_millis)?;
            }
            Self::Unavailable { reason } => {
                map.serialize_entry("Available", &0u8)?;
                map.serialize_entry("Reason", reason)?;
            }
        }
        map.end()
    }
}
