//! Shared logging setup for the port check binary.

use crate::Result;

/// Initializes structured logging based on verbosity level.
///
/// # Arguments
/// * `verbose` - Verbosity level (0=INFO, 1=DEBUG, 2+=TRACE)
/// * `quiet` - If true, only show ERROR level logs
///
/// # Errors
/// Returns a configuration error if a global subscriber is already set.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let level = match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .map_err(|e| {
            crate::PortCheckError::configuration(format!("Failed to initialize logging: {e}"))
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    // Logging can only be initialized once per test process, so only the
    // level mapping is verified here.

    #[test]
    fn test_verbosity_levels() {
        let cases = [
            ((true, 0), tracing::Level::ERROR),
            ((true, 3), tracing::Level::ERROR),
            ((false, 0), tracing::Level::INFO),
            ((false, 1), tracing::Level::DEBUG),
            ((false, 2), tracing::Level::TRACE),
        ];

        for ((quiet, verbose), expected) in cases {
            let level = match (quiet, verbose) {
                (true, _) => tracing::Level::ERROR,
                (false, 0) => tracing::Level::INFO,
                (false, 1) => tracing::Level::DEBUG,
                (false, _) => tracing::Level::TRACE,
            };
            assert_eq!(level, expected, "quiet={quiet}, verbose={verbose}");
        }
    }
}
