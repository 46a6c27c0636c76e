//! Timed PostgreSQL connectivity probe.
//!
//! One authenticated connection attempt, bounded by the configured timeout.
//! Success is measured as wall-clock milliseconds to an established
//! connection; no query is issued. Every failure mode (resolution, refusal,
//! authentication, protocol, deadline) is caught at this boundary and
//! converted into an unavailable [`ProbeResult`].

use crate::config::Config;
use crate::result::ProbeResult;
use crate::{PortCheckError, Result};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Executes the single timed connection attempt.
pub struct PostgresProbe<'a> {
    config: &'a Config,
}

impl<'a> PostgresProbe<'a> {
    /// Creates a probe over a resolved configuration
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Attempts one authenticated connection to the configured endpoint.
    ///
    /// This is the only blocking operation in an invocation; the configured
    /// timeout is a hard upper bound, enforced externally so the pending
    /// connect future is abandoned when the deadline fires. Never returns an
    /// error: failures become the `Unavailable` variant.
    pub async fn execute(&self) -> ProbeResult {
        let endpoint = self.config.endpoint();
        match self.try_connect().await {
            Ok(elapsed) => {
                info!(%endpoint, elapsed_millis = elapsed, "socket connect succeeded");
                ProbeResult::available(elapsed)
            }
            Err(error) => {
                warn!(
                    %endpoint,
                    database = self.config.database().unwrap_or("<unset>"),
                    %error,
                    "failed to connect"
                );
                ProbeResult::unavailable(error.reason())
            }
        }
    }

    async fn try_connect(&self) -> Result<u64> {
        let deadline = self.config.timeout()?;
        let options = self.connect_options()?;
        let started = Instant::now();

        match tokio::time::timeout(deadline, PgConnection::connect_with(&options)).await {
            Ok(Ok(connection)) => {
                let elapsed = elapsed_millis(started.elapsed());
                if let Err(error) = connection.close().await {
                    debug!(%error, "error closing probe connection");
                }
                Ok(elapsed)
            }
            Ok(Err(error)) => Err(PortCheckError::connection(self.context(), error)),
            Err(_) => Err(PortCheckError::Timeout {
                seconds: deadline.as_secs(),
            }),
        }
    }

    /// Builds driver options from the resolved fields. Missing or
    /// unparsable fields error here and surface as probe failures.
    fn connect_options(&self) -> Result<PgConnectOptions> {
        let hostname = self
            .config
            .hostname()
            .ok_or_else(|| PortCheckError::configuration("RDS_HOSTNAME is not configured"))?;
        let database = self
            .config
            .database()
            .ok_or_else(|| PortCheckError::configuration("RDS_DATABASE is not configured"))?;
        let username = self
            .config
            .username()
            .ok_or_else(|| PortCheckError::configuration("RDS_USERNAME is not configured"))?;
        let port = self.config.port_number()?;

        let mut options = PgConnectOptions::new_without_pgpass()
            .host(hostname)
            .port(port)
            .database(database)
            .username(username)
            .application_name(&format!("rds-port-check-{}", env!("CARGO_PKG_VERSION")));

        if let Some(password) = self.config.password() {
            options = options.password(password.expose());
        }

        Ok(options)
    }

    fn context(&self) -> String {
        format!(
            "{} at {}",
            self.config.database().unwrap_or("<unset>"),
            self.config.endpoint()
        )
    }
}

fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
