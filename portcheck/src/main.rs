//! PostgreSQL connectivity probe.
//!
//! Reads the invocation payload (a JSON object of configuration overrides),
//! runs one timed connection attempt against the configured endpoint,
//! reports the outcome to the metrics sink best-effort, and prints the
//! serialized result to stdout.
//!
//! An unreachable endpoint is a successful invocation: the failure is
//! carried in the printed `Reason` field, never in the exit status.

use anyhow::Context;
use clap::Parser;
use portcheck_core::{config::Payload, handler, logging};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "portcheck")]
#[command(about = "PostgreSQL connectivity probe with metric reporting")]
#[command(version)]
#[command(long_about = "
Runs a single timed connection attempt against a PostgreSQL endpoint and
reports the outcome as metrics.

The probe is configured through the invocation payload, falling back to
environment variables and built-in defaults per key. Recognized keys:
TIMEOUT, REPORT_AS_CW_METRICS, CW_METRICS_NAMESPACE, CW_METRICS_ENDPOINT,
RDS_DATABASE, RDS_HOSTNAME, RDS_PORT, RDS_USERNAME, RDS_PASSWORD.

EXAMPLES:
  portcheck
  portcheck '{\"RDS_HOSTNAME\": \"db.internal\", \"TIMEOUT\": 5}'
  portcheck --payload-file invocation.json
")]
struct Cli {
    /// Invocation payload as an inline JSON object
    #[arg(value_name = "PAYLOAD")]
    payload: Option<String>,

    /// Read the invocation payload from a JSON file
    #[arg(long, conflicts_with = "payload")]
    payload_file: Option<PathBuf>,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet)?;

    let payload = load_payload(&cli)?;
    debug!(keys = payload.len(), "resolved invocation payload");

    let result = handler::run(&payload).await;

    let body = serde_json::to_string_pretty(&result).context("failed to serialize result")?;
    println!("{body}");

    Ok(())
}

/// Parses the payload from the inline argument or file; an absent payload is
/// an empty object.
fn load_payload(cli: &Cli) -> anyhow::Result<Payload> {
    let raw = match (&cli.payload, &cli.payload_file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read payload file {}", path.display()))?,
        (None, None) => return Ok(Payload::new()),
    };

    let value: serde_json::Value =
        serde_json::from_str(&raw).context("invocation payload is not valid JSON")?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => anyhow::bail!("invocation payload must be a JSON object"),
    }
}
