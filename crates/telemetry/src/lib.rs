//! Logging setup for TGTG tools
//!
//! Installs a `tracing` subscriber with an environment-aware filter and either
//! compact human-readable or JSON output. Every process gets a session id that
//! is logged at startup for correlating log lines.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use uuid::Uuid;

/// Global session ID for correlating logs
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Initialize logging with the default configuration
pub fn init() -> anyhow::Result<()> {
    init_with_config(&TelemetryConfig::default())
}

/// Initialize with custom configuration
///
/// `RUST_LOG`, when set, overrides the configured level.
pub fn init_with_config(config: &TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.filter_directive()))
        .map_err(|e| anyhow::anyhow!("Invalid log filter: {}", e))?;

    // Logs always go to stderr so stdout stays free for command output.
    let subscriber = build_subscriber(filter, config, std::io::stderr);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(())
}

/// Compact or JSON formatting over `writer`
fn build_subscriber<W>(
    filter: EnvFilter,
    config: &TelemetryConfig,
    writer: W,
) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(filter);
    if config.json {
        Box::new(
            registry.with(
                fmt::layer()
                    .json()
                    .with_target(config.show_target)
                    .with_writer(writer),
            ),
        )
    } else {
        Box::new(
            registry.with(
                fmt::layer()
                    .with_target(config.show_target)
                    .with_writer(writer)
                    .compact(),
            ),
        )
    }
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Level applied to the workspace crates (`error`..`trace`)
    pub log_level: String,
    /// Emit JSON lines instead of compact text
    pub json: bool,
    /// Include the event target
    pub show_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json: false,
            show_target: false,
        }
    }
}

impl TelemetryConfig {
    /// Debug-level logging for the workspace crates
    #[must_use]
    pub fn verbose() -> Self {
        Self {
            log_level: "debug".to_string(),
            show_target: true,
            ..Self::default()
        }
    }

    /// Filter directive: the configured level for our crates, `warn` for the rest
    #[must_use]
    pub fn filter_directive(&self) -> String {
        let level = &self.log_level;
        format!("warn,tgtg={level},tgtg_api_client={level},tgtg_telemetry={level}")
    }
}
