//! Structured logging for the pannel build manifest tools
//!
//! - Subscriber initialisation with an `EnvFilter` (`RUST_LOG` wins over config)
//! - A per-process session id attached to the first log line
//! - Timers that report operation durations at debug level

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Global session ID for correlating logs
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Initialize with custom configuration
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter = build_filter(&config);

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(config.show_target)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(config.show_target)
                    .with_file(config.show_file)
                    .with_line_number(config.show_line_number)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    };
    result.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(())
}

fn build_filter(config: &TelemetryConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON lines instead of compact text
    pub json: bool,
    /// Include the event target
    pub show_target: bool,
    /// Include the source file
    pub show_file: bool,
    /// Include the source line
    pub show_line_number: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            show_target: false,
            show_file: false,
            show_line_number: false,
        }
    }
}

impl TelemetryConfig {
    /// Map CLI verbosity flags onto a filter directive
    ///
    /// `quiet` wins; each `-v` raises the configured base level one step.
    pub fn with_verbosity(mut self, verbose: u8, quiet: bool) -> Self {
        self.log_level = if quiet {
            "error".to_string()
        } else {
            match verbose {
                0 => self.log_level,
                1 => "debug".to_string(),
                _ => "trace".to_string(),
            }
        };
        self
    }
}

/// Timer for measuring operation duration
pub struct Timer {
    name: String,
    start: Instant,
}

impl Timer {
    /// Start a new timer
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
        }
    }

    /// Stop the timer and log the duration
    pub fn stop(self) -> Duration {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = %self.name,
            duration_ms = duration.as_millis() as u64,
            "Timer completed"
        );
        duration
    }
}
