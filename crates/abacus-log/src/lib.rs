//! Logging setup for abacus.
//!
//! The library crates only emit `tracing` events; binaries pick how they
//! are rendered by calling one of the `init_*` functions once at startup.
//! Output always goes to stderr so command output on stdout stays clean.

use std::fmt as std_fmt;
use std::str::FromStr;

pub use tracing::{debug, error, info, instrument, span, trace, warn, Level, Span};
pub use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Error returned when a subscriber cannot be installed
pub type InitError = Box<dyn std::error::Error + Send + Sync>;

/// How log lines are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event
    #[default]
    Json,
    /// Human readable single-line output
    Plain,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "plain" | "text" => Ok(LogFormat::Plain),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

impl std_fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std_fmt::Formatter<'_>) -> std_fmt::Result {
        match self {
            LogFormat::Json => f.write_str("json"),
            LogFormat::Plain => f.write_str("plain"),
        }
    }
}

fn install(filter: EnvFilter, format: LogFormat) -> Result<(), InitError> {
    let (json, plain) = match format {
        LogFormat::Json => (
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr)
                    .json(),
            ),
            None,
        ),
        LogFormat::Plain => (
            None,
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(plain)
        .try_init()?;

    Ok(())
}

/// Initialize JSON logging filtered by `RUST_LOG`, defaulting to `info`
pub fn init_tracing() -> Result<(), InitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    install(filter, LogFormat::Json)
}

/// Initialize tracing with a specific filter directive such as `debug` or
/// `abacus_types=trace`
pub fn init_tracing_with_level(level: &str, format: LogFormat) -> Result<(), InitError> {
    let filter = EnvFilter::try_new(level)?;
    install(filter, format)
}

/// Initialize tracing for testing with simplified output
pub fn init_tracing_test() -> Result<(), InitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::new("debug"))
        .with(fmt::layer().with_test_writer())
        .try_init()?;

    Ok(())
}
