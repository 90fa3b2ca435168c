//! Provider logging
//!
//! Terraform reads the plugin handshake from stdout, so logs always go to
//! stderr. `TF_LOG` picks the base level and `TF_LOG_PROVIDER` may carry a
//! full `EnvFilter` directive such as `tama=debug,reqwest=warn`.

use crate::error::{Result, TfplugError};
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Log level for the provider process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Level from `TF_LOG`, falling back to `Info`
    pub fn from_env() -> Self {
        std::env::var("TF_LOG")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = TfplugError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(TfplugError::LoggingError(format!(
                "unknown log level: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the filter for `level`, extended by `TF_LOG_PROVIDER` when set
pub fn env_filter(level: LogLevel) -> Result<EnvFilter> {
    let mut filter = EnvFilter::new(level.as_str());

    if let Ok(directives) = std::env::var("TF_LOG_PROVIDER") {
        for directive in directives.split(',').filter(|d| !d.trim().is_empty()) {
            let parsed = directive
                .trim()
                .parse()
                .map_err(|e| TfplugError::LoggingError(format!("{}: {}", directive, e)))?;
            filter = filter.add_directive(parsed);
        }
    }

    Ok(filter)
}

/// Install the global subscriber
///
/// A second call leaves the first subscriber in place and returns Ok.
pub fn init(level: LogLevel) -> Result<()> {
    let filter = env_filter(level)?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .try_init();

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}
