//! Process-wide structured logging setup.

use std::env;
use std::fs::{File, OpenOptions};
use std::io;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directive read when no level is passed.
pub const TRACE_ENV: &str = "ANNEAL_TRACE";
/// Output format, `pretty` (default) or `json`.
pub const LOG_FORMAT_ENV: &str = "ANNEAL_LOG_FORMAT";
/// Optional file that receives a copy of every event.
pub const LOG_FILE_ENV: &str = "ANNEAL_LOG_FILE";

/// Errors raised while installing the subscriber.
#[derive(Debug)]
pub enum LoggingError {
    InvalidFilter(String),
    InvalidFormat(String),
    LogFile { path: String, source: io::Error },
    Init(String),
}

impl LoggingError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            LoggingError::InvalidFilter(_) => "LOGGING_INVALID_FILTER",
            LoggingError::InvalidFormat(_) => "LOGGING_INVALID_FORMAT",
            LoggingError::LogFile { .. } => "LOGGING_FILE",
            LoggingError::Init(_) => "LOGGING_INIT",
        }
    }
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggingError::InvalidFilter(msg) => {
                write!(f, "[{}] Invalid log filter: {}", self.code(), msg)
            }
            LoggingError::InvalidFormat(format) => write!(
                f,
                "[{}] Invalid {} '{}' (expected 'json' or 'pretty')",
                self.code(),
                LOG_FORMAT_ENV,
                format
            ),
            LoggingError::LogFile { path, source } => write!(
                f,
                "[{}] Failed to open log file {}: {}",
                self.code(),
                path,
                source
            ),
            LoggingError::Init(msg) => {
                write!(f, "[{}] Failed to initialize logging: {}", self.code(), msg)
            }
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggingError::LogFile { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn open_log_file(path: &str) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::LogFile {
            path: path.to_string(),
            source,
        })
}

fn map_init_err<E: std::fmt::Display>(err: E) -> LoggingError {
    LoggingError::Init(err.to_string())
}

/// Install a global `tracing` subscriber writing to stderr.
///
/// When `level` is `None`, the filter comes from `ANNEAL_TRACE` and defaults
/// to `off`. Returns `Ok(false)` if a subscriber is already installed.
pub fn enable_logging(level: Option<&str>) -> Result<bool, LoggingError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let level_value = level
        .map(str::to_string)
        .or_else(|| env::var(TRACE_ENV).ok())
        .unwrap_or_else(|| "off".to_string());

    let filter = if level_value.eq_ignore_ascii_case("off") {
        EnvFilter::default().add_directive(LevelFilter::OFF.into())
    } else {
        EnvFilter::try_new(&level_value)
            .map_err(|err| LoggingError::InvalidFilter(err.to_string()))?
    };

    let format = env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "pretty".to_string());
    let log_file = env::var(LOG_FILE_ENV).ok();
    let use_json = format.eq_ignore_ascii_case("json");
    if !use_json && !format.eq_ignore_ascii_case("pretty") {
        return Err(LoggingError::InvalidFormat(format));
    }

    let file = log_file.as_deref().map(open_log_file).transpose()?;
    let registry = tracing_subscriber::registry().with(filter);
    if use_json {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .json();
        let file_layer = file.map(|file| {
            tracing_subscriber::fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .json()
        });
        registry
            .with(stderr_layer)
            .with(file_layer)
            .try_init()
            .map_err(map_init_err)?;
    } else {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .pretty();
        let file_layer = file.map(|file| {
            tracing_subscriber::fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .pretty()
        });
        registry
            .with(stderr_layer)
            .with(file_layer)
            .try_init()
            .map_err(map_init_err)?;
    }

    tracing::debug!(
        component = "logging",
        operation = "enable",
        status = "success",
        filter = %level_value,
        json = use_json,
        "Logging enabled"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(
            LoggingError::InvalidFormat("xml".into()).code(),
            "LOGGING_INVALID_FORMAT"
        );
        let msg = LoggingError::InvalidFormat("xml".into()).to_string();
        assert!(msg.contains("ANNEAL_LOG_FORMAT"));
        assert!(msg.contains("xml"));
    }

    #[test]
    fn invalid_filter_is_reported() {
        if tracing::dispatcher::has_been_set() {
            return;
        }
        let err = enable_logging(Some("anneal=loud")).unwrap_err();
        assert_eq!(err.code(), "LOGGING_INVALID_FILTER");
    }
}
