//! # Logging Utilities
//!
//! Logging infrastructure for offsets using `tracing`.
//!
//! This module provides structured logging with support for:
//! - Pretty (development) and JSON (production) output
//! - Environment variable configuration
//! - Log level filtering
//! - Optional file output alongside the console
//!
//! Console logs are written to **stderr**. Stdout belongs to command output,
//! which users pipe and diff.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use offsets_utils::init_logging;
//!
//! // Initialize with default settings (reads from RUST_LOG env var)
//! let _guard = init_logging().expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level filter (e.g., `RUST_LOG=debug`, `RUST_LOG=offsets_core=trace`)
//! - `OFFSETS_LOG_FORMAT`: Set output format (`json` or `pretty`, default: `pretty`)
//! - `OFFSETS_LOG_FILE`: Optional path to log file (if not set, logs only to console)
//!
//! ## Examples
//!
//! ```rust,no_run
//! use offsets_utils::{LogFormat, LogLevel, init_logging_with_level};
//!
//! // Initialize with specific log level
//! let _guard = init_logging_with_level(LogLevel::Debug, LogFormat::Pretty)
//!     .expect("Failed to initialize logging");
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, io};

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Environment variable selecting the log format
pub const LOG_FORMAT_ENV: &str = "OFFSETS_LOG_FORMAT";

/// Environment variable naming an optional log file
pub const LOG_FILE_ENV: &str = "OFFSETS_LOG_FILE";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default for development)
    Pretty,
    /// JSON format (default for production)
    Json,
}

impl FromStr for LogFormat
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(LogFormat::Pretty),
            "json" | "prod" | "production" => Ok(LogFormat::Json),
            _ => Err(LoggingError::InvalidFormat(format!(
                "Unknown log format: {s}. Use 'pretty' or 'json'"
            ))),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level (default)
    Warn,
    /// Info level
    Info,
    /// Debug level
    Debug,
    /// Trace level (most verbose)
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(LoggingError::InvalidLevel(format!(
                "Unknown log level: {s}. Use 'error', 'warn', 'info', 'debug', or 'trace'"
            ))),
        }
    }
}

/// Keeps the background file writer alive
///
/// Buffered file logs are flushed when this is dropped, so hold it for the
/// lifetime of the program.
#[derive(Debug)]
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard
{
    _file: Option<WorkerGuard>,
}

/// Initialize logging with default settings
///
/// Reads configuration from environment variables:
/// - `RUST_LOG`: Log level filter (e.g., `debug`, `offsets_core=debug`)
/// - `OFFSETS_LOG_FORMAT`: Output format (`json` or `pretty`, default: `pretty`)
/// - `OFFSETS_LOG_FILE`: Optional path to log file
///
/// Without `RUST_LOG` only warnings and errors are shown, so the command
/// shell stays quiet by default.
///
/// ## Errors
///
/// Returns an error if:
/// - Logging is already initialized
/// - `OFFSETS_LOG_FORMAT` holds an unknown format
pub fn init_logging() -> Result<LoggingGuard, LoggingError>
{
    let format = log_format_from_env()?;

    // RUST_LOG can override the default level with more specific filters
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string()));
    init_logging_internal(format, filter)
}

/// Output format requested through `OFFSETS_LOG_FORMAT`, defaulting to pretty
///
/// ## Errors
///
/// Returns `InvalidFormat` if the variable holds an unknown format.
pub fn log_format_from_env() -> Result<LogFormat, LoggingError>
{
    match env::var(LOG_FORMAT_ENV) {
        Ok(value) => value.parse(),
        Err(_) => Ok(LogFormat::Pretty),
    }
}

/// Initialize logging with explicit level and format
///
/// The explicit level takes precedence over `RUST_LOG`.
///
/// ## Errors
///
/// Returns an error if logging is already initialized or file logging fails.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<LoggingGuard, LoggingError>
{
    init_logging_internal(format, EnvFilter::new(Level::from(level).to_string()))
}

fn console_layer(format: LogFormat, filter: EnvFilter) -> BoxedLayer
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(true)
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed(),
    }
}

fn file_layer(path: &Path, format: LogFormat, filter: EnvFilter) -> Result<(BoxedLayer, WorkerGuard), LoggingError>
{
    let file_name = path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidLogFile(path.display().to_string()))?;
    let directory = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(directory)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let layer = match format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false) // No ANSI in files
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(filter)
            .boxed(),
    };
    Ok((layer, guard))
}

/// Internal initialization function
fn init_logging_internal(format: LogFormat, filter: EnvFilter) -> Result<LoggingGuard, LoggingError>
{
    let log_file = env::var(LOG_FILE_ENV).ok().map(PathBuf::from);

    let mut layers = vec![console_layer(format, filter.clone())];
    let mut file_guard = None;
    if let Some(path) = &log_file {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let (layer, guard) = file_layer(path, format, filter)?;
        layers.push(layer);
        file_guard = Some(guard);
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| LoggingError::InitializationFailed(e.to_string()))?;

    Ok(LoggingGuard { _file: file_guard })
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Invalid log format: {0}")]
    InvalidFormat(String),

    /// Invalid log level
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),

    /// The log file path does not name a file
    #[error("Invalid log file path: {0}")]
    InvalidLogFile(String),

    /// The log file could not be opened
    #[error("Failed to open log file: {0}")]
    Appender(#[from] InitError),
}
