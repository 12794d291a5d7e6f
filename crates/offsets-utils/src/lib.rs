//! # offsets Utilities
//!
//! Shared utilities, logging, config, and helpers for offsets.
//!
//! This crate provides common functionality used across the offsets workspace,
//! including logging infrastructure built on `tracing`.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{init_logging, init_logging_with_level, log_format_from_env, LogFormat, LogLevel, LoggingError, LoggingGuard};
pub use tracing::{debug, error, info, trace, warn};
