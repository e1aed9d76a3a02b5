//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with configurable log levels
//! - Local JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use cosmos_repo::logging::init_logging;
//! use cosmos_repo::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(container = "orders", "Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use cosmos_repo::log_error_with_context;
/// use cosmos_repo::domain::RepoError;
///
/// let error = RepoError::Configuration("Missing section".to_string());
/// log_error_with_context!(&error, "Failed to load settings");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            status = ?$error.status(),
            context = $context,
            "Error occurred"
        );
    };
}
