//! Shared logging utilities for consistent tracing across workers

use crate::types::WorkerId;
use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Crate targets that honour the configured level
const WORKSPACE_TARGETS: &[&str] = &["share_stress", "stress_shared"];

/// Build the filter directive for the given base level
pub fn filter_directive(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");

    let mut directive = WORKSPACE_TARGETS
        .iter()
        .map(|target| format!("{target}={base_level}"))
        .collect::<Vec<_>>();
    directive.push("reqwest=warn".to_string());
    directive.push("hyper=warn".to_string());
    directive.join(",")
}

/// Initialize tracing subscriber with an optional log level
///
/// `RUST_LOG`, when set, overrides the computed directive.
pub fn init_tracing(log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(log_level)));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for worker-aware info logging
#[macro_export]
macro_rules! worker_info {
    ($worker:expr, $($arg:tt)*) => {
        tracing::info!(
            worker = %$worker,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for worker-aware warning logging
#[macro_export]
macro_rules! worker_warn {
    ($worker:expr, $($arg:tt)*) => {
        tracing::warn!(
            worker = %$worker,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for worker-aware error logging
#[macro_export]
macro_rules! worker_error {
    ($worker:expr, $($arg:tt)*) => {
        tracing::error!(
            worker = %$worker,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for worker-aware debug logging
#[macro_export]
macro_rules! worker_debug {
    ($worker:expr, $($arg:tt)*) => {
        tracing::debug!(
            worker = %$worker,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(worker: &WorkerId, details: &str) {
    info!(
        worker = %worker,
        timestamp = format_timestamp(),
        "🚀 Starting {}",
        details
    );
}

/// Contextual logging helper for shutdown messages
pub fn log_shutdown(worker: &WorkerId, reason: &str) {
    info!(
        worker = %worker,
        timestamp = format_timestamp(),
        "🛑 Shutting down: {}",
        reason
    );
}

/// Contextual logging helper for error conditions
pub fn log_error(worker: &WorkerId, context: &str, error: &dyn std::fmt::Display) {
    error!(
        worker = %worker,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(worker: &WorkerId, message: &str) {
    info!(
        worker = %worker,
        timestamp = format_timestamp(),
        "✅ {}",
        message
    );
}

/// Contextual logging helper for progress updates
pub fn log_progress(worker: &WorkerId, action: &str, details: &str) {
    info!(
        worker = %worker,
        timestamp = format_timestamp(),
        "📋 {}: {}",
        action,
        details
    );
}
