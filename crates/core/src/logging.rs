//! Logging infrastructure for ragchat.
//!
//! This module initializes the tracing subscriber for structured logging.
//! All logs are emitted to stderr so the chat transcript on stdout stays clean.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, AppResult};

/// Default filter when neither a flag nor `RUST_LOG` is set.
///
/// Dependency crates are kept at `warn` so HTTP internals do not interleave
/// with the conversation.
const DEFAULT_FILTER: &str = "warn,ragchat=info";

/// Initialize the tracing subscriber with stderr output.
///
/// # Arguments
/// * `log_level` - Optional filter override (e.g., "debug", "ragchat_chat=trace")
/// * `no_color` - Disable colored output
///
/// # Example
/// ```no_run
/// use ragchat_core::logging::init_logging;
///
/// init_logging(None, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(log_level: Option<&str>, no_color: bool) -> AppResult<()> {
    let default_level = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let filter_str = log_level.unwrap_or(&default_level);

    let env_filter = build_filter(filter_str)?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(!no_color && supports_color());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}

/// Parse a filter directive string.
fn build_filter(filter_str: &str) -> AppResult<EnvFilter> {
    EnvFilter::try_new(filter_str)
        .map_err(|e| AppError::Config(format!("Invalid log filter: {}", e)))
}

/// Check if the terminal supports color output.
fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}
