//! Error types for ragchat.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, hosted model calls, knowledge base
//! retrieval and prompt rendering.

use thiserror::Error;

/// Unified error type for ragchat.
///
/// Library functions return `Result<T, AppError>`. The chat pipeline
/// downgrades remote errors to safe defaults at its call boundaries, so
/// these values are logged rather than shown to the user.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Hosted text-generation errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Knowledge base retrieval errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// The remote service asked us to slow down (HTTP 429, throttling or
    /// temporary unavailability)
    #[error("Throttled: {0}")]
    Throttled(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether a bounded retry may succeed.
    ///
    /// Only throttling-class failures qualify; everything else is permanent
    /// for the purposes of a single turn.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Throttled(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_throttled_is_retryable() {
        assert!(AppError::Throttled("slow down".to_string()).is_retryable());
        assert!(!AppError::Llm("bad model".to_string()).is_retryable());
        assert!(!AppError::Knowledge("not found".to_string()).is_retryable());
        assert!(!AppError::Config("missing".to_string()).is_retryable());
    }

    #[test]
    fn test_display_includes_category() {
        let err = AppError::Knowledge("no such base".to_string());
        assert_eq!(err.to_string(), "Knowledge error: no such base");
    }
}
