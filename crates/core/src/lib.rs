//! ragchat core library
//!
//! This crate provides the foundational utilities shared by every ragchat crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management
//! - Retry policy for throttled remote calls

pub mod config;
pub mod error;
pub mod logging;
pub mod retry;

// Re-export commonly used types
pub use config::{AppConfig, ConfigOverrides, ServiceConfig};
pub use error::{AppError, AppResult};
pub use retry::RetryPolicy;
