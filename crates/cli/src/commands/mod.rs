//! Command handlers for the ragchat CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod chat;
pub mod classify;
pub mod models;
pub mod prompts;
pub mod retrieve;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use classify::ClassifyCommand;
pub use models::ModelsCommand;
pub use prompts::PromptsCommand;
pub use retrieve::RetrieveCommand;
