//! Prompt system for ragchat.
//!
//! This crate provides structured prompt management with:
//! - Built-in definitions for the policy gate and the answer prompt
//! - YAML overrides under `.ragchat/prompts/`
//! - Handlebars template rendering

pub mod builder;
pub mod builtin;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use builtin::{builtin_prompt, ANSWER_PROMPT_ID, CLASSIFY_PROMPT_ID};
pub use loader::{list_prompts, load_prompt};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
