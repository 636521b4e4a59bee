//! LLM client abstraction and request/response types.
//!
//! This module defines the core abstractions for interacting with the hosted
//! text-generation service.

use crate::types::{ContentBlock, LlmMessage};
use ragchat_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Protocol version tag required by Anthropic models on Bedrock.
pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Output cap used when a request does not set one.
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// LLM completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmRequest {
    /// Model identifier (e.g., "anthropic.claude-3-haiku-20240307-v1:0")
    pub model: String,

    /// Ordered conversation sent to the model
    pub messages: Vec<LlmMessage>,

    /// Protocol version tag
    pub anthropic_version: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature for sampling (0.0 - 1.0)
    pub temperature: f32,

    /// Top-p nucleus sampling (0.0 - 1.0)
    pub top_p: f32,
}

impl LlmRequest {
    /// Create a request holding a single user message.
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![LlmMessage::user(prompt)],
            anthropic_version: ANTHROPIC_VERSION.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: 1.0,
            top_p: 1.0,
        }
    }

    /// Set the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the temperature for sampling.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set nucleus sampling.
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    /// Reject requests the service would refuse anyway.
    pub fn validate(&self) -> AppResult<()> {
        if self.model.trim().is_empty() {
            return Err(AppError::Llm("Model identifier cannot be empty".to_string()));
        }
        if self.messages.is_empty() {
            return Err(AppError::Llm("Request has no messages".to_string()));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(AppError::Llm(format!(
                "Temperature out of range [0, 1]: {}",
                self.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(AppError::Llm(format!(
                "Top-p out of range [0, 1]: {}",
                self.top_p
            )));
        }
        if self.max_tokens == 0 {
            return Err(AppError::Llm("max_tokens must be positive".to_string()));
        }
        Ok(())
    }
}

/// LLM completion response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Content blocks returned by the model
    pub content: Vec<ContentBlock>,

    /// Model that generated the response
    pub model: String,

    /// Why generation stopped (e.g., "end_turn", "max_tokens")
    pub stop_reason: Option<String>,

    /// Usage statistics
    pub usage: LlmUsage,
}

impl LlmResponse {
    /// Text of the first content block.
    ///
    /// Errors when the response has no blocks or the first block carries no
    /// text, which callers treat as a malformed service response.
    pub fn first_text(&self) -> AppResult<&str> {
        let block = self
            .content
            .first()
            .ok_or_else(|| AppError::Llm("Response contained no content blocks".to_string()))?;

        block.text.as_deref().ok_or_else(|| {
            AppError::Llm(format!(
                "First content block of type '{}' has no text",
                block.kind
            ))
        })
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LlmUsage {
    /// Tokens in the prompt
    #[serde(default)]
    pub input_tokens: u32,

    /// Tokens in the completion
    #[serde(default)]
    pub output_tokens: u32,
}

impl LlmUsage {
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Trait for hosted text-generation clients.
///
/// Components take an `Arc<dyn LlmClient>` so tests can substitute a double.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Get the provider name (e.g., "bedrock").
    fn provider_name(&self) -> &str;

    /// Perform a non-streaming completion.
    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse>;
}
