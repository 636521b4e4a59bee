//! LLM integration crate for ragchat.
//!
//! This crate provides a provider-agnostic abstraction for the hosted
//! text-generation service, plus the HTTP plumbing shared with the knowledge
//! base client.
//!
//! # Providers
//! - **Bedrock**: Anthropic models through the InvokeModel API
//!
//! # Example
//! ```no_run
//! use ragchat_llm::{LlmClient, LlmRequest, providers::BedrockClient};
//! use ragchat_core::ServiceConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BedrockClient::new(&ServiceConfig::default())?;
//! let request = LlmRequest::new("Hello, world!", "anthropic.claude-3-haiku-20240307-v1:0");
//! let response = client.complete(&request).await?;
//! println!("{}", response.first_text()?);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod http;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage, ANTHROPIC_VERSION};
pub use factory::create_client;
pub use http::ServiceError;
pub use providers::BedrockClient;
pub use types::{ContentBlock, LlmMessage, Role};
