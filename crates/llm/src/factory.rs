//! LLM provider factory.
//!
//! Builds the hosted text-generation client from service settings. The
//! returned handle is passed explicitly to the policy gate and the
//! answer generator; nothing here is cached globally.

use crate::client::LlmClient;
use crate::providers::BedrockClient;
use ragchat_core::{AppResult, ServiceConfig};
use std::sync::Arc;

/// Create the text-generation client.
///
/// A missing API key is not an error here: requests are sent unsigned and
/// the service rejects them, which the chat pipeline logs and downgrades.
pub fn create_client(service: &ServiceConfig) -> AppResult<Arc<dyn LlmClient>> {
    if service.resolve_api_key().is_none() {
        tracing::warn!(
            "No API key found in ${}; requests to {} will be unauthenticated",
            service.api_key_env,
            service.runtime_endpoint()
        );
    }

    let client = BedrockClient::new(service)?;
    Ok(Arc::new(client))
}
