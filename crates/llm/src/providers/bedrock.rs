//! Amazon Bedrock text-generation provider.
//!
//! Calls the InvokeModel API with the Anthropic messages body:
//! `POST {endpoint}/model/{modelId}/invoke`.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use crate::http::{build_http_client, post_json};
use crate::types::{ContentBlock, LlmMessage};
use ragchat_core::{AppError, AppResult, RetryPolicy, ServiceConfig};
use serde::{Deserialize, Serialize};

/// InvokeModel request body for Anthropic models.
#[derive(Debug, Serialize)]
struct InvokeBody<'a> {
    anthropic_version: &'a str,
    messages: &'a [LlmMessage],
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

/// InvokeModel response body for Anthropic models.
#[derive(Debug, Deserialize)]
struct InvokeResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: LlmUsage,
}

/// Bedrock runtime client.
pub struct BedrockClient {
    /// Base URL, e.g. https://bedrock-runtime.us-east-1.amazonaws.com
    base_url: String,

    /// Bearer API key
    api_key: Option<String>,

    /// Backoff for throttled calls
    retry: RetryPolicy,

    /// HTTP client
    client: reqwest::Client,
}

impl BedrockClient {
    /// Create a client from service settings.
    pub fn new(service: &ServiceConfig) -> AppResult<Self> {
        let client = build_http_client(service.timeout())?;
        Ok(Self {
            base_url: service.runtime_endpoint(),
            api_key: service.resolve_api_key(),
            retry: service.retry,
            client,
        })
    }

    /// Create a client against a custom base URL (gateways, tests).
    pub fn with_base_url(base_url: impl Into<String>, api_key: Option<String>) -> AppResult<Self> {
        let service = ServiceConfig::default();
        Ok(Self {
            base_url: base_url.into(),
            api_key,
            retry: service.retry,
            client: build_http_client(service.timeout())?,
        })
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// InvokeModel URL for a model id.
    ///
    /// Model ids contain `:` and `.` so they are pushed as a single encoded
    /// path segment.
    fn invoke_url(&self, model: &str) -> AppResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            AppError::Config(format!("Invalid runtime endpoint '{}': {}", self.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                AppError::Config(format!(
                    "Runtime endpoint cannot be a base URL: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push("model")
            .push(model)
            .push("invoke");

        Ok(url)
    }

    fn to_invoke_body<'a>(&self, request: &'a LlmRequest) -> InvokeBody<'a> {
        InvokeBody {
            anthropic_version: &request.anthropic_version,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
        }
    }

    fn convert_response(&self, request: &LlmRequest, response: InvokeResponse) -> LlmResponse {
        LlmResponse {
            content: response.content,
            model: response.model.unwrap_or_else(|| request.model.clone()),
            stop_reason: response.stop_reason,
            usage: response.usage,
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for BedrockClient {
    fn provider_name(&self) -> &str {
        "bedrock"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        request.validate()?;

        let url = self.invoke_url(&request.model)?;
        let body = self.to_invoke_body(request);

        tracing::debug!(
            "Invoking model {} (max_tokens={}, temperature={}, top_p={})",
            request.model,
            request.max_tokens,
            request.temperature,
            request.top_p
        );

        let response: InvokeResponse = self
            .retry
            .run("InvokeModel", || {
                post_json(
                    &self.client,
                    url.clone(),
                    self.api_key.as_deref(),
                    &body,
                    AppError::Llm,
                )
            })
            .await?;

        let response = self.convert_response(request, response);
        tracing::debug!(
            "Model {} returned {} block(s), stop_reason={:?}, tokens={}",
            response.model,
            response.content.len(),
            response.stop_reason,
            response.usage.total_tokens()
        );

        Ok(response)
    }
}
