//! Content policy gate.
//!
//! A [`ContentPolicy`] decides whether a user request may be answered. The
//! default implementation asks the hosted model to label the request with one
//! of five categories and only lets the on-topic category through.

use ragchat_core::AppResult;
use ragchat_llm::{LlmClient, LlmRequest};
use ragchat_prompt::{build_prompt, PromptDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Label that permits a request.
pub const PERMITTED_LABEL: &str = "category e";

const CLASSIFY_TEMPERATURE: f32 = 0.0;
const CLASSIFY_TOP_P: f32 = 0.1;
const CLASSIFY_MAX_TOKENS: u32 = 10;

/// Pluggable allow/deny decision for a user request.
#[async_trait::async_trait]
pub trait ContentPolicy: Send + Sync {
    /// Get policy name (e.g., "llm-classifier")
    fn policy_name(&self) -> &str;

    /// Return true when the request may be answered.
    async fn decide(&self, text: &str) -> bool;
}

/// Categories the classifier can assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    /// Questions about the model or system architecture
    ModelMeta,
    /// Profanity, toxic intent or harmful wording
    Harmful,
    /// Unrelated to the allowed domain
    OffTopic,
    /// Instructions, system behaviour or meta questions
    Instructional,
    /// Only the allowed domain
    OnTopic,
    /// Anything that is not an exact label
    Unrecognized,
}

impl ContentCategory {
    /// Map a normalized label to a category. Only exact labels match.
    pub fn from_label(label: &str) -> Self {
        match label {
            "category a" => Self::ModelMeta,
            "category b" => Self::Harmful,
            "category c" => Self::OffTopic,
            "category d" => Self::Instructional,
            PERMITTED_LABEL => Self::OnTopic,
            _ => Self::Unrecognized,
        }
    }
}

/// Outcome of one classification call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Lowercased, trimmed model output
    pub label: String,
    pub category: ContentCategory,
}

impl ClassificationResult {
    pub fn from_raw(raw: &str) -> Self {
        let label = raw.trim().to_lowercase();
        let category = ContentCategory::from_label(&label);
        Self { label, category }
    }

    pub fn permitted(&self) -> bool {
        self.category == ContentCategory::OnTopic
    }
}

/// Content policy backed by a hosted text-generation model.
pub struct LlmContentPolicy {
    client: Arc<dyn LlmClient>,
    model_id: String,
    definition: PromptDefinition,
}

impl LlmContentPolicy {
    pub fn new(
        client: Arc<dyn LlmClient>,
        model_id: impl Into<String>,
        definition: PromptDefinition,
    ) -> Self {
        Self {
            client,
            model_id: model_id.into(),
            definition,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Classify a request, surfacing service and render errors.
    pub async fn try_classify(
        &self,
        prompt: &str,
        model_id: &str,
    ) -> AppResult<ClassificationResult> {
        let mut variables = HashMap::new();
        variables.insert("prompt".to_string(), prompt.to_string());
        let built = build_prompt(&self.definition, variables)?;

        let request = LlmRequest::new(built.text, model_id)
            .with_temperature(CLASSIFY_TEMPERATURE)
            .with_top_p(CLASSIFY_TOP_P)
            .with_max_tokens(CLASSIFY_MAX_TOKENS);

        let response = self.client.complete(&request).await?;
        let result = ClassificationResult::from_raw(response.first_text()?);

        tracing::info!("[Prompt Classification] {}", result.label);

        Ok(result)
    }

    /// Classify a request. Fails closed: any error denies it.
    pub async fn classify(&self, prompt: &str, model_id: &str) -> bool {
        match self.try_classify(prompt, model_id).await {
            Ok(result) => result.permitted(),
            Err(e) => {
                tracing::error!(
                    "Error classifying prompt via {}: {}",
                    self.client.provider_name(),
                    e
                );
                false
            }
        }
    }
}

#[async_trait::async_trait]
impl ContentPolicy for LlmContentPolicy {
    fn policy_name(&self) -> &str {
        "llm-classifier"
    }

    async fn decide(&self, text: &str) -> bool {
        self.classify(text, &self.model_id).await
    }
}
