//! Answer generation.

use ragchat_core::AppResult;
use ragchat_llm::{LlmClient, LlmRequest};
use std::sync::Arc;

/// Output cap for generated answers.
pub const ANSWER_MAX_TOKENS: u32 = 500;

/// Generates answers with the hosted text-generation model.
#[derive(Clone)]
pub struct AnswerGenerator {
    client: Arc<dyn LlmClient>,
}

impl AnswerGenerator {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Generate an answer, surfacing service errors.
    pub async fn try_generate(
        &self,
        prompt: &str,
        model_id: &str,
        temperature: f32,
        top_p: f32,
    ) -> AppResult<String> {
        let request = LlmRequest::new(prompt, model_id)
            .with_temperature(temperature)
            .with_top_p(top_p)
            .with_max_tokens(ANSWER_MAX_TOKENS);

        let response = self.client.complete(&request).await?;

        tracing::debug!(
            "Generated answer ({} tokens, stop reason: {:?})",
            response.usage.output_tokens,
            response.stop_reason
        );

        Ok(response.first_text()?.to_string())
    }

    /// Generate an answer. Returns an empty string on any failure.
    pub async fn generate(
        &self,
        prompt: &str,
        model_id: &str,
        temperature: f32,
        top_p: f32,
    ) -> String {
        match self.try_generate(prompt, model_id, temperature, top_p).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(
                    "Error generating response via {}: {}",
                    self.client.provider_name(),
                    e
                );
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::ScriptedLlm;

    #[tokio::test]
    async fn test_generate_uses_caller_sampling() {
        let llm = Arc::new(ScriptedLlm::replying("Every 250 hours."));
        let generator = AnswerGenerator::new(llm.clone());

        let answer = generator
            .generate("Context: x\n\nUser: y\n\n", "model-x", 0.4, 0.9)
            .await;
        assert_eq!(answer, "Every 250 hours.");

        let request = &llm.requests()[0];
        assert_eq!(request.model, "model-x");
        assert_eq!(request.temperature, 0.4);
        assert_eq!(request.top_p, 0.9);
        assert_eq!(request.max_tokens, ANSWER_MAX_TOKENS);
        assert_eq!(request.messages.len(), 1);
        assert_eq!(
            request.messages[0].content[0].text.as_deref(),
            Some("Context: x\n\nUser: y\n\n")
        );
    }

    #[tokio::test]
    async fn test_failure_returns_empty_string() {
        let generator = AnswerGenerator::new(Arc::new(ScriptedLlm::failing()));
        assert_eq!(generator.generate("q", "m", 1.0, 1.0).await, "");
        assert!(generator.try_generate("q", "m", 1.0, 1.0).await.is_err());
    }

    #[tokio::test]
    async fn test_timeout_returns_empty_string() {
        use ragchat_core::{AppError, ServiceConfig};
        use ragchat_llm::BedrockClient;
        use std::time::Duration;
        use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "content": [{"type": "text", "text": "too late"}]
                    }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let service = ServiceConfig {
            runtime_endpoint: Some(server.uri()),
            timeout_secs: 1,
            ..Default::default()
        };
        let generator = AnswerGenerator::new(Arc::new(BedrockClient::new(&service).unwrap()));
        let model = "anthropic.claude-3-haiku-20240307-v1:0";

        assert!(matches!(
            generator.try_generate("q", model, 1.0, 1.0).await,
            Err(AppError::Llm(_))
        ));
        assert_eq!(generator.generate("q", model, 1.0, 1.0).await, "");
    }

    #[tokio::test]
    async fn test_malformed_response_returns_empty_string() {
        let generator = AnswerGenerator::new(Arc::new(ScriptedLlm::without_content()));
        assert_eq!(generator.generate("q", "m", 1.0, 1.0).await, "");
    }
}
