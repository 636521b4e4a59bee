//! Turn handling.
//!
//! Each user input runs the same sequence: record the turn, ask the content
//! policy, then either refuse or retrieve context and generate an answer.

use crate::generator::AnswerGenerator;
use crate::policy::ContentPolicy;
use crate::session::{ChatSession, ChatTurn};
use ragchat_core::{AppConfig, AppResult};
use ragchat_knowledge::{RetrievedPassage, Retriever};
use ragchat_prompt::{build_prompt, PromptDefinition};
use std::collections::HashMap;
use std::sync::Arc;

/// Assistant reply for requests the policy rejects.
pub const REFUSAL_MESSAGE: &str = "I'm unable to answer this, please try again";

/// Per-session model and collection settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub model_id: String,
    pub knowledge_base_id: String,
    pub temperature: f32,
    pub top_p: f32,
}

impl ChatSettings {
    /// Settings from a validated configuration.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        Ok(Self {
            model_id: config.model.clone(),
            knowledge_base_id: config.require_knowledge_base()?.to_string(),
            temperature: config.temperature,
            top_p: config.top_p,
        })
    }
}

/// How a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The policy rejected the request; no retrieval or generation happened
    Refused,
    /// An answer was generated (possibly empty if generation failed)
    Answered,
}

/// Runs user turns against injected policy, retriever and generator.
pub struct ChatEngine {
    settings: ChatSettings,
    policy: Arc<dyn ContentPolicy>,
    retriever: Retriever,
    generator: AnswerGenerator,
    answer_prompt: PromptDefinition,
}

impl ChatEngine {
    pub fn new(
        settings: ChatSettings,
        policy: Arc<dyn ContentPolicy>,
        retriever: Retriever,
        generator: AnswerGenerator,
        answer_prompt: PromptDefinition,
    ) -> Self {
        Self {
            settings,
            policy,
            retriever,
            generator,
            answer_prompt,
        }
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Handle one user input, appending the user and assistant turns.
    pub async fn handle_turn(&self, session: &mut ChatSession, prompt: &str) -> TurnOutcome {
        session.push(ChatTurn::user(prompt));

        if !self.policy.decide(prompt).await {
            tracing::info!("Request refused by {}", self.policy.policy_name());
            session.push(ChatTurn::assistant(REFUSAL_MESSAGE, Vec::new()));
            return TurnOutcome::Refused;
        }

        let passages = self
            .retriever
            .retrieve(prompt, &self.settings.knowledge_base_id)
            .await;

        let answer = match self.combined_prompt(&passages, prompt) {
            Ok(combined) => {
                self.generator
                    .generate(
                        &combined,
                        &self.settings.model_id,
                        self.settings.temperature,
                        self.settings.top_p,
                    )
                    .await
            }
            Err(e) => {
                tracing::error!("Error building answer prompt: {}", e);
                String::new()
            }
        };

        session.push(ChatTurn::assistant(answer, passages));
        TurnOutcome::Answered
    }

    /// Render the answer prompt with the passage texts as context.
    pub fn combined_prompt(
        &self,
        passages: &[RetrievedPassage],
        prompt: &str,
    ) -> AppResult<String> {
        let mut variables = HashMap::new();
        variables.insert("context".to_string(), build_context(passages));
        variables.insert("prompt".to_string(), prompt.to_string());

        Ok(build_prompt(&self.answer_prompt, variables)?.text)
    }
}

/// Passage texts joined with newlines.
pub fn build_context(passages: &[RetrievedPassage]) -> String {
    passages
        .iter()
        .map(|passage| passage.content())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragchat_knowledge::PassageSource;

    fn passage(text: &str) -> RetrievedPassage {
        RetrievedPassage::new(
            text,
            0.5,
            PassageSource {
                origin_type: "S3".to_string(),
                locator: "Unknown".to_string(),
                metadata: Default::default(),
            },
        )
    }

    #[test]
    fn test_build_context_joins_with_newlines() {
        let passages = vec![passage("one"), passage("two"), passage("three")];
        assert_eq!(build_context(&passages), "one\ntwo\nthree");
        assert_eq!(build_context(&[]), "");
    }

    #[test]
    fn test_settings_require_knowledge_base() {
        let mut config = AppConfig::default();
        assert!(ChatSettings::from_config(&config).is_err());

        config.knowledge_base_id = "KB12345".to_string();
        let settings = ChatSettings::from_config(&config).unwrap();
        assert_eq!(settings.knowledge_base_id, "KB12345");
        assert_eq!(settings.model_id, config.model);
    }
}
