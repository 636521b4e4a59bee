//! Client wiring.
//!
//! Builds the service clients once per command and injects them into the
//! chat components.

use ragchat_chat::{AnswerGenerator, ChatEngine, ChatSettings, LlmContentPolicy};
use ragchat_core::{config::AppConfig, AppResult};
use ragchat_knowledge::{BedrockKnowledgeBase, Retriever};
use ragchat_llm::{create_client, LlmClient};
use ragchat_prompt::{load_prompt, ANSWER_PROMPT_ID, CLASSIFY_PROMPT_ID};
use std::sync::Arc;

/// Content policy backed by the configured model.
pub fn build_policy(
    config: &AppConfig,
    client: Arc<dyn LlmClient>,
) -> AppResult<LlmContentPolicy> {
    let definition = load_prompt(&config.workspace, CLASSIFY_PROMPT_ID)?;
    Ok(LlmContentPolicy::new(client, config.model.clone(), definition))
}

/// Retriever backed by the configured knowledge base service.
pub fn build_retriever(config: &AppConfig) -> AppResult<Retriever> {
    let backend = BedrockKnowledgeBase::new(&config.service)?;
    Ok(Retriever::new(Arc::new(backend)))
}

/// Fully wired chat engine.
pub fn build_engine(config: &AppConfig) -> AppResult<ChatEngine> {
    let settings = ChatSettings::from_config(config)?;
    let client = create_client(&config.service)?;

    let policy = build_policy(config, client.clone())?;
    let retriever = build_retriever(config)?;
    let answer_prompt = load_prompt(&config.workspace, ANSWER_PROMPT_ID)?;

    tracing::debug!(
        "Chat engine ready (model: {}, knowledge base: {})",
        settings.model_id,
        settings.knowledge_base_id
    );

    Ok(ChatEngine::new(
        settings,
        Arc::new(policy),
        retriever,
        AnswerGenerator::new(client),
        answer_prompt,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> AppConfig {
        AppConfig {
            workspace: dir.path().to_path_buf(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_engine_requires_knowledge_base() {
        let dir = TempDir::new().unwrap();
        assert!(build_engine(&config_in(&dir)).is_err());
    }

    #[test]
    fn test_engine_builds_with_knowledge_base() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.knowledge_base_id = "KB12345".to_string();

        let engine = build_engine(&config).unwrap();
        assert_eq!(engine.settings().knowledge_base_id, "KB12345");
        assert_eq!(engine.settings().model_id, config.model);
    }

    #[test]
    fn test_policy_uses_workspace_override() {
        let dir = TempDir::new().unwrap();
        let prompts = dir.path().join(".ragchat").join("prompts");
        std::fs::create_dir_all(&prompts).unwrap();
        std::fs::write(
            prompts.join("policy.classify.yml"),
            "id: policy.classify\ntitle: Custom gate\napiVersion: \"1.0\"\nvariables: [prompt]\ntemplate: \"Label: {{prompt}}\"\n",
        )
        .unwrap();

        let config = config_in(&dir);
        let client = create_client(&config.service).unwrap();
        let policy = build_policy(&config, client).unwrap();
        assert_eq!(policy.model_id(), config.model);
    }
}
