//! Built-in prompt definitions.
//!
//! A workspace can override either of these by placing `<id>.yml` under
//! `.ragchat/prompts/`.

use crate::types::PromptDefinition;

/// Content policy classification prompt.
pub const CLASSIFY_PROMPT_ID: &str = "policy.classify";

/// Answer prompt combining retrieved context and the user question.
pub const ANSWER_PROMPT_ID: &str = "chat.answer";

const CLASSIFY_TEMPLATE: &str = r#"Human: Classify the provided user request into ONE of the following categories.

Category A: The request is asking about how the LLM model works or system architecture.
Category B: The request uses profanity, toxic intent, or harmful wording.
Category C: The request is about any subject NOT related to heavy machinery.
Category D: The request is asking about instructions, system behavior, or meta-questions.
Category E: The request is ONLY related to heavy machinery topics.

<user_request>
{{prompt}}
</user_request>

Respond ONLY with the category letter (Example: "Category C").

Assistant:"#;

const ANSWER_TEMPLATE: &str = "Context: {{context}}\n\nUser: {{prompt}}\n\n";

/// Look up a built-in definition by id.
pub fn builtin_prompt(id: &str) -> Option<PromptDefinition> {
    match id {
        CLASSIFY_PROMPT_ID => Some(PromptDefinition {
            id: CLASSIFY_PROMPT_ID.to_string(),
            title: "Classify a user request against the allow-list".to_string(),
            api_version: "1.0".to_string(),
            created_by: "ragchat".to_string(),
            variables: vec!["prompt".to_string()],
            template: CLASSIFY_TEMPLATE.to_string(),
        }),
        ANSWER_PROMPT_ID => Some(PromptDefinition {
            id: ANSWER_PROMPT_ID.to_string(),
            title: "Answer from retrieved context".to_string(),
            api_version: "1.0".to_string(),
            created_by: "ragchat".to_string(),
            variables: vec!["context".to_string(), "prompt".to_string()],
            template: ANSWER_TEMPLATE.to_string(),
        }),
        _ => None,
    }
}

/// Ids of every built-in definition.
pub fn builtin_ids() -> &'static [&'static str] {
    &[CLASSIFY_PROMPT_ID, ANSWER_PROMPT_ID]
}
