//! Classify command handler.
//!
//! Runs only the content policy gate. Unlike `ask`, a service failure is
//! reported as an error instead of a silent refusal.

use crate::runtime::build_policy;
use clap::Args;
use ragchat_core::{config::AppConfig, AppResult};
use ragchat_llm::create_client;

/// Run only the content policy gate on a prompt
#[derive(Args, Debug)]
pub struct ClassifyCommand {
    /// The prompt to classify
    pub prompt: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ClassifyCommand {
    /// Execute the classify command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing classify command");

        let client = create_client(&config.service)?;
        let policy = build_policy(config, client)?;
        let result = policy.try_classify(&self.prompt, &config.model).await?;

        if self.json {
            let output = serde_json::json!({
                "label": result.label,
                "category": result.category,
                "permitted": result.permitted(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("Label: {}", result.label);
            println!("Category: {:?}", result.category);
            println!("Permitted: {}", if result.permitted() { "yes" } else { "no" });
        }

        Ok(())
    }
}
