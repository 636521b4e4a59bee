//! Models command handler.

use clap::Args;
use ragchat_core::{
    config::{AppConfig, KNOWN_MODELS},
    AppResult,
};

/// List known model identifiers
#[derive(Args, Debug)]
pub struct ModelsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ModelsCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        if self.json {
            let output = serde_json::json!({
                "selected": config.model,
                "known": KNOWN_MODELS,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        for model in KNOWN_MODELS {
            let marker = if *model == config.model { "*" } else { " " };
            println!("{} {}", marker, model);
        }

        if !config.is_known_model() {
            println!("* {} (custom)", config.model);
        }

        Ok(())
    }
}
