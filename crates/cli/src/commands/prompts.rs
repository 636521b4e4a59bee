//! Prompts command handler.
//!
//! Lists prompt definitions and where each one resolves from.

use clap::Args;
use ragchat_core::{config::AppConfig, AppResult};
use ragchat_prompt::{list_prompts, load_prompt};

/// List available prompt definitions
#[derive(Args, Debug)]
pub struct PromptsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PromptsCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let prompts_dir = config.ragchat_dir().join("prompts");
        let mut rows = Vec::new();

        for id in list_prompts(&config.workspace)? {
            let overridden = prompts_dir.join(format!("{}.yml", id)).exists();
            match load_prompt(&config.workspace, &id) {
                Ok(def) => rows.push((id, def.title, overridden)),
                Err(e) => tracing::warn!("Skipping prompt '{}': {}", id, e),
            }
        }

        if self.json {
            let output: Vec<_> = rows
                .iter()
                .map(|(id, title, overridden)| {
                    serde_json::json!({"id": id, "title": title, "overridden": overridden})
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            for (id, title, overridden) in rows {
                let origin = if overridden { "workspace" } else { "built-in" };
                println!("{:<20} {:<10} {}", id, origin, title);
            }
        }

        Ok(())
    }
}
