//! Retrieve command handler.
//!
//! Runs only knowledge base retrieval and prints the citation list. Service
//! failures are reported as errors.

use crate::render;
use crate::runtime::build_retriever;
use clap::Args;
use ragchat_core::{config::AppConfig, AppResult};
use ragchat_knowledge::{citations_for, DEFAULT_TOP_K};

/// Run only knowledge base retrieval for a query
#[derive(Args, Debug)]
pub struct RetrieveCommand {
    /// The query text
    pub query: String,

    /// Number of passages to request
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    pub top_k: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl RetrieveCommand {
    /// Execute the retrieve command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing retrieve command");

        let knowledge_base_id = config.require_knowledge_base()?;
        let retriever = build_retriever(config)?.with_top_k(self.top_k);
        let passages = retriever.try_retrieve(&self.query, knowledge_base_id).await?;

        if self.json {
            let output = serde_json::json!({
                "knowledgeBaseId": knowledge_base_id,
                "query": self.query,
                "sources": citations_for(&passages),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else if passages.is_empty() {
            println!("No passages found.");
        } else {
            render::write_sources(&mut std::io::stdout().lock(), &passages)?;
        }

        Ok(())
    }
}
