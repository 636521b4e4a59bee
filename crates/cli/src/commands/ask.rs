//! Ask command handler.
//!
//! Runs a single turn and prints the answer with its sources.

use crate::render;
use crate::runtime::build_engine;
use clap::Args;
use ragchat_chat::{ChatSession, ChatTurn, TurnOutcome};
use ragchat_core::{config::AppConfig, AppError, AppResult};
use ragchat_knowledge::citations_for;
use std::io::Write;
use std::path::PathBuf;

/// Ask a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub prompt: Option<String>,

    /// Read the question from a file
    #[arg(short, long, conflicts_with = "prompt")]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let prompt = self.get_prompt()?;
        let engine = build_engine(config)?;
        let mut session = ChatSession::new();

        let outcome = engine.handle_turn(&mut session, &prompt).await;
        let reply = session
            .last_turn()
            .ok_or_else(|| AppError::Other("Turn produced no reply".to_string()))?;

        if self.json {
            let output = json_output(reply, outcome, engine.settings().model_id.as_str())?;
            println!("{}", output);
        } else {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{}", reply.content())?;
            if !reply.passages().is_empty() {
                writeln!(out)?;
                render::write_sources(&mut out, reply.passages())?;
            }
        }

        Ok(())
    }

    /// Get the prompt text from the argument or file.
    fn get_prompt(&self) -> AppResult<String> {
        let prompt = match (&self.prompt, &self.file) {
            (Some(prompt), _) => prompt.clone(),
            (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
                AppError::Config(format!("Failed to read prompt file {:?}: {}", path, e))
            })?,
            (None, None) => return Err(AppError::Config("No prompt provided".to_string())),
        };

        if prompt.trim().is_empty() {
            return Err(AppError::Config("Prompt cannot be empty".to_string()));
        }
        Ok(prompt)
    }
}

fn json_output(reply: &ChatTurn, outcome: TurnOutcome, model: &str) -> AppResult<String> {
    let output = serde_json::json!({
        "answer": reply.content(),
        "refused": outcome == TurnOutcome::Refused,
        "model": model,
        "sources": citations_for(reply.passages()),
    });

    Ok(serde_json::to_string_pretty(&output)?)
}
