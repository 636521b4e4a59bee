//! Chat command handler.
//!
//! Runs an interactive session on stdin/stdout, one turn at a time.

use crate::render;
use crate::runtime::build_engine;
use clap::Args;
use ragchat_chat::ChatSession;
use ragchat_core::{config::AppConfig, AppResult};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Start an interactive chat session
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Hide the per-turn source list
    #[arg(long)]
    pub no_sources: bool,
}

/// Input typed at the chat prompt.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput<'a> {
    Empty,
    History,
    Clear,
    Quit,
    Help,
    Message(&'a str),
}

impl<'a> ChatInput<'a> {
    fn parse(line: &'a str) -> Self {
        match line.trim() {
            "" => Self::Empty,
            "/history" => Self::History,
            "/clear" => Self::Clear,
            "/quit" | "/exit" => Self::Quit,
            "/help" => Self::Help,
            text => Self::Message(text),
        }
    }
}

const HELP: &str = "Commands: /history re-shows the conversation, /clear starts over, /quit exits";

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let engine = build_engine(config)?;
        let mut session = ChatSession::new();
        tracing::debug!("Started session {}", session.id());

        println!(
            "Chatting with {} over knowledge base {}.",
            engine.settings().model_id,
            engine.settings().knowledge_base_id
        );
        println!("{}", HELP);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match ChatInput::parse(&line) {
                ChatInput::Empty => continue,
                ChatInput::Quit => break,
                ChatInput::Help => println!("{}", HELP),
                ChatInput::Clear => {
                    session = ChatSession::new();
                    tracing::debug!("Started session {}", session.id());
                    println!("Conversation cleared.");
                }
                ChatInput::History => {
                    render::write_history(&mut std::io::stdout().lock(), &session)?;
                }
                ChatInput::Message(text) => {
                    engine.handle_turn(&mut session, text).await;

                    if let Some(reply) = session.last_turn() {
                        let mut out = std::io::stdout().lock();
                        writeln!(out, "Assistant: {}", reply.content())?;
                        if !self.no_sources && !reply.passages().is_empty() {
                            render::write_sources(&mut out, reply.passages())?;
                        }
                        writeln!(out)?;
                    }
                }
            }
        }

        tracing::debug!("Session {} ended after {} turns", session.id(), session.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_input() {
        assert_eq!(ChatInput::parse("   "), ChatInput::Empty);
        assert_eq!(ChatInput::parse("/history"), ChatInput::History);
        assert_eq!(ChatInput::parse(" /clear "), ChatInput::Clear);
        assert_eq!(ChatInput::parse("/quit"), ChatInput::Quit);
        assert_eq!(ChatInput::parse("/exit"), ChatInput::Quit);
        assert_eq!(
            ChatInput::parse("  How do I tension the tracks?\n"),
            ChatInput::Message("How do I tension the tracks?")
        );
    }
}
