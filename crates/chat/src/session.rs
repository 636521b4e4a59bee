//! Chat session history.
//!
//! A session is one ordered list of turns. Assistant turns own the passages
//! that backed them, so history and citations can never drift apart.

use chrono::{DateTime, Utc};
use ragchat_knowledge::RetrievedPassage;
use ragchat_llm::Role;
use serde::Serialize;
use uuid::Uuid;

/// A single message in the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatTurn {
    role: Role,
    content: String,
    passages: Vec<RetrievedPassage>,
    created_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            passages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>, passages: Vec<RetrievedPassage>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            passages,
            created_at: Utc::now(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Passages attached to this turn; always empty for user turns.
    pub fn passages(&self) -> &[RetrievedPassage] {
        &self.passages
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Append-only history of one conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    turns: Vec<ChatTurn>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            turns: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn last_turn(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub(crate) fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }
}
