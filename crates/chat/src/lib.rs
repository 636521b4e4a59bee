//! Chat orchestration for ragchat.
//!
//! Ties the content policy, retriever and generator together into a
//! per-turn flow over an append-only [`ChatSession`].
//!
//! # Example
//! ```no_run
//! use ragchat_chat::{ChatEngine, ChatSession};
//!
//! # async fn example(engine: ChatEngine) {
//! let mut session = ChatSession::new();
//! engine
//!     .handle_turn(&mut session, "How often should excavator tracks be tensioned?")
//!     .await;
//! for turn in session.turns() {
//!     println!("{}: {}", turn.role(), turn.content());
//! }
//! # }
//! ```

pub mod engine;
pub mod generator;
pub mod policy;
pub mod session;

#[cfg(test)]
mod tests;

// Re-export main types
pub use engine::{build_context, ChatEngine, ChatSettings, TurnOutcome, REFUSAL_MESSAGE};
pub use generator::{AnswerGenerator, ANSWER_MAX_TOKENS};
pub use policy::{
    ClassificationResult, ContentCategory, ContentPolicy, LlmContentPolicy, PERMITTED_LABEL,
};
pub use session::{ChatSession, ChatTurn};
