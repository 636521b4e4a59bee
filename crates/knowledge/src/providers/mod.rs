//! Hosted retrieval backends.

pub mod bedrock;

pub use bedrock::BedrockKnowledgeBase;
