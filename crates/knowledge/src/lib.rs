//! Knowledge base retrieval for ragchat.
//!
//! Queries a hosted knowledge collection, normalizes the results into
//! [`RetrievedPassage`] records and turns them into citations.

pub mod backend;
pub mod citation;
pub mod providers;
pub mod retriever;
pub mod types;

// Re-export commonly used types
pub use backend::RetrievalBackend;
pub use citation::{citations_for, content_preview, document_name, format_relevance, Citation};
pub use providers::BedrockKnowledgeBase;
pub use retriever::{Retriever, DEFAULT_TOP_K};
pub use types::{
    PassageSource, RawRetrievalResult, RetrievalRequest, RetrievedPassage, UNKNOWN_LOCATOR,
};
