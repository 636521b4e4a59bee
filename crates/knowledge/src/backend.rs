//! Retrieval backend trait.

use crate::types::{RawRetrievalResult, RetrievalRequest};
use ragchat_core::AppResult;

/// A hosted retrieval service.
///
/// Implementations return raw results in the service's ranking order;
/// normalization and the top-K cap live in [`crate::Retriever`].
#[async_trait::async_trait]
pub trait RetrievalBackend: Send + Sync {
    /// Get backend name (e.g., "bedrock-kb")
    fn backend_name(&self) -> &str;

    /// Run a similarity search.
    async fn retrieve(&self, request: &RetrievalRequest) -> AppResult<Vec<RawRetrievalResult>>;
}
