//! Knowledge base retrieval.
//!
//! Fetches the top-K passages for a query and normalizes them. The backend is
//! injected so the retriever can run against test doubles.

use crate::backend::RetrievalBackend;
use crate::types::{RetrievalRequest, RetrievedPassage};
use ragchat_core::AppResult;
use std::sync::Arc;

/// Number of passages requested per query.
pub const DEFAULT_TOP_K: u32 = 3;

/// Retrieves passages from a knowledge collection.
#[derive(Clone)]
pub struct Retriever {
    backend: Arc<dyn RetrievalBackend>,
    top_k: u32,
}

impl Retriever {
    pub fn new(backend: Arc<dyn RetrievalBackend>) -> Self {
        Self {
            backend,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Override the result count (minimum 1).
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn top_k(&self) -> u32 {
        self.top_k
    }

    /// Retrieve passages, surfacing backend failures.
    ///
    /// At most `top_k` passages are returned, in the backend's order.
    pub async fn try_retrieve(
        &self,
        query: &str,
        knowledge_base_id: &str,
    ) -> AppResult<Vec<RetrievedPassage>> {
        let request = RetrievalRequest {
            knowledge_base_id: knowledge_base_id.to_string(),
            query: query.to_string(),
            number_of_results: self.top_k,
        };

        let raw = self.backend.retrieve(&request).await?;

        let passages: Vec<RetrievedPassage> = raw
            .into_iter()
            .take(self.top_k as usize)
            .map(RetrievedPassage::from_raw)
            .collect();

        tracing::info!("Found {} knowledge base results", passages.len());

        Ok(passages)
    }

    /// Retrieve passages, treating any failure as "no passages".
    pub async fn retrieve(&self, query: &str, knowledge_base_id: &str) -> Vec<RetrievedPassage> {
        match self.try_retrieve(query, knowledge_base_id).await {
            Ok(passages) => passages,
            Err(e) => {
                tracing::error!(
                    "Error retrieving from knowledge base via {}: {}",
                    self.backend.backend_name(),
                    e
                );
                Vec::new()
            }
        }
    }
}
