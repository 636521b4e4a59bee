//! Amazon Bedrock Knowledge Bases backend.
//!
//! Calls the Retrieve API:
//! `POST {endpoint}/knowledgebases/{knowledgeBaseId}/retrieve`.

use crate::backend::RetrievalBackend;
use crate::types::{RawRetrievalResult, RawRetrieveResponse, RetrievalRequest};
use ragchat_core::{AppError, AppResult, RetryPolicy, ServiceConfig};
use ragchat_llm::http::{build_http_client, post_json};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrieveBody<'a> {
    retrieval_query: RetrievalQuery<'a>,
    retrieval_configuration: RetrievalConfiguration,
}

#[derive(Debug, Serialize)]
struct RetrievalQuery<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalConfiguration {
    vector_search_configuration: VectorSearchConfiguration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VectorSearchConfiguration {
    number_of_results: u32,
}

/// Bedrock agent-runtime retrieval client.
pub struct BedrockKnowledgeBase {
    base_url: String,
    api_key: Option<String>,
    retry: RetryPolicy,
    client: reqwest::Client,
}

impl BedrockKnowledgeBase {
    /// Create a backend from service settings.
    pub fn new(service: &ServiceConfig) -> AppResult<Self> {
        Ok(Self {
            base_url: service.agent_runtime_endpoint(),
            api_key: service.resolve_api_key(),
            retry: service.retry,
            client: build_http_client(service.timeout())?,
        })
    }

    /// Create a backend against a custom base URL (gateways, tests).
    pub fn with_base_url(base_url: impl Into<String>, api_key: Option<String>) -> AppResult<Self> {
        let service = ServiceConfig::default();
        Ok(Self {
            base_url: base_url.into(),
            api_key,
            retry: service.retry,
            client: build_http_client(service.timeout())?,
        })
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn retrieve_url(&self, knowledge_base_id: &str) -> AppResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            AppError::Config(format!(
                "Invalid agent runtime endpoint '{}': {}",
                self.base_url, e
            ))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                AppError::Config(format!(
                    "Agent runtime endpoint cannot be a base URL: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push("knowledgebases")
            .push(knowledge_base_id)
            .push("retrieve");

        Ok(url)
    }
}

#[async_trait::async_trait]
impl RetrievalBackend for BedrockKnowledgeBase {
    fn backend_name(&self) -> &str {
        "bedrock-kb"
    }

    async fn retrieve(&self, request: &RetrievalRequest) -> AppResult<Vec<RawRetrievalResult>> {
        if request.knowledge_base_id.trim().is_empty() {
            return Err(AppError::Knowledge(
                "Knowledge base id cannot be empty".to_string(),
            ));
        }

        let url = self.retrieve_url(&request.knowledge_base_id)?;
        let body = RetrieveBody {
            retrieval_query: RetrievalQuery {
                text: &request.query,
            },
            retrieval_configuration: RetrievalConfiguration {
                vector_search_configuration: VectorSearchConfiguration {
                    number_of_results: request.number_of_results,
                },
            },
        };

        tracing::debug!(
            "Retrieving {} result(s) from knowledge base {}",
            request.number_of_results,
            request.knowledge_base_id
        );

        let response: RawRetrieveResponse = self
            .retry
            .run("Retrieve", || {
                post_json(
                    &self.client,
                    url.clone(),
                    self.api_key.as_deref(),
                    &body,
                    AppError::Knowledge,
                )
            })
            .await?;

        if response.next_token.is_some() {
            tracing::debug!("Ignoring pagination token; only the first page is used");
        }

        Ok(response.retrieval_results)
    }
}
