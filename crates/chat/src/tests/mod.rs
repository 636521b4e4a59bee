//! Shared test doubles and end-to-end turn scenarios.


use crate::policy::ContentPolicy;
use ragchat_core::{AppError, AppResult};
use ragchat_knowledge::{RawRetrievalResult, RetrievalBackend, RetrievalRequest};
use ragchat_llm::{ContentBlock, LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    NoContent,
    Fail,
}

/// LLM double that replays scripted replies and records every request.
///
/// Once the script runs out the last reply repeats.
pub(crate) struct ScriptedLlm {
    replies: Vec<Reply>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedLlm {
    fn from_replies(replies: Vec<Reply>) -> Self {
        Self {
            replies,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn replying(text: &str) -> Self {
        Self::sequence(&[text])
    }

    pub(crate) fn sequence(texts: &[&str]) -> Self {
        Self::from_replies(texts.iter().map(|t| Reply::Text(t.to_string())).collect())
    }

    pub(crate) fn failing() -> Self {
        Self::from_replies(vec![Reply::Fail])
    }

    pub(crate) fn without_content() -> Self {
        Self::from_replies(vec![Reply::NoContent])
    }

    /// Classify with `label`, then fail every later call.
    pub(crate) fn label_then_fail(label: &str) -> Self {
        Self::from_replies(vec![Reply::Text(label.to_string()), Reply::Fail])
    }

    pub(crate) fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlm {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };

        let reply = self
            .replies
            .get(call)
            .or_else(|| self.replies.last())
            .cloned()
            .unwrap_or(Reply::Fail);

        let content = match reply {
            Reply::Text(text) => vec![ContentBlock::text(text)],
            Reply::NoContent => Vec::new(),
            Reply::Fail => {
                return Err(AppError::Llm(
                    "service error (403 AccessDeniedException): invalid key".to_string(),
                ))
            }
        };

        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            stop_reason: Some("end_turn".to_string()),
            usage: LlmUsage::default(),
        })
    }
}

/// Retrieval double returning a fixed ranked list.
pub(crate) struct StaticBackend {
    results: AppResult<Vec<RawRetrievalResult>>,
    calls: AtomicUsize,
}

impl StaticBackend {
    pub(crate) fn with_passages(passages: &[(&str, f64, &str)]) -> Self {
        let results = passages
            .iter()
            .map(|(text, score, uri)| {
                serde_json::from_value(serde_json::json!({
                    "content": {"text": text},
                    "score": score,
                    "location": {"type": "S3", "s3Location": {"uri": uri}}
                }))
                .unwrap()
            })
            .collect();
        Self {
            results: Ok(results),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            results: Err(AppError::Knowledge("ThrottlingException".to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RetrievalBackend for StaticBackend {
    fn backend_name(&self) -> &str {
        "static"
    }

    async fn retrieve(&self, _request: &RetrievalRequest) -> AppResult<Vec<RawRetrievalResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.results {
            Ok(results) => Ok(results.clone()),
            Err(e) => Err(AppError::Knowledge(e.to_string())),
        }
    }
}

/// Policy double with a fixed decision and a call counter.
pub(crate) struct CountingPolicy {
    allow: bool,
    calls: AtomicUsize,
}

impl CountingPolicy {
    pub(crate) fn new(allow: bool) -> Self {
        Self {
            allow,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ContentPolicy for CountingPolicy {
    fn policy_name(&self) -> &str {
        "counting"
    }

    async fn decide(&self, _text: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.allow
    }
}
