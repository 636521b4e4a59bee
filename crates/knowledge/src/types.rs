//! Knowledge base types.
//!
//! `Raw*` types mirror the retrieval service's response and tolerate missing
//! fields. `RetrievedPassage` is the normalized record the rest of the
//! application works with.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Locator used when a result has no object-store URI.
pub const UNKNOWN_LOCATOR: &str = "Unknown";

/// Origin type used when a result has no location at all.
pub const UNKNOWN_ORIGIN: &str = "Unknown";

/// A retrieval request against one knowledge collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalRequest {
    /// Knowledge collection identifier
    pub knowledge_base_id: String,

    /// Query text, sent verbatim
    pub query: String,

    /// Requested result count
    pub number_of_results: u32,
}

/// Where a passage came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassageSource {
    /// Origin type reported by the service (e.g. "S3")
    #[serde(rename = "type")]
    pub origin_type: String,

    /// Storage locator, or "Unknown"
    pub locator: String,

    /// Free-form metadata attached to the source document
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// A retrieved text snippet with its relevance and provenance.
///
/// Fields are private; a passage cannot change once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    content: String,
    score: f64,
    source: PassageSource,
}

impl RetrievedPassage {
    pub fn new(content: impl Into<String>, score: f64, source: PassageSource) -> Self {
        Self {
            content: content.into(),
            score,
            source,
        }
    }

    /// Normalize a raw service result, defaulting anything missing.
    pub fn from_raw(raw: RawRetrievalResult) -> Self {
        let content = raw.content.and_then(|c| c.text).unwrap_or_default();
        let score = raw.score.unwrap_or(0.0);

        let (origin_type, locator) = match raw.location {
            Some(location) => (
                location.kind.unwrap_or_else(|| UNKNOWN_ORIGIN.to_string()),
                location
                    .s3_location
                    .and_then(|s3| s3.uri)
                    .unwrap_or_else(|| UNKNOWN_LOCATOR.to_string()),
            ),
            None => (UNKNOWN_ORIGIN.to_string(), UNKNOWN_LOCATOR.to_string()),
        };

        Self {
            content,
            score,
            source: PassageSource {
                origin_type,
                locator,
                metadata: raw.metadata.unwrap_or_default(),
            },
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Relevance score; higher is more relevant.
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn source(&self) -> &PassageSource {
        &self.source
    }
}

/// Raw retrieval response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRetrieveResponse {
    #[serde(rename = "retrievalResults", default)]
    pub retrieval_results: Vec<RawRetrievalResult>,

    #[serde(rename = "nextToken", default)]
    pub next_token: Option<String>,
}

/// One raw retrieval result; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRetrievalResult {
    #[serde(default)]
    pub content: Option<RawContent>,

    #[serde(default)]
    pub score: Option<f64>,

    #[serde(default)]
    pub location: Option<RawLocation>,

    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawContent {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLocation {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(rename = "s3Location", default)]
    pub s3_location: Option<RawS3Location>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawS3Location {
    #[serde(default)]
    pub uri: Option<String>,
}
