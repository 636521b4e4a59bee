//! User-facing source citations.
//!
//! Converts retrieved passages into the fields shown next to an answer.
//! Scores and locators are kept; rendering is left to the caller.

use crate::types::{RetrievedPassage, UNKNOWN_LOCATOR};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Maximum preview length in characters.
pub const PREVIEW_CHARS: usize = 200;

/// A single citation for a retrieved passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// 1-based position in the retrieval order
    pub index: usize,

    /// Document filename (e.g., "ex200-service.pdf")
    pub document: String,

    /// Full storage locator
    pub location: String,

    /// Relevance as a percentage string (e.g., "81.23%")
    pub relevance: String,

    /// Truncated passage text
    pub preview: String,

    /// Source metadata, omitted when empty
    #[serde(skip_serializing_if = "Map::is_empty", default)]
    pub metadata: Map<String, Value>,
}

impl Citation {
    pub fn from_passage(index: usize, passage: &RetrievedPassage) -> Self {
        let source = passage.source();
        Self {
            index,
            document: document_name(&source.locator),
            location: source.locator.clone(),
            relevance: format_relevance(passage.score()),
            preview: content_preview(passage.content()),
            metadata: source.metadata.clone(),
        }
    }
}

/// Build citations for passages in their retrieval order.
pub fn citations_for(passages: &[RetrievedPassage]) -> Vec<Citation> {
    passages
        .iter()
        .enumerate()
        .map(|(i, passage)| Citation::from_passage(i + 1, passage))
        .collect()
}

/// Filename taken from the last `/` segment of a locator.
pub fn document_name(locator: &str) -> String {
    if locator == UNKNOWN_LOCATOR {
        return UNKNOWN_LOCATOR.to_string();
    }

    match locator.rsplit('/').next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => UNKNOWN_LOCATOR.to_string(),
    }
}

/// Score as a percentage with two decimals.
pub fn format_relevance(score: f64) -> String {
    format!("{:.2}%", score * 100.0)
}

/// First [`PREVIEW_CHARS`] characters, with `...` when cut.
pub fn content_preview(text: &str) -> String {
    let mut chars = text.char_indices();
    match chars.nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PassageSource;

    fn passage(text: &str, score: f64, locator: &str) -> RetrievedPassage {
        RetrievedPassage::new(
            text,
            score,
            PassageSource {
                origin_type: "S3".to_string(),
                locator: locator.to_string(),
                metadata: Map::new(),
            },
        )
    }

    #[test]
    fn test_document_name() {
        assert_eq!(
            document_name("s3://manuals/excavators/ex200-service.pdf"),
            "ex200-service.pdf"
        );
        assert_eq!(document_name("Unknown"), "Unknown");
        assert_eq!(document_name("plain-name.txt"), "plain-name.txt");
        assert_eq!(document_name("s3://bucket/folder/"), "Unknown");
    }

    #[test]
    fn test_format_relevance() {
        assert_eq!(format_relevance(0.8123), "81.23%");
        assert_eq!(format_relevance(0.0), "0.00%");
        assert_eq!(format_relevance(1.0), "100.00%");
    }

    #[test]
    fn test_content_preview_truncates_at_200_chars() {
        let short = "Grease the boom pins daily.";
        assert_eq!(content_preview(short), short);

        let exact = "a".repeat(200);
        assert_eq!(content_preview(&exact), exact);

        let long = "b".repeat(250);
        let preview = content_preview(&long);
        assert_eq!(preview, format!("{}...", "b".repeat(200)));
    }

    #[test]
    fn test_content_preview_counts_characters_not_bytes() {
        let long = "é".repeat(201);
        let preview = content_preview(&long);
        assert_eq!(preview.chars().count(), 203);
        assert!(preview.starts_with("éé"));
    }

    #[test]
    fn test_citations_follow_retrieval_order() {
        let passages = vec![
            passage("first", 0.9, "s3://b/one.pdf"),
            passage("second", 0.5, "Unknown"),
        ];

        let citations = citations_for(&passages);
        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].index, 1);
        assert_eq!(citations[0].document, "one.pdf");
        assert_eq!(citations[0].relevance, "90.00%");
        assert_eq!(citations[1].index, 2);
        assert_eq!(citations[1].document, "Unknown");
        assert_eq!(citations[1].location, "Unknown");
    }

    #[test]
    fn test_empty_metadata_not_serialized() {
        let citation = Citation::from_passage(1, &passage("text", 0.1, "s3://b/a.txt"));
        let json = serde_json::to_value(&citation).unwrap();
        assert!(json.get("metadata").is_none());
    }
}
