//! Prompt types for ragchat.
//!
//! This module defines the domain entities for the prompt system.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A prompt definition, built in or loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Variables the template expects; rendering fails if one is missing
    #[serde(default)]
    pub variables: Vec<String>,

    /// Template string with Handlebars syntax
    pub template: String,
}

/// A rendered prompt ready to send to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// Rendered text
    pub text: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Template variables that were resolved
    #[serde(rename = "resolvedVariables")]
    pub resolved_variables: HashMap<String, String>,
}

impl BuiltPrompt {
    /// Create a new built prompt.
    pub fn new(
        text: String,
        source_prompt_id: String,
        resolved_variables: HashMap<String, String>,
    ) -> Self {
        Self {
            text,
            metadata: BuiltPromptMetadata {
                source_prompt_id,
                resolved_variables,
            },
        }
    }
}
