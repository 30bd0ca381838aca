//! Generated prompt items and their parsed payloads.
//!
//! `AgentPrompt` records are owned by the external generation service; this
//! crate only reads them. Every field the service may omit is optional.

use serde::{Deserialize, Serialize};

use crate::id::{AgentId, PromptId};
use crate::Time;

/// Lifecycle status of a generated prompt item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptStatus {
    /// Freshly generated, not yet reviewed
    Draft,
    /// Awaiting review
    Review,
    /// Approved for publication
    Approved,
    /// Publicly visible
    Published,
    /// Rejected during review
    Rejected,
    /// Generation or processing failed
    Failed,
}

/// Error parsing a [`PromptStatus`] from a string.
#[derive(Debug, thiserror::Error)]
#[error("unknown prompt status: {0}")]
pub struct ParseStatusError(String);

impl std::str::FromStr for PromptStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "review" => Ok(Self::Review),
            "approved" => Ok(Self::Approved),
            "published" => Ok(Self::Published),
            "rejected" => Ok(Self::Rejected),
            "failed" => Ok(Self::Failed),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl std::fmt::Display for PromptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Review => "review",
            Self::Approved => "approved",
            Self::Published => "published",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A single generated content item, as stored by the agent service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentPrompt {
    /// Unique identifier
    pub id: PromptId,

    /// Owning agent
    pub agent_id: AgentId,

    /// Topic the item was generated for
    #[serde(default)]
    pub topic: Option<String>,

    /// Keyword the item targets
    #[serde(default)]
    pub keyword: Option<String>,

    /// Input fed to the generation model
    #[serde(default)]
    pub raw_input: Option<String>,

    /// JSON-encoded candidate content produced by the model
    #[serde(default)]
    pub raw_output: Option<String>,

    /// Score assigned by the generation pipeline
    #[serde(default)]
    pub quality_score: Option<f64>,

    /// Lifecycle status
    #[serde(default)]
    pub status: Option<PromptStatus>,

    /// Free-form service metadata
    #[serde(default)]
    pub metadata: serde_json::Value,

    /// Creation time, if the service reports one
    #[serde(default)]
    pub created_at: Option<Time>,
}

/// Candidate content decoded from [`AgentPrompt::raw_output`].
///
/// The payload is model-generated and frequently incomplete; every field is
/// optional and unknown fields are ignored. A malformed payload decodes to
/// the default (empty) value rather than an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedContent {
    /// Display name of the generated prompt
    pub name: Option<String>,

    /// Short description
    pub description: Option<String>,

    /// The prompt text itself
    pub prompt_text: Option<String>,

    /// Tag list
    pub tags: Option<Vec<String>>,

    /// Structured extras the model may attach
    pub metadata: Option<ContentMetadata>,
}

/// Structured extras inside a generated payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentMetadata {
    /// Suggested use cases
    pub use_cases: Option<Vec<String>>,

    /// Example of the output the prompt produces
    pub example_output: Option<String>,
}

impl GeneratedContent {
    /// Decode a raw payload, falling back to the empty value on any failure.
    ///
    /// Missing or malformed model output scores zero downstream; it is never
    /// an error.
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.and_then(|s| serde_json::from_str(s).ok()).unwrap_or_default()
    }
}
