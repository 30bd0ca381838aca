//! Quality configuration - the declarative rule set a validator compiles.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declarative quality rules for generated content.
///
/// Every field is optional; an absent field means the corresponding rule is
/// inactive, never an error. A config is compiled exactly once by the
/// validator and reused across validations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Brand voice and preferred language
    pub brand_guidelines: Option<BrandGuidelines>,

    /// Numeric bounds and content-shape flags
    pub quality_standards: Option<QualityStandards>,

    /// Element name -> human description; presence is checked by name
    pub required_elements: Option<BTreeMap<String, String>>,

    /// Phrases that should appear (advisory, surfaced in instructions only)
    pub key_phrases: Option<Vec<String>>,

    /// Phrases that must never appear
    pub forbidden_phrases: Option<Vec<String>>,

    /// Free-text style guidance (advisory)
    pub style_guide: Option<String>,

    /// Good/bad example pair (advisory)
    pub examples: Option<ContentExamples>,
}

/// Brand voice description and preferred wording.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandGuidelines {
    /// Free-text voice description
    pub voice: Option<String>,

    /// Brand values
    pub values: Option<Vec<String>>,

    /// Preferred phrases to use
    pub do_use: Option<Vec<String>>,
}

/// Numeric bounds and content-shape requirements.
///
/// The three `must_include_*` flags are accepted in configuration but not
/// enforced by validation; only the word-count bounds are. The gap is kept
/// as configured product behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityStandards {
    /// Minimum word count (inclusive)
    pub min_word_count: Option<usize>,

    /// Maximum word count (inclusive)
    pub max_word_count: Option<usize>,

    /// Content should contain examples
    pub must_include_examples: Option<bool>,

    /// Content should contain actionable steps
    pub must_include_actionable_steps: Option<bool>,

    /// Content should contain statistics
    pub must_include_statistics: Option<bool>,
}

/// A pair of reference examples illustrating the desired style.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentExamples {
    /// Example of content in the desired style
    pub good: Option<String>,

    /// Example of content to avoid
    pub bad: Option<String>,
}

impl QualityConfig {
    /// Whether any control is active.
    pub fn has_controls(&self) -> bool {
        self.forbidden_phrases.as_ref().is_some_and(|p| !p.is_empty())
            || self.key_phrases.as_ref().is_some_and(|p| !p.is_empty())
            || self
                .quality_standards
                .as_ref()
                .is_some_and(|s| s.min_word_count.is_some() || s.max_word_count.is_some())
            || self.required_elements.as_ref().is_some_and(|e| !e.is_empty())
            || self.style_guide.is_some()
            || self.brand_guidelines.is_some()
            || self.examples.is_some()
    }
}

/// Result of validating one content string against a compiled config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityResult {
    /// Human-readable issues; empty means clean
    pub issues: Vec<String>,

    /// Heuristic score in the 0.5-0.9 range
    pub score: f64,

    /// True iff no issues were found
    pub passed: bool,
}
