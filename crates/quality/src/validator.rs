//! Compiled content validator.

use promptqa_core::{QualityConfig, QualityResult};
use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::instructions;

/// Score awarded to content with no issues. Never 1.0.
const CLEAN_SCORE: f64 = 0.9;

/// Score deduction per issue.
const ISSUE_PENALTY: f64 = 0.15;

/// Maximum total deduction.
const MAX_PENALTY: f64 = 0.4;

/// A quality-rule set compiled for repeated validation.
///
/// Construction compiles the forbidden-phrase matcher and the instructions
/// block exactly once; [`validate`](Self::validate) reuses them and holds no
/// mutable state, so one instance is safe to share across concurrent
/// validations.
pub struct QualityControl {
    config: QualityConfig,
    forbidden: Option<Regex>,
    instructions: String,
}

impl QualityControl {
    /// Compile a config into a reusable validator.
    ///
    /// Never fails: missing config sections deactivate their checks, and a
    /// matcher that cannot be compiled degrades to "no forbidden-phrase
    /// check" with a logged warning.
    pub fn new(config: QualityConfig) -> Self {
        let forbidden = compile_forbidden(config.forbidden_phrases.as_deref());
        let instructions = instructions::build(&config);

        Self {
            config,
            forbidden,
            instructions,
        }
    }

    /// Validate one content string against the compiled rules.
    pub fn validate(&self, content: &str) -> QualityResult {
        let mut issues = Vec::new();

        if let Some(matcher) = &self.forbidden {
            let mut found: Vec<String> = Vec::new();
            for m in matcher.find_iter(content) {
                let phrase = m.as_str().to_lowercase();
                if !found.contains(&phrase) {
                    found.push(phrase);
                }
            }
            if !found.is_empty() {
                let listed: Vec<String> =
                    found.iter().map(|p| format!("\"{}\"", p)).collect();
                issues.push(format!("Contains forbidden phrases: {}", listed.join(", ")));
            }
        }

        if let Some(standards) = &self.config.quality_standards {
            if standards.min_word_count.is_some() || standards.max_word_count.is_some() {
                let words = content.split_whitespace().count();
                if let Some(min) = standards.min_word_count {
                    if words < min {
                        issues.push(format!(
                            "Content too short: {} words (minimum {})",
                            words, min
                        ));
                    }
                }
                if let Some(max) = standards.max_word_count {
                    if words > max {
                        issues.push(format!(
                            "Content too long: {} words (maximum {})",
                            words, max
                        ));
                    }
                }
            }
        }

        if let Some(elements) = &self.config.required_elements {
            // Heuristic presence check on the element name, not its meaning.
            let haystack = content.to_lowercase();
            for (element, description) in elements {
                if !haystack.contains(&element.to_lowercase()) {
                    issues.push(format!(
                        "Missing required element: {} ({})",
                        element, description
                    ));
                }
            }
        }

        let score = if issues.is_empty() {
            CLEAN_SCORE
        } else {
            let penalty = (issues.len() as f64 * ISSUE_PENALTY).min(MAX_PENALTY);
            CLEAN_SCORE - penalty
        };

        QualityResult {
            passed: issues.is_empty(),
            score,
            issues,
        }
    }

    /// The precompiled instructions block summarizing active rules.
    ///
    /// Intended to be fed into a generation prompt downstream.
    pub fn quality_instructions(&self) -> &str {
        &self.instructions
    }

    /// One-line summary of which controls are active.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        if let Some(phrases) = &self.config.forbidden_phrases {
            if !phrases.is_empty() {
                parts.push(format!("{} forbidden phrases", phrases.len()));
            }
        }
        if let Some(phrases) = &self.config.key_phrases {
            if !phrases.is_empty() {
                parts.push(format!("{} key phrases", phrases.len()));
            }
        }
        if let Some(min) = self
            .config
            .quality_standards
            .as_ref()
            .and_then(|s| s.min_word_count)
        {
            parts.push(format!("min {} words", min));
        }
        if self.config.style_guide.is_some() {
            parts.push("style guide".to_string());
        }

        if parts.is_empty() {
            "No quality controls configured".to_string()
        } else {
            parts.join(", ")
        }
    }

    /// The source config this validator was compiled from.
    pub fn config(&self) -> &QualityConfig {
        &self.config
    }
}

/// Compile the forbidden phrases into one case-insensitive alternation.
///
/// Phrases are matched literally; every regex metacharacter is escaped.
/// An empty or absent list builds no matcher.
fn compile_forbidden(phrases: Option<&[String]>) -> Option<Regex> {
    let phrases: Vec<&String> = phrases?
        .iter()
        .filter(|p| !p.trim().is_empty())
        .collect();
    if phrases.is_empty() {
        return None;
    }

    let pattern: Vec<String> = phrases.iter().map(|p| regex::escape(p)).collect();
    match RegexBuilder::new(&pattern.join("|"))
        .case_insensitive(true)
        .build()
    {
        Ok(matcher) => Some(matcher),
        Err(e) => {
            warn!("Skipping forbidden-phrase matcher: {}", e);
            None
        }
    }
}
