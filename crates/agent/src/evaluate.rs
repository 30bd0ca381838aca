//! Per-item quality evaluation.
//!
//! Scores a single generated prompt item on four dimensions. The function is
//! pure and total: the same item always yields the same metrics, and missing
//! or malformed payloads score zero instead of erroring.

use promptqa_core::{AgentPrompt, GeneratedContent, QualityMetrics};

/// Evaluate one generated item.
///
/// Each dimension is a sum of fixed-weight checks on a 0-100 scale; see the
/// individual scoring functions. `overall` is the weighted blend computed by
/// [`QualityMetrics::from_components`].
pub fn evaluate_prompt_quality(prompt: &AgentPrompt) -> QualityMetrics {
    let content = GeneratedContent::from_raw(prompt.raw_output.as_deref());

    QualityMetrics::from_components(
        score_clarity(prompt, &content),
        score_usefulness(&content),
        score_uniqueness(prompt),
        score_seo(prompt, &content),
    )
}

/// 25 points each: named, described, prompt text over 50 chars, tagged.
fn score_clarity(prompt: &AgentPrompt, content: &GeneratedContent) -> f64 {
    let mut score = 0.0;
    if present(content.name.as_deref()) || present(prompt.topic.as_deref()) {
        score += 25.0;
    }
    if present(content.description.as_deref()) {
        score += 25.0;
    }
    if content.prompt_text.as_deref().is_some_and(|t| t.len() > 50) {
        score += 25.0;
    }
    if content.tags.as_ref().is_some_and(|t| !t.is_empty()) {
        score += 25.0;
    }
    score
}

/// 33 points for use cases, 33 for an example output, 34 for prompt text
/// over 200 chars.
fn score_usefulness(content: &GeneratedContent) -> f64 {
    let mut score = 0.0;
    let metadata = content.metadata.as_ref();
    if metadata
        .and_then(|m| m.use_cases.as_ref())
        .is_some_and(|u| !u.is_empty())
    {
        score += 33.0;
    }
    if metadata.is_some_and(|m| present(m.example_output.as_deref())) {
        score += 33.0;
    }
    if content.prompt_text.as_deref().is_some_and(|t| t.len() > 200) {
        score += 34.0;
    }
    score
}

/// 50 points for a non-empty keyword, 50 when keyword and topic differ.
fn score_uniqueness(prompt: &AgentPrompt) -> f64 {
    let keyword = prompt.keyword.as_deref().unwrap_or("");
    let topic = prompt.topic.as_deref().unwrap_or("");

    let mut score = 0.0;
    if !keyword.is_empty() {
        score += 50.0;
    }
    if keyword != topic {
        score += 50.0;
    }
    score
}

/// 33 points each for the keyword inside name and description
/// (case-insensitive), 34 for three or more tags.
fn score_seo(prompt: &AgentPrompt, content: &GeneratedContent) -> f64 {
    let mut score = 0.0;
    let keyword = prompt.keyword.as_deref().unwrap_or("").to_lowercase();

    if !keyword.is_empty() {
        if content
            .name
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(&keyword))
        {
            score += 33.0;
        }
        if content
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&keyword))
        {
            score += 33.0;
        }
    }
    if content.tags.as_ref().is_some_and(|t| t.len() >= 3) {
        score += 34.0;
    }
    score
}

fn present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
