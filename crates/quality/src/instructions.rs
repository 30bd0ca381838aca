//! Quality instructions block, built once from a config.
//!
//! The block summarizes all active rules in a fixed order so it can be fed
//! back into a generation prompt. Absent config sections are skipped.

use promptqa_core::QualityConfig;

/// Build the instructions text block for a config.
///
/// Section order is fixed: brand voice, brand values, preferred language,
/// key phrases, forbidden phrases, style guide, required elements, good
/// example, bad example. Each present section is prefixed with a blank line
/// and an upper-case label.
pub fn build(config: &QualityConfig) -> String {
    let mut out = String::new();

    if let Some(brand) = &config.brand_guidelines {
        if let Some(voice) = &brand.voice {
            push_section(&mut out, "BRAND VOICE", voice);
        }
        if let Some(values) = &brand.values {
            if !values.is_empty() {
                push_section(&mut out, "BRAND VALUES", &values.join(", "));
            }
        }
        if let Some(do_use) = &brand.do_use {
            if !do_use.is_empty() {
                push_section(&mut out, "PREFERRED LANGUAGE", &do_use.join(", "));
            }
        }
    }

    if let Some(phrases) = &config.key_phrases {
        if !phrases.is_empty() {
            push_section(&mut out, "KEY PHRASES TO INCLUDE", &phrases.join(", "));
        }
    }

    if let Some(phrases) = &config.forbidden_phrases {
        if !phrases.is_empty() {
            push_section(&mut out, "FORBIDDEN PHRASES", &phrases.join(", "));
        }
    }

    if let Some(style) = &config.style_guide {
        push_section(&mut out, "STYLE GUIDE", style);
    }

    if let Some(elements) = &config.required_elements {
        if !elements.is_empty() {
            let lines: Vec<String> = elements
                .iter()
                .map(|(name, description)| format!("- {}: {}", name, description))
                .collect();
            push_section(&mut out, "REQUIRED ELEMENTS", &lines.join("\n"));
        }
    }

    if let Some(examples) = &config.examples {
        if let Some(good) = &examples.good {
            push_section(&mut out, "GOOD EXAMPLE", good);
        }
        if let Some(bad) = &examples.bad {
            push_section(&mut out, "BAD EXAMPLE", bad);
        }
    }

    out
}

fn push_section(out: &mut String, label: &str, body: &str) {
    out.push('\n');
    out.push_str(label);
    out.push_str(":\n");
    out.push_str(body);
    out.push('\n');
}
