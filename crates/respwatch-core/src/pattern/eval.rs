//! Evaluating a single pattern against response text.

use super::Pattern;
use regex::{Regex, RegexBuilder};

/// Compiled form of one pattern for a fixed case-sensitivity setting.
#[derive(Debug, Clone)]
pub(crate) enum Matcher {
    Regex(Regex),
    /// Regex that failed to compile; kept so every evaluation reports it.
    Invalid { source: String, error: String },
    /// Literal needle, already lowercased when matching case-insensitively.
    Literal(String),
}

impl Matcher {
    pub(crate) fn compile(pattern: &Pattern, case_sensitive: bool) -> Self {
        if pattern.is_regex {
            match build_regex(&pattern.text, case_sensitive) {
                Ok(re) => Matcher::Regex(re),
                Err(e) => Matcher::Invalid {
                    source: pattern.text.clone(),
                    error: e.to_string(),
                },
            }
        } else if case_sensitive {
            Matcher::Literal(pattern.literal_needle().to_string())
        } else {
            Matcher::Literal(pattern.literal_needle().to_lowercase())
        }
    }

    /// `folded` must be the lowercased haystack when the matcher was compiled
    /// case-insensitively, the haystack itself otherwise.
    pub(crate) fn is_match(&self, text: &str, folded: &str) -> bool {
        match self {
            Matcher::Regex(re) => re.is_match(text),
            Matcher::Invalid { source, error } => {
                tracing::warn!(pattern = %source, "invalid regex pattern, treated as no match: {}", error);
                false
            }
            Matcher::Literal(needle) => folded.contains(needle.as_str()),
        }
    }
}

fn build_regex(source: &str, case_sensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(source)
        .multi_line(true)
        .case_insensitive(!case_sensitive)
        .build()
}

/// Evaluate one pattern against `text`.
///
/// Regexes are searched in multi-line mode anywhere in the text. Literals use
/// plain substring containment. Without `case_sensitive` both sides are case
/// folded. An invalid regex logs a warning and evaluates to `false`.
pub fn evaluate(pattern: &Pattern, text: &str, case_sensitive: bool) -> bool {
    let matcher = Matcher::compile(pattern, case_sensitive);
    if case_sensitive || pattern.is_regex {
        matcher.is_match(text, text)
    } else {
        matcher.is_match(text, &text.to_lowercase())
    }
}
