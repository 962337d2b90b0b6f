//! Grep file parsing.

use super::{Pattern, Severity};
use thiserror::Error;

const COMMENT_MARKER: &str = "::";

/// Grep file could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternParseError {
    /// A pattern line appeared before any `[section]` header.
    #[error("line {line}: pattern {pattern:?} appears before any [section] header")]
    PatternBeforeSection { line: usize, pattern: String },
}

/// Section state carried from a `[...]` header to the lines below it.
struct Section {
    is_regex: bool,
    severity: Severity,
}

impl Section {
    fn from_header(header: &str) -> Self {
        let lower = header.to_lowercase();
        Self {
            is_regex: lower.contains("regex"),
            severity: Severity::from_section(&lower),
        }
    }
}

/// Double every backslash so a literal keeps its meaning if it is ever fed
/// to a regex engine.
pub(crate) fn escape_literal(line: &str) -> String {
    line.replace('\\', "\\\\")
}

pub(crate) fn parse_patterns(source: &str) -> Result<Vec<Pattern>, PatternParseError> {
    let mut patterns = Vec::new();
    let mut section: Option<Section> = None;

    for (idx, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }
        if line.starts_with('[') {
            section = Some(Section::from_header(line));
            continue;
        }
        let Some(current) = section.as_ref() else {
            return Err(PatternParseError::PatternBeforeSection {
                line: idx + 1,
                pattern: line.to_string(),
            });
        };
        let text = if current.is_regex {
            line.to_string()
        } else {
            escape_literal(line)
        };
        patterns.push(Pattern {
            text,
            source: line.to_string(),
            is_regex: current.is_regex,
            severity: current.severity,
            ordinal: patterns.len() + 1,
        });
    }

    Ok(patterns)
}
