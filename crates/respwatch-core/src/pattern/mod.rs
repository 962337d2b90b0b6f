//! Grep patterns: the match rules a response is classified against.
//!
//! Patterns are read once from a plain-text grep file made of `[section]`
//! headers, `::` comments and one pattern per line. The section header decides
//! whether the lines below it are regexes and which severity they carry.

pub(crate) mod eval;
mod parse;

use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;

pub use eval::evaluate;
pub use parse::PatternParseError;

/// Severity of a pattern match (green / yellow / red in the grep file).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Derive the severity from a lowercased section header.
    pub fn from_section(section: &str) -> Self {
        if section.contains("green") {
            Severity::Info
        } else if section.contains("yellow") {
            Severity::Warning
        } else {
            Severity::Critical
        }
    }

    /// Color name used in the grep file and the legend.
    pub fn color_name(self) -> &'static str {
        match self {
            Severity::Info => "green",
            Severity::Warning => "yellow",
            Severity::Critical => "red",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.color_name())
    }
}

/// One match rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// Regex source (verbatim) or literal with every backslash doubled.
    pub text: String,
    /// The line exactly as read from the grep file (trimmed).
    pub source: String,
    pub is_regex: bool,
    pub severity: Severity,
    /// 1-based position in the grep file, counting pattern lines only.
    pub ordinal: usize,
}

impl Pattern {
    /// Needle used for literal containment: `text` with the doubled
    /// backslashes collapsed again, i.e. the line as the user wrote it.
    pub fn literal_needle(&self) -> &str {
        &self.source
    }

    /// Legend tag such as `[regex-grep-green]` or `[normal-grep-red]`.
    pub fn kind_tag(&self) -> String {
        let mode = if self.is_regex { "regex" } else { "normal" };
        format!("[{}-grep-{}]", mode, self.severity)
    }
}

/// Immutable, ordinal-ordered list of patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Parse a grep file's contents.
    pub fn load(source: &str) -> Result<Self, PatternParseError> {
        let patterns = parse::parse_patterns(source)?;
        tracing::debug!(count = patterns.len(), "loaded grep patterns");
        Ok(Self { patterns })
    }

    /// Read and parse a grep file from disk.
    pub fn load_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("read grep file {}", path.display()))?;
        Self::load(&data).with_context(|| format!("parse grep file {}", path.display()))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn as_slice(&self) -> &[Pattern] {
        &self.patterns
    }
}

impl<'a> IntoIterator for &'a PatternSet {
    type Item = &'a Pattern;
    type IntoIter = std::slice::Iter<'a, Pattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}
