//! Response classification: one match flag per pattern.

use crate::pattern::eval::Matcher;
use crate::pattern::{self, Pattern, PatternSet};

/// Patterns compiled once for a fixed case-sensitivity setting.
///
/// Matchers share no mutable state, so each pattern's result is independent
/// of evaluation order.
#[derive(Debug, Clone)]
pub struct Classifier {
    matchers: Vec<Matcher>,
    case_sensitive: bool,
}

impl Classifier {
    pub fn new(patterns: &PatternSet, case_sensitive: bool) -> Self {
        let matchers: Vec<Matcher> = patterns
            .iter()
            .map(|p| Matcher::compile(p, case_sensitive))
            .collect();
        let invalid = matchers
            .iter()
            .filter(|m| matches!(m, Matcher::Invalid { .. }))
            .count();
        if invalid > 0 {
            tracing::warn!(invalid, "grep file contains regex patterns that do not compile");
        }
        Self {
            matchers,
            case_sensitive,
        }
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Evaluate every pattern, in ordinal order, against the same text.
    pub fn classify(&self, text: &str) -> Vec<bool> {
        let folded;
        let haystack = if self.case_sensitive {
            text
        } else {
            folded = text.to_lowercase();
            &folded
        };
        self.matchers
            .iter()
            .map(|m| m.is_match(text, haystack))
            .collect()
    }
}

/// One-shot classification without a prebuilt [`Classifier`].
pub fn classify(text: &str, patterns: &[Pattern], case_sensitive: bool) -> Vec<bool> {
    patterns
        .iter()
        .map(|p| pattern::evaluate(p, text, case_sensitive))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{sample_response, serialize};

    const GREP: &str = "[red]\nerror\n[green-regex]\nstatus:\\s*200\n";

    #[test]
    fn red_literal_and_green_regex_scenario() {
        let set = PatternSet::load(GREP).unwrap();
        let text = serialize(&sample_response("status: 200 OK"), true);
        let c = Classifier::new(&set, false);
        assert_eq!(c.classify(&text), vec![false, true]);
        assert_eq!(classify(&text, set.as_slice(), false), vec![false, true]);
    }

    #[test]
    fn one_flag_per_pattern_even_when_nothing_matches() {
        let set = PatternSet::load(GREP).unwrap();
        let c = Classifier::new(&set, true);
        assert_eq!(c.len(), 2);
        assert_eq!(c.classify(""), vec![false, false]);
    }

    #[test]
    fn classifier_agrees_with_evaluate() {
        let grep = "[red]\nERROR\n[yellow]\nC:\\Temp\n[green-regex]\n^X-Request-Id: \\d+$\n[red-regex]\n([bad\n";
        let set = PatternSet::load(grep).unwrap();
        let text = serialize(&sample_response("an error in c:\\temp"), false);
        for case_sensitive in [false, true] {
            let c = Classifier::new(&set, case_sensitive);
            assert_eq!(
                c.classify(&text),
                classify(&text, set.as_slice(), case_sensitive)
            );
        }
        let c = Classifier::new(&set, false);
        assert_eq!(c.classify(&text), vec![true, true, true, false]);
    }

    #[test]
    fn header_patterns_need_full_serialization() {
        let set = PatternSet::load("[yellow]\ncontent-type: text/plain\n").unwrap();
        let c = Classifier::new(&set, false);
        let r = sample_response("body");
        assert_eq!(c.classify(&serialize(&r, false)), vec![true]);
        assert_eq!(c.classify(&serialize(&r, true)), vec![false]);
    }
}
