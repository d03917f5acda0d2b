//! Heuristic sentence splitting
//!
//! A sentence ends at `.`, `!` or `?` when the next character is whitespace
//! or an uppercase letter. Periods closing a known abbreviation (`Dr.`,
//! `e.g.`) are masked out before the scan. Decimal numbers, ellipses and
//! quoted dialogue get no special treatment.

use std::collections::HashSet;
use std::ops::Range;

use regex::Regex;

use crate::config::DEFAULT_ABBREVIATIONS;
use crate::error::Result;

/// A sentence located inside a larger text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceSpan<'a> {
    /// Byte range of the trimmed sentence in the source text
    pub range: Range<usize>,
    /// The trimmed sentence text
    pub text: &'a str,
}

/// Splits text into sentences, protecting a fixed list of abbreviations
#[derive(Debug, Clone)]
pub struct SentenceSplitter {
    abbreviations: Option<Regex>,
}

impl SentenceSplitter {
    /// Create a splitter protecting the given abbreviations
    pub fn new<S: AsRef<str>>(abbreviations: &[S]) -> Result<Self> {
        let alternatives: Vec<String> = abbreviations
            .iter()
            .map(|abbr| regex::escape(abbr.as_ref().trim()))
            .filter(|abbr| !abbr.is_empty())
            .collect();

        let abbreviations = if alternatives.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(r"\b(?:{})\.", alternatives.join("|")))?)
        };

        Ok(Self { abbreviations })
    }

    /// Split `text` into trimmed, non-empty sentences in order
    pub fn split<'a>(&self, text: &'a str) -> Vec<SentenceSpan<'a>> {
        let masked: HashSet<usize> = self
            .abbreviations
            .as_ref()
            .map(|re| re.find_iter(text).map(|m| m.end() - 1).collect())
            .unwrap_or_default();

        let mut sentences = Vec::new();
        let mut start = 0;
        let mut chars = text.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            if !matches!(c, '.' | '!' | '?') || masked.contains(&pos) {
                continue;
            }
            let ends_sentence = chars
                .peek()
                .is_some_and(|&(_, next)| next.is_whitespace() || next.is_uppercase());
            if ends_sentence {
                let end = pos + c.len_utf8();
                push_trimmed(text, start..end, &mut sentences);
                start = end;
            }
        }
        push_trimmed(text, start..text.len(), &mut sentences);

        sentences
    }

    /// Count the sentences in `text`
    pub fn count(&self, text: &str) -> usize {
        self.split(text).len()
    }
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        // The default list is escaped and always compiles.
        Self::new(DEFAULT_ABBREVIATIONS).unwrap_or(Self {
            abbreviations: None,
        })
    }
}

fn push_trimmed<'a>(text: &'a str, range: Range<usize>, out: &mut Vec<SentenceSpan<'a>>) {
    let fragment = &text[range.clone()];
    let trimmed = fragment.trim();
    if trimmed.is_empty() {
        return;
    }
    let start = range.start + (fragment.len() - fragment.trim_start().len());
    out.push(SentenceSpan {
        range: start..start + trimmed.len(),
        text: trimmed,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(text: &str) -> Vec<String> {
        SentenceSplitter::default()
            .split(text)
            .into_iter()
            .map(|s| s.text.to_string())
            .collect()
    }

    #[test]
    fn test_split_on_whitespace_after_punctuation() {
        assert_eq!(
            texts("First one. Second one! Third one? Done"),
            vec!["First one.", "Second one!", "Third one?", "Done"]
        );
    }

    #[test]
    fn test_split_on_uppercase_without_space() {
        assert_eq!(texts("Stop.Go now."), vec!["Stop.", "Go now."]);
    }

    #[test]
    fn test_no_split_before_lowercase() {
        assert_eq!(texts("version 1.5.x is out"), vec!["version 1.5.x is out"]);
    }

    #[test]
    fn test_abbreviations_protected() {
        assert_eq!(
            texts("Dr. Smith met Mrs. Jones. They talked, e.g. about tea."),
            vec!["Dr. Smith met Mrs. Jones.", "They talked, e.g. about tea."]
        );
    }

    #[test]
    fn test_abbreviation_needs_word_boundary() {
        // "HMr." is not the abbreviation "Mr."
        assert_eq!(texts("Ask HMr. He knows."), vec!["Ask HMr.", "He knows."]);
    }

    #[test]
    fn test_empty_fragments_dropped() {
        assert_eq!(texts("  One.   Two.  "), vec!["One.", "Two."]);
        assert!(texts("   ").is_empty());
    }

    #[test]
    fn test_ranges_point_into_source() {
        let text = "  Alpha beta. Gamma!";
        let spans = SentenceSplitter::default().split(text);
        assert_eq!(spans.len(), 2);
        for span in spans {
            assert_eq!(&text[span.range.clone()], span.text);
        }
    }

    #[test]
    fn test_repeated_punctuation_splits_once() {
        assert_eq!(texts("Really?! Yes... Fine"), vec!["Really?!", "Yes...", "Fine"]);
    }

    #[test]
    fn test_custom_abbreviations() {
        let splitter = SentenceSplitter::new(&["approx"]).unwrap();
        assert_eq!(splitter.count("It is approx. Ten units."), 1);
        // Dr is no longer protected
        assert_eq!(splitter.count("Dr. Who"), 2);
    }

    #[test]
    fn test_no_abbreviations() {
        let empty: [&str; 0] = [];
        let splitter = SentenceSplitter::new(&empty).unwrap();
        assert_eq!(splitter.count("Mr. Bean. Yes"), 3);
    }
}
