//! Keyword mention extraction.
//!
//! Given the raw text of a page and the ordered set of configured patterns,
//! find every match and cut out enough surrounding context for a reader to
//! judge relevance without opening the page.
//!
//! # Ordering
//!
//! Results are grouped by pattern (configured order) and, within a pattern,
//! ordered by position. Matches of one pattern never overlap each other;
//! matches of different patterns may cover the same text.
//!
//! # Snippet window
//!
//! Each snippet is the matched text plus up to [`CONTEXT_CHARS`] characters
//! on either side. The window shrinks at the start and end of the text.

use crate::models::{Jurisdiction, KeywordPattern, Mention};
use std::ops::Range;
use tracing::{debug, instrument};

/// Characters of context kept on each side of a match.
pub const CONTEXT_CHARS: usize = 50;

/// A single match of one pattern against normalized page text.
#[derive(Debug, Clone)]
pub struct Hit<'p> {
    pub pattern: &'p KeywordPattern,
    /// Byte range of the match within the lower-cased text.
    pub span: Range<usize>,
    pub snippet: String,
}

/// Find every mention of every pattern in `text`.
///
/// The text is lower-cased before matching and all spans and snippets refer
/// to that normalized form. Empty text produces no hits.
pub fn find_mentions<'p>(text: &str, patterns: &'p [KeywordPattern]) -> Vec<Hit<'p>> {
    if text.is_empty() {
        return Vec::new();
    }

    let normalized = text.to_lowercase();
    let mut hits = Vec::new();
    for pattern in patterns {
        for m in pattern.regex().find_iter(&normalized) {
            hits.push(Hit {
                pattern,
                span: m.range(),
                snippet: snippet_around(&normalized, m.range()).to_string(),
            });
        }
    }
    hits
}

/// Scan one jurisdiction's page and attach the source to every hit.
#[instrument(level = "debug", skip_all, fields(jurisdiction = %jurisdiction.name))]
pub fn scan_page(
    jurisdiction: &Jurisdiction,
    text: &str,
    patterns: &[KeywordPattern],
) -> Vec<Mention> {
    let mentions: Vec<Mention> = find_mentions(text, patterns)
        .into_iter()
        .map(|hit| Mention {
            jurisdiction: jurisdiction.name.clone(),
            url: jurisdiction.url.to_string(),
            pattern: hit.pattern.as_str().to_string(),
            snippet: hit.snippet,
        })
        .collect();
    debug!(count = mentions.len(), "Scanned page");
    mentions
}

/// Slice `span` out of `text` widened by up to [`CONTEXT_CHARS`] characters
/// on each side, never splitting a character.
fn snippet_around(text: &str, span: Range<usize>) -> &str {
    let start = text[..span.start]
        .char_indices()
        .rev()
        .take(CONTEXT_CHARS)
        .last()
        .map_or(span.start, |(i, _)| i);
    let end = text[span.end..]
        .char_indices()
        .nth(CONTEXT_CHARS)
        .map_or(text.len(), |(i, _)| span.end + i);
    &text[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(sources: &[&str]) -> Vec<KeywordPattern> {
        sources
            .iter()
            .map(|s| KeywordPattern::new(s).unwrap())
            .collect()
    }

    fn default_patterns() -> Vec<KeywordPattern> {
        patterns(&[
            "nvcc",
            "nova community college",
            "northern virginia community college",
            "northern va community college",
            "nova (college|education|community)",
        ])
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(find_mentions("", &default_patterns()).is_empty());
    }

    #[test]
    fn test_no_patterns_yields_nothing() {
        assert!(find_mentions("nvcc nvcc nvcc", &[]).is_empty());
    }

    #[test]
    fn test_case_insensitive_match() {
        let pats = patterns(&["nvcc"]);
        let hits = find_mentions("Visit NVCC today", &pats);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].span, 6..10);
        assert_eq!(hits[0].snippet, "visit nvcc today");
    }

    #[test]
    fn test_match_offset_is_reported() {
        let pats = patterns(&["nova community college"]);
        let text = format!("{}NOVA Community College{}", "x".repeat(7), "y".repeat(3));
        let hits = find_mentions(&text, &pats);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].span, 7..29);
    }

    #[test]
    fn test_snippet_is_full_width_away_from_boundaries() {
        let pats = patterns(&["nvcc"]);
        let text = format!("{}nvcc{}", "a".repeat(80), "b".repeat(80));
        let hits = find_mentions(&text, &pats);
        assert_eq!(hits.len(), 1);
        let expected = format!("{}nvcc{}", "a".repeat(50), "b".repeat(50));
        assert_eq!(hits[0].snippet, expected);
        assert_eq!(hits[0].snippet.chars().count(), 104);
    }

    #[test]
    fn test_snippet_shrinks_at_boundaries() {
        let pats = patterns(&["nvcc"]);
        let text = format!("ab nvcc{}", "c".repeat(10));
        let hits = find_mentions(&text, &pats);
        assert_eq!(hits[0].snippet, text);

        let text = format!("{}nvcc", "z".repeat(60));
        let hits = find_mentions(&text, &pats);
        assert_eq!(hits[0].snippet, format!("{}nvcc", "z".repeat(50)));
    }

    #[test]
    fn test_snippet_counts_characters_not_bytes() {
        let pats = patterns(&["nvcc"]);
        let text = format!("{}nvcc{}", "é".repeat(60), "ü".repeat(60));
        let hits = find_mentions(&text, &pats);
        assert_eq!(hits.len(), 1);
        assert_eq!(
            hits[0].snippet,
            format!("{}nvcc{}", "é".repeat(50), "ü".repeat(50))
        );
    }

    #[test]
    fn test_snippet_bounded_by_match_plus_window() {
        let pats = default_patterns();
        let text = "NVCC nvcc. Northern Virginia Community College and nova education! \
                    The nova college campus near NVCC."
            .repeat(5);
        for hit in find_mentions(&text, &pats) {
            let match_len = text.to_lowercase()[hit.span.clone()].chars().count();
            assert!(hit.snippet.chars().count() <= match_len + 2 * CONTEXT_CHARS);
        }
    }

    #[test]
    fn test_same_pattern_matches_do_not_overlap() {
        let pats = patterns(&["aa"]);
        let hits = find_mentions("aaaaa", &pats);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].span, 0..2);
        assert_eq!(hits[1].span, 2..4);
        for pair in hits.windows(2) {
            assert!(pair[0].span.end <= pair[1].span.start);
        }
    }

    #[test]
    fn test_different_patterns_may_overlap() {
        let pats = patterns(&["nvcc", "nova community college"]);
        let hits = find_mentions("...nvcc and nova community college...", &pats);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].pattern.as_str(), "nvcc");
        assert_eq!(hits[1].pattern.as_str(), "nova community college");
        assert!(hits[0].snippet.contains("nova community college"));
        assert!(hits[1].snippet.contains("nvcc"));
    }

    #[test]
    fn test_results_ordered_by_pattern_then_position() {
        let pats = patterns(&["college", "nvcc"]);
        let hits = find_mentions("nvcc college nvcc college", &pats);
        let order: Vec<(&str, usize)> = hits
            .iter()
            .map(|h| (h.pattern.as_str(), h.span.start))
            .collect();
        assert_eq!(
            order,
            vec![("college", 5), ("college", 18), ("nvcc", 0), ("nvcc", 13)]
        );
    }

    #[test]
    fn test_board_funding_scenario() {
        let pats = default_patterns();
        let hits = find_mentions("The board discussed NOVA Community College funding", &pats);

        let literal: Vec<_> = hits
            .iter()
            .filter(|h| h.pattern.as_str() == "nova community college")
            .collect();
        assert_eq!(literal.len(), 1);
        assert_eq!(
            literal[0].snippet,
            "the board discussed nova community college funding"
        );

        // The looser alternation also fires on "nova community".
        let loose: Vec<_> = hits
            .iter()
            .filter(|h| h.pattern.as_str() == "nova (college|education|community)")
            .collect();
        assert_eq!(loose.len(), 1);
        assert!(loose[0].snippet.starts_with("the board discussed"));
        assert!(loose[0].snippet.ends_with("funding"));
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_scan_page_attaches_source() {
        let jurisdiction = Jurisdiction {
            name: "City of Alexandria".to_string(),
            url: url::Url::parse("https://www.alexandriava.gov/CityCouncil").unwrap(),
        };
        let mentions = scan_page(&jurisdiction, "Agenda: NVCC lease renewal", &default_patterns());
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].jurisdiction, "City of Alexandria");
        assert_eq!(mentions[0].url, "https://www.alexandriava.gov/CityCouncil");
        assert_eq!(mentions[0].pattern, "nvcc");
        assert_eq!(mentions[0].snippet, "agenda: nvcc lease renewal");
    }
}
