//! Keyword relevance scoring and ranking.
//!
//! Each record is scored against the query keywords by case-insensitive
//! substring containment:
//!
//! | condition                                   | points       |
//! |---------------------------------------------|--------------|
//! | keyword appears in title                    | +10          |
//! | title equals keyword exactly                | +20 (extra)  |
//! | keyword appears in snippet                  | +5           |
//! | keyword appears in url                      | +3           |
//! | every keyword appears in title + snippet    | +15 (once)   |
//!
//! With no keywords every score is 0 and ranking preserves input order.

use crate::types::SearchResult;

const TITLE_POINTS: u32 = 10;
const EXACT_TITLE_POINTS: u32 = 20;
const SNIPPET_POINTS: u32 = 5;
const URL_POINTS: u32 = 3;
const ALL_KEYWORDS_POINTS: u32 = 15;

/// Minimum characters a query token needs to count as a keyword.
const MIN_KEYWORD_CHARS: usize = 3;

/// Lower-cased query tokens of more than two characters, in query order.
///
/// Duplicates are kept; each occurrence scores on its own.
pub fn extract_keywords(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|token| token.chars().count() >= MIN_KEYWORD_CHARS)
        .map(str::to_lowercase)
        .collect()
}

/// Relevance of `result` for lower-cased `keywords`.
pub fn score(result: &SearchResult, keywords: &[String]) -> u32 {
    if keywords.is_empty() {
        return 0;
    }

    let title = result.title.to_lowercase();
    let snippet = result.snippet.to_lowercase();
    let url = result.url.to_lowercase();

    let mut points = 0;
    for keyword in keywords {
        if title.contains(keyword.as_str()) {
            points += TITLE_POINTS;
        }
        if title == *keyword {
            points += EXACT_TITLE_POINTS;
        }
        if snippet.contains(keyword.as_str()) {
            points += SNIPPET_POINTS;
        }
        if url.contains(keyword.as_str()) {
            points += URL_POINTS;
        }
    }

    let combined = format!("{title} {snippet}");
    if keywords.iter().all(|k| combined.contains(k.as_str())) {
        points += ALL_KEYWORDS_POINTS;
    }

    points
}

/// Score every record and sort by descending relevance.
///
/// The sort is stable: records with equal scores keep their input order.
pub fn rank(mut records: Vec<SearchResult>, keywords: &[String]) -> Vec<SearchResult> {
    for record in &mut records {
        record.relevance_score = score(record, keywords);
    }
    records.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    records
}
