//! Result deduplication by URL.
//!
//! URLs are canonicalised at extraction time (see
//! [`super::url_normalize`]), so exact string equality is the dedup key
//! here. The first occurrence of each URL wins and input order is kept,
//! which the ranker relies on as its tiebreak.

use std::collections::HashSet;

use crate::types::SearchResult;

/// Drop every record whose `url` was already seen earlier in `results`.
pub fn dedup(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen: HashSet<String> = HashSet::with_capacity(results.len());
    let before = results.len();

    let unique: Vec<SearchResult> = results
        .into_iter()
        .filter(|result| seen.insert(result.url.clone()))
        .collect();

    if unique.len() < before {
        tracing::debug!(
            dropped = before - unique.len(),
            kept = unique.len(),
            "duplicate urls removed"
        );
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EngineId;
    use proptest::prelude::*;

    fn make_result(url: &str, title: &str, engine: EngineId) -> SearchResult {
        SearchResult::candidate(title, url, format!("Snippet for {title}"), engine).expect("valid")
    }

    #[test]
    fn unique_urls_pass_through() {
        let results = vec![
            make_result("https://a.com/", "A", EngineId::Google),
            make_result("https://b.com/", "B", EngineId::Brave),
        ];
        assert_eq!(dedup(results).len(), 2);
    }

    #[test]
    fn first_occurrence_survives_across_engines() {
        let results = vec![
            make_result("https://a.com/x", "From DuckDuckGo", EngineId::DuckDuckGo),
            make_result("https://a.com/x", "From Google", EngineId::Google),
        ];
        let deduped = dedup(results);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].title, "From DuckDuckGo");
        assert_eq!(deduped[0].source_engine, EngineId::DuckDuckGo);
    }

    #[test]
    fn order_is_preserved() {
        let results = vec![
            make_result("https://c.com/", "C", EngineId::Google),
            make_result("https://a.com/", "A", EngineId::Google),
            make_result("https://c.com/", "C again", EngineId::Google),
            make_result("https://b.com/", "B", EngineId::Google),
        ];
        let urls: Vec<_> = dedup(results).into_iter().map(|r| r.url).collect();
        assert_eq!(urls, ["https://c.com/", "https://a.com/", "https://b.com/"]);
    }

    #[test]
    fn comparison_is_exact() {
        // Already canonical upstream; differing strings are different keys.
        let results = vec![
            make_result("https://a.com/path", "A", EngineId::Google),
            make_result("https://a.com/path/", "A slash", EngineId::Google),
        ];
        assert_eq!(dedup(results).len(), 2);
    }

    #[test]
    fn empty_input_returns_empty() {
        assert!(dedup(vec![]).is_empty());
    }

    proptest! {
        #[test]
        fn each_url_appears_once_in_first_seen_order(ids in proptest::collection::vec(0u8..10, 0..40)) {
            let results: Vec<_> = ids
                .iter()
                .enumerate()
                .map(|(pos, id)| {
                    make_result(&format!("https://e.com/{id}"), &format!("pos {pos}"), EngineId::Brave)
                })
                .collect();
            let deduped = dedup(results.clone());

            let mut seen = HashSet::new();
            for record in &deduped {
                prop_assert!(seen.insert(record.url.clone()));
            }
            for record in &deduped {
                let first = results.iter().find(|r| r.url == record.url).expect("present");
                prop_assert_eq!(&first.title, &record.title);
            }
            prop_assert_eq!(seen.len(), ids.iter().collect::<HashSet<_>>().len());
        }
    }
}
