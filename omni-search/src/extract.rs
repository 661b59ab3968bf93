//! Markup → candidate records, driven by an [`EngineAdapter`].
//!
//! Extraction is best-effort by construction. A result block missing its
//! title or link, or whose link cannot be unwrapped, is skipped on its own;
//! the rest of the page is still read. Only a malformed selector (a bug in
//! an adapter) fails the whole call.

use scraper::{ElementRef, Html, Selector};

use crate::engine::{EngineAdapter, Layout};
use crate::error::{Recovery, SearchError};
use crate::orchestrator::url_normalize::canonicalize_url;
use crate::types::SearchResult;

/// Upper bound on records returned from a single page.
pub const MAX_CANDIDATES_PER_PAGE: usize = 20;

struct CompiledLayout {
    container: Selector,
    title: Selector,
    link: Selector,
    snippet: Option<Selector>,
}

impl CompiledLayout {
    fn compile(layout: &Layout) -> Result<Self, SearchError> {
        Ok(Self {
            container: parse_selector(layout.container)?,
            title: parse_selector(layout.title)?,
            link: parse_selector(layout.link)?,
            snippet: layout.snippet.map(parse_selector).transpose()?,
        })
    }
}

fn parse_selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css)
        .map_err(|e| SearchError::Extraction(format!("invalid selector {css:?}: {e:?}")))
}

/// Extract up to [`MAX_CANDIDATES_PER_PAGE`] candidates from `markup`.
///
/// Layouts are tried in order; the first one producing at least one record
/// wins. Returned records are unscored and not instant answers.
///
/// # Errors
///
/// Returns [`SearchError::Extraction`] if an adapter selector is invalid,
/// or any candidate error whose recovery is not [`Recovery::SkipCandidate`].
pub fn extract(adapter: &EngineAdapter, markup: &str) -> Result<Vec<SearchResult>, SearchError> {
    let document = Html::parse_document(markup);

    for (index, layout) in adapter.rules.layouts().enumerate() {
        let compiled = CompiledLayout::compile(layout)?;
        let results = extract_with_layout(&document, &compiled, adapter)?;
        if !results.is_empty() {
            tracing::debug!(
                engine = %adapter.engine,
                layout = index,
                count = results.len(),
                "results parsed"
            );
            return Ok(results);
        }
    }

    tracing::debug!(engine = %adapter.engine, "no layout matched");
    Ok(Vec::new())
}

fn extract_with_layout(
    document: &Html,
    layout: &CompiledLayout,
    adapter: &EngineAdapter,
) -> Result<Vec<SearchResult>, SearchError> {
    let mut results = Vec::new();

    for element in document.select(&layout.container) {
        match read_candidate(element, layout, adapter) {
            Ok(result) => results.push(result),
            Err(err) if err.recovery() == Recovery::SkipCandidate => {
                tracing::trace!(engine = %adapter.engine, error = %err, "candidate skipped");
                continue;
            }
            Err(err) => return Err(err),
        }

        if results.len() >= MAX_CANDIDATES_PER_PAGE {
            break;
        }
    }

    Ok(results)
}

fn read_candidate(
    element: ElementRef<'_>,
    layout: &CompiledLayout,
    adapter: &EngineAdapter,
) -> Result<SearchResult, SearchError> {
    let title = element
        .select(&layout.title)
        .next()
        .map(|el| collapse_whitespace(el.text()))
        .ok_or_else(|| SearchError::Extraction("missing title".into()))?;

    let href = element
        .select(&layout.link)
        .find_map(|el| el.value().attr("href"))
        .ok_or_else(|| SearchError::Extraction("missing href".into()))?;

    let target = absolutize(&adapter.unwrap.unwrap(href.trim())?);
    if let Some(pattern) = adapter
        .excluded_links
        .iter()
        .find(|pattern| target.contains(*pattern))
    {
        return Err(SearchError::Extraction(format!(
            "navigation link ({pattern})"
        )));
    }

    let snippet = layout
        .snippet
        .as_ref()
        .and_then(|sel| element.select(sel).next())
        .map(|el| collapse_whitespace(el.text()))
        .unwrap_or_default();

    SearchResult::candidate(title, canonicalize_url(&target), snippet, adapter.engine)
}

/// Resolve protocol-relative links against https.
fn absolutize(href: &str) -> String {
    if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    }
}

fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let joined: String = parts.collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{RedirectUnwrap, SelectorRule};
    use crate::types::EngineId;
    use std::borrow::Cow;

    static FALLBACK_ONLY: [Layout; 1] = [Layout {
        container: "li.hit",
        title: "span.t",
        link: "a",
        snippet: None,
    }];

    fn adapter() -> EngineAdapter {
        EngineAdapter {
            engine: EngineId::Brave,
            url_template: Cow::Borrowed("http://localhost/?q={query}&o={offset}"),
            first_offset: 0,
            page_step: 1,
            default_pages: 1,
            rules: SelectorRule {
                primary: Layout {
                    container: "div.r",
                    title: "h3",
                    link: "a",
                    snippet: Some("p"),
                },
                fallbacks: &FALLBACK_ONLY,
            },
            unwrap: RedirectUnwrap::QueryParam {
                marker: "/go?",
                name: "to",
            },
            excluded_links: &["localhost/search"],
        }
    }

    fn block(title: &str, href: &str, snippet: &str) -> String {
        format!(r#"<div class="r"><h3>{title}</h3><a href="{href}">x</a><p>{snippet}</p></div>"#)
    }

    #[test]
    fn primary_layout_extracts_records_in_order() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            block("First", "https://a.com/1", "one"),
            block("Second", "https://b.com/2", "two"),
        );
        let results = extract(&adapter(), &html).expect("parse");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "First");
        assert_eq!(results[0].url, "https://a.com/1");
        assert_eq!(results[0].snippet, "one");
        assert_eq!(results[0].display_url, "a.com");
        assert_eq!(results[1].title, "Second");
        assert!(results.iter().all(|r| r.relevance_score == 0));
        assert!(results.iter().all(|r| !r.is_instant_answer));
        assert!(results.iter().all(|r| r.source_engine == EngineId::Brave));
    }

    #[test]
    fn falls_back_when_primary_matches_nothing() {
        let html = r#"<ul><li class="hit"><span class="t">Only</span><a href="https://c.com/">go</a></li></ul>"#;
        let results = extract(&adapter(), html).expect("parse");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Only");
        assert_eq!(results[0].snippet, "");
    }

    #[test]
    fn bad_candidates_are_skipped_individually() {
        let html = format!(
            "{}{}{}{}{}",
            r#"<div class="r"><a href="https://no-title.com">x</a></div>"#,
            r#"<div class="r"><h3>No link</h3></div>"#,
            block("Relative", "/internal/page", ""),
            block("Wrapped broken", "/go?from=here", ""),
            block("Good", "https://good.com/", "fine"),
        );
        let results = extract(&adapter(), &html).expect("parse");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://good.com/");
    }

    #[test]
    fn redirect_links_are_unwrapped() {
        let html = block("Wrapped", "/go?to=https%3A%2F%2Fdest.org%2Fpath&amp;from=x", "");
        let results = extract(&adapter(), &html).expect("parse");
        assert_eq!(results[0].url, "https://dest.org/path");
    }

    #[test]
    fn excluded_links_are_dropped() {
        let html = format!(
            "{}{}",
            block("Nav", "http://localhost/search?q=more", ""),
            block("Real", "https://real.com/", ""),
        );
        let results = extract(&adapter(), &html).expect("parse");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Real");
    }

    #[test]
    fn protocol_relative_links_become_https() {
        let html = block("Proto", "//cdn.example.com/x", "");
        let results = extract(&adapter(), &html).expect("parse");
        assert_eq!(results[0].url, "https://cdn.example.com/x");
    }

    #[test]
    fn whitespace_in_text_is_collapsed() {
        let html = block("  Spread\n   over   lines ", "https://w.com/", "a\n\n b");
        let results = extract(&adapter(), &html).expect("parse");
        assert_eq!(results[0].title, "Spread over lines");
        assert_eq!(results[0].snippet, "a b");
    }

    #[test]
    fn output_is_capped_per_page() {
        let html: String = (0..50)
            .map(|i| block(&format!("R{i}"), &format!("https://r{i}.com/"), ""))
            .collect();
        let results = extract(&adapter(), &html).expect("parse");
        assert_eq!(results.len(), MAX_CANDIDATES_PER_PAGE);
        assert_eq!(results[19].title, "R19");
    }

    #[test]
    fn empty_markup_yields_nothing() {
        assert!(extract(&adapter(), "").expect("parse").is_empty());
        assert!(extract(&adapter(), "<html><body></body></html>")
            .expect("parse")
            .is_empty());
    }

    #[test]
    fn invalid_selector_fails_the_page() {
        let mut broken = adapter();
        broken.rules.primary.container = "div[";
        let err = extract(&broken, "<div></div>").expect_err("bad selector");
        assert!(matches!(err, SearchError::Extraction(_)));
    }
}
