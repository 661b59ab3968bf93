//! Google: best results but aggressive bot detection.
//!
//! Google serves CAPTCHAs, consent walls and several markup generations
//! depending on the User-Agent, so this adapter carries the most fallback
//! layouts. Result links are often wrapped as `/url?q=<target>&sa=...`.

use std::borrow::Cow;

use crate::engine::{EngineAdapter, Layout, RedirectUnwrap, SelectorRule};
use crate::types::EngineId;

const SNIPPETS: &str = ".VwiC3b, .IsZvec, .s, .st, span.aCOpRe, .yXK7lf";

pub static ADAPTER: EngineAdapter = EngineAdapter {
    engine: EngineId::Google,
    url_template: Cow::Borrowed("https://www.google.com/search?q={query}&num=10&start={offset}"),
    first_offset: 0,
    page_step: 10,
    default_pages: 10,
    rules: SelectorRule {
        primary: Layout {
            container: "div.g",
            title: "h3",
            link: "a[href]",
            snippet: Some(SNIPPETS),
        },
        fallbacks: &[
            Layout {
                container: "div[data-sokoban-container]",
                title: "h3",
                link: "a[href]",
                snippet: Some(SNIPPETS),
            },
            // Basic-HTML variant served to unrecognised browsers.
            Layout {
                container: "div.Gx5Zad",
                title: "h3, div.vvjwJb",
                link: "a[href]",
                snippet: Some("div.BNeawe.s3v9rd, .BNeawe"),
            },
        ],
    },
    unwrap: RedirectUnwrap::QueryParam {
        marker: "/url?",
        name: "q",
    },
    excluded_links: &["google.com/search", "accounts.google.com"],
};

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_GOOGLE_HTML: &str = r#"<html><body><div id="search">
<div class="g">
  <a href="/url?q=https://www.rust-lang.org/&amp;sa=U&amp;ved=2ahUKE"><h3>Rust Programming Language</h3></a>
  <div class="VwiC3b">A language empowering everyone.</div>
</div>
<div class="g">
  <a href="https://doc.rust-lang.org/book/"><h3>The Rust Book</h3></a>
  <span class="aCOpRe">An introductory book.</span>
</div>
<div class="g">
  <a href="/search?q=rust+people+also+ask"><h3>People also ask</h3></a>
</div>
<div class="g">
  <a href="https://www.google.com/search?q=rust&amp;tbm=isch"><h3>Images for rust</h3></a>
</div>
</div></body></html>"#;

    #[test]
    fn parse_mock_html_unwraps_and_filters() {
        let results = ADAPTER.extract(MOCK_GOOGLE_HTML).expect("should parse");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Rust Programming Language");
        assert_eq!(results[0].url, "https://www.rust-lang.org/");
        assert_eq!(results[0].snippet, "A language empowering everyone.");
        assert_eq!(results[1].url, "https://doc.rust-lang.org/book/");
        assert_eq!(results[1].snippet, "An introductory book.");
        assert!(results.iter().all(|r| r.source_engine == EngineId::Google));
    }

    #[test]
    fn basic_html_variant_uses_fallback() {
        let html = r#"<div class="Gx5Zad">
            <a href="/url?q=https://example.com/basic%3Fa%3D1&amp;sa=U"><div class="vvjwJb">Basic result</div></a>
            <div class="BNeawe s3v9rd">Plain snippet.</div>
        </div>"#;
        let results = ADAPTER.extract(html).expect("should parse");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://example.com/basic?a=1");
        assert_eq!(results[0].title, "Basic result");
        assert_eq!(results[0].snippet, "Plain snippet.");
    }

    #[test]
    fn consent_page_yields_nothing() {
        let html = r#"<html><body><form action="https://consent.google.com/save"><button>Accept all</button></form></body></html>"#;
        assert!(ADAPTER.extract(html).expect("should parse").is_empty());
    }

    #[test]
    fn ten_pages_of_ten() {
        assert_eq!(ADAPTER.default_pages, 10);
        assert!(ADAPTER.page_url("rust", 9).ends_with("start=90"));
    }
}
