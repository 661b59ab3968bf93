//! URL canonicalisation applied at extraction time.
//!
//! Deduplication compares URLs as exact strings, so every candidate URL is
//! passed through [`canonicalize_url`] first. The transformation only drops
//! parts that never change which page is served; path and parameter order
//! are kept so the URL stays clickable as the engine returned it.

use url::Url;

/// Tracking query parameters that are stripped during canonicalisation.
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "msclkid", "mc_eid", "yclid"];

/// Canonicalise a result URL.
///
/// 1. Lowercase scheme and host (done by the parser).
/// 2. Remove default ports (`:80` for HTTP, `:443` for HTTPS).
/// 3. Strip tracking parameters (`utm_*`, fbclid, gclid, ...), keeping the
///    order of the rest.
/// 4. Remove the fragment.
///
/// If the input cannot be parsed as a valid URL, it is returned unchanged.
///
/// # Examples
///
/// ```
/// use omni_search::orchestrator::url_normalize::canonicalize_url;
///
/// let url = canonicalize_url("https://Example.COM:443/a?b=2&utm_source=x#top");
/// assert_eq!(url, "https://example.com/a?b=2");
/// ```
pub fn canonicalize_url(raw: &str) -> String {
    let Ok(mut parsed) = Url::parse(raw) else {
        return raw.to_string();
    };

    parsed.set_fragment(None);

    if is_default_port(&parsed) {
        let _ = parsed.set_port(None);
    }

    match parsed.query().map(strip_tracking) {
        Some(query) if !query.is_empty() => parsed.set_query(Some(&query)),
        Some(_) => parsed.set_query(None),
        None => {}
    }

    parsed.to_string()
}

/// Drop tracking and empty `&`-separated segments from a raw query string.
///
/// Segments are compared by name only and copied through untouched, so the
/// kept parameters keep their original encoding.
fn strip_tracking(query: &str) -> String {
    query
        .split('&')
        .filter(|segment| {
            let name = segment.split('=').next().unwrap_or_default();
            !segment.is_empty() && !is_tracking_param(name)
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn is_tracking_param(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key.as_str())
}

/// Returns `true` if the URL uses the default port for its scheme.
fn is_default_port(url: &Url) -> bool {
    matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_scheme_and_host() {
        assert_eq!(
            canonicalize_url("HTTPS://Example.COM/Path"),
            "https://example.com/Path"
        );
    }

    #[test]
    fn keeps_trailing_slash_and_root() {
        assert_eq!(
            canonicalize_url("https://example.com/path/"),
            "https://example.com/path/"
        );
        assert_eq!(canonicalize_url("https://example.com"), "https://example.com/");
    }

    #[test]
    fn removes_default_ports() {
        assert_eq!(
            canonicalize_url("http://example.com:80/path"),
            "http://example.com/path"
        );
        assert_eq!(
            canonicalize_url("https://example.com:443/path"),
            "https://example.com/path"
        );
    }

    #[test]
    fn preserves_non_default_port() {
        assert_eq!(
            canonicalize_url("https://example.com:8080/path"),
            "https://example.com:8080/path"
        );
    }

    #[test]
    fn keeps_query_order_without_tracking() {
        assert_eq!(
            canonicalize_url("https://example.com/search?z=1&a=2"),
            "https://example.com/search?z=1&a=2"
        );
    }

    #[test]
    fn removes_tracking_params() {
        assert_eq!(
            canonicalize_url(
                "https://example.com/page?q=rust&utm_source=google&fbclid=abc&gclid=xyz"
            ),
            "https://example.com/page?q=rust"
        );
        assert_eq!(
            canonicalize_url("https://example.com/page?utm_medium=a&UTM_CAMPAIGN=b"),
            "https://example.com/page"
        );
    }

    #[test]
    fn kept_params_keep_their_encoding() {
        assert_eq!(
            canonicalize_url("https://example.com/s?a=hello%20world&flag&utm_source=x&b=1+2"),
            "https://example.com/s?a=hello%20world&flag&b=1+2"
        );
    }

    #[test]
    fn removes_fragment() {
        assert_eq!(
            canonicalize_url("https://example.com/page#section"),
            "https://example.com/page"
        );
    }

    #[test]
    fn invalid_url_returned_unchanged() {
        assert_eq!(canonicalize_url("not a url at all"), "not a url at all");
        assert_eq!(canonicalize_url(""), "");
    }

    #[test]
    fn canonicalisation_is_idempotent() {
        let once = canonicalize_url("https://Example.com:443/a/?x=1&utm_term=t#f");
        assert_eq!(canonicalize_url(&once), once);
    }
}
