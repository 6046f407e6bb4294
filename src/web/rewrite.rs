//! HTML rewriting so a proxied page renders from its own origin.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

pub const PROXIED_MARKER: &str = "<script>window.__PROXIED__=true;</script>";

static CSP_META: OnceLock<Option<Regex>> = OnceLock::new();
static HEAD_OPEN: OnceLock<Option<Regex>> = OnceLock::new();
static HEAD_CLOSE: OnceLock<Option<Regex>> = OnceLock::new();

fn csp_meta() -> Option<&'static Regex> {
    CSP_META
        .get_or_init(|| Regex::new(r"(?i)<meta[^>]+content-security-policy[^>]*>").ok())
        .as_ref()
}

fn head_open() -> Option<&'static Regex> {
    HEAD_OPEN
        .get_or_init(|| Regex::new(r"(?i)<head(\s[^>]*)?>").ok())
        .as_ref()
}

fn head_close() -> Option<&'static Regex> {
    HEAD_CLOSE
        .get_or_init(|| Regex::new(r"(?i)</head>").ok())
        .as_ref()
}

/// Directory URL of `page`: origin plus the path up to its last `/`.
pub fn base_href(page: &Url) -> String {
    let path = page.path();
    let dir = match path.rfind('/') {
        Some(idx) => &path[..=idx],
        None => "/",
    };
    format!("{}{}", page.origin().ascii_serialization(), dir)
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Strip CSP meta tags, pin relative URLs to `page` and mark the document
/// as proxied.
pub fn rewrite_document(html: &str, page: &Url) -> String {
    let mut out = match csp_meta() {
        Some(re) => re.replace_all(html, "").into_owned(),
        None => html.to_string(),
    };

    let base = format!(r#"<base href="{}">"#, escape_attr(&base_href(page)));
    let head_end = head_open().and_then(|re| re.find(&out)).map(|m| m.end());
    match head_end {
        Some(end) => out.insert_str(end, &base),
        None => out.insert_str(0, &base),
    }

    if let Some(re) = head_close() {
        let marker = format!("{PROXIED_MARKER}</head>");
        out = re.replacen(&out, 1, marker.as_str()).into_owned();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn test_base_href_keeps_directory() {
        assert_eq!(base_href(&page("https://example.com/docs/intro.html?x=1")), "https://example.com/docs/");
        assert_eq!(base_href(&page("https://example.com")), "https://example.com/");
        assert_eq!(base_href(&page("http://example.com:8080/a/b/")), "http://example.com:8080/a/b/");
    }

    #[test]
    fn test_rewrite_full_document() {
        let html = r#"<!doctype html><html><HEAD lang="en"><meta http-equiv="Content-Security-Policy" content="default-src 'self'"><title>T</title></head><body>x</body></html>"#;
        let out = rewrite_document(html, &page("https://example.com/blog/post"));
        insta::assert_snapshot!(out, @r#"<!doctype html><html><HEAD lang="en"><base href="https://example.com/blog/"><title>T</title><script>window.__PROXIED__=true;</script></head><body>x</body></html>"#);
    }

    #[test]
    fn test_rewrite_without_head_prepends_base() {
        let out = rewrite_document("<p>hello</p>", &page("https://example.com/"));
        insta::assert_snapshot!(out, @r#"<base href="https://example.com/"><p>hello</p>"#);
    }

    #[test]
    fn test_header_element_is_not_mistaken_for_head() {
        let out = rewrite_document("<header>nav</header><head></head>", &page("https://example.com/"));
        assert_eq!(
            out,
            r#"<header>nav</header><head><base href="https://example.com/"><script>window.__PROXIED__=true;</script></head>"#
        );
    }

    #[test]
    fn test_only_first_head_close_gets_marker() {
        let out = rewrite_document("<head></head><head></head>", &page("https://example.com/"));
        assert_eq!(out.matches(PROXIED_MARKER).count(), 1);
    }
}
