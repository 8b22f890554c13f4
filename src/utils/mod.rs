//! Utility functions and helpers.

pub mod fs;
pub mod http;

use scraper::{ElementRef, Selector};
use url::Url;

use crate::error::{AppError, Result};

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Make `href` absolute using the page it was found on.
///
/// Relative and protocol-relative targets are joined with `source_url`.
/// Already absolute targets, and targets on an unparseable page, are
/// returned unchanged.
pub fn absolutize(href: &str, source_url: &str) -> String {
    let href = href.trim();
    if Url::parse(href).is_ok() {
        return href.to_string();
    }
    match Url::parse(source_url) {
        Ok(base) => resolve_url(&base, href),
        Err(_) => href.to_string(),
    }
}

/// Extract the host from a URL string.
pub fn get_domain(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_string()))
}

/// Strip a leading `www2.` and then a leading `www.` from a host name.
pub fn normalize_domain(host: &str) -> String {
    let host = host.strip_prefix("www2.").unwrap_or(host);
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// Grouping key for a page URL: its host with `www` prefixes stripped.
pub fn domain_key(source_url: &str) -> Option<String> {
    get_domain(source_url).map(|host| normalize_domain(&host))
}

/// Parse a CSS selector, mapping failures to [`AppError::Selector`].
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Text content of an element with whitespace runs collapsed.
pub fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://example.com/path/").unwrap();
        assert_eq!(
            resolve_url(&base, "page.html"),
            "https://example.com/path/page.html"
        );
        assert_eq!(
            resolve_url(&base, "/root.html"),
            "https://example.com/root.html"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_absolutize() {
        let page = "https://www2.ed.gov/about/offices/list/ocr/data.html";
        assert_eq!(
            absolutize("../docs/a.xlsx", page),
            "https://www2.ed.gov/about/offices/list/docs/a.xlsx"
        );
        assert_eq!(
            absolutize("./b.csv", page),
            "https://www2.ed.gov/about/offices/list/ocr/b.csv"
        );
        assert_eq!(absolutize("/c.pdf", page), "https://www2.ed.gov/c.pdf");
        assert_eq!(
            absolutize("//ocrdata.ed.gov/d.zip", page),
            "https://ocrdata.ed.gov/d.zip"
        );
        assert_eq!(
            absolutize("https://nces.ed.gov/e.csv", page),
            "https://nces.ed.gov/e.csv"
        );
        assert_eq!(absolutize("f.csv", "not a url"), "f.csv");
    }

    #[test]
    fn test_get_domain() {
        assert_eq!(
            get_domain("https://example.com/path"),
            Some("example.com".to_string())
        );
        assert_eq!(
            get_domain("https://sub.example.com:8080/path"),
            Some("sub.example.com".to_string())
        );
        assert_eq!(get_domain("no-scheme/path"), None);
    }

    #[test]
    fn test_normalize_domain() {
        assert_eq!(normalize_domain("www2.data.gov"), "data.gov");
        assert_eq!(normalize_domain("www.data.gov"), "data.gov");
        assert_eq!(normalize_domain("data.gov"), "data.gov");
        assert_eq!(normalize_domain("nces.data.gov"), "nces.data.gov");
    }

    #[test]
    fn test_normalize_domain_is_idempotent() {
        for host in ["www2.data.gov", "www.data.gov", "data.gov"] {
            let once = normalize_domain(host);
            assert_eq!(normalize_domain(&once), once);
        }
    }

    #[test]
    fn test_domain_key() {
        assert_eq!(
            domain_key("https://www2.ed.gov/fund/data/index.html"),
            Some("ed.gov".to_string())
        );
        assert_eq!(domain_key("mailto:someone@ed.gov"), None);
        assert_eq!(domain_key(""), None);
    }

    #[test]
    fn test_parse_selector() {
        assert!(parse_selector("#container #maincontent").is_ok());
        assert!(parse_selector("[[invalid").is_err());
    }
}
