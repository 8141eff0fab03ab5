//! URL text source

use super::leaves::UrlLeaf;
use crate::objects::{ObjectRef, TextSource};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use url::Url;

/// `host.tld` with an optional port and path, no scheme
static BARE_HOST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,}(?::\d{1,5})?(?:/\S*)?$")
        .expect("valid regex")
});

/// Text source recognising web addresses
#[derive(Debug, Default)]
pub struct UrlSource;

impl UrlSource {
    pub const RANK: i32 = 75;

    pub fn new() -> Self {
        Self
    }

    /// Parse `text` as an http(s) URL or a bare host
    pub fn parse(&self, text: &str) -> Option<Url> {
        let text = text.trim();
        if text.is_empty() || text.contains(char::is_whitespace) {
            return None;
        }

        if let Ok(url) = Url::parse(text) {
            return match url.scheme() {
                "http" | "https" if url.host_str().is_some() => Some(url),
                _ => None,
            };
        }

        if BARE_HOST.is_match(&text.to_lowercase()) {
            return Url::parse(&format!("https://{}", text)).ok();
        }
        None
    }
}

impl TextSource for UrlSource {
    fn id(&self) -> &str {
        "urls"
    }

    fn text_items(&self, key: &str) -> Vec<ObjectRef> {
        self.parse(key)
            .map(|url| Arc::new(UrlLeaf::new(url)) as ObjectRef)
            .into_iter()
            .collect()
    }

    fn rank(&self) -> Option<i32> {
        Some(Self::RANK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_urls() {
        let source = UrlSource::new();
        assert_eq!(
            source.parse("https://example.org/a?b=1").unwrap().as_str(),
            "https://example.org/a?b=1"
        );
        assert!(source.parse("http://localhost:8080").is_some());
        assert!(source.parse("ftp://example.org").is_none());
        assert!(source.parse("mailto:me@example.org").is_none());
    }

    #[test]
    fn test_bare_hosts() {
        let source = UrlSource::new();
        assert_eq!(
            source.parse("docs.rs/tokio").unwrap().as_str(),
            "https://docs.rs/tokio"
        );
        assert!(source.parse("example.org").is_some());
        assert!(source.parse("terminal").is_none());
        assert!(source.parse("notes.t").is_none());
        assert!(source.parse("two words.com").is_none());
        assert!(source.parse("").is_none());
    }

    #[test]
    fn test_text_items() {
        let source = UrlSource::new();
        let items = source.text_items("rust-lang.org");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].key(), "url:https://rust-lang.org/");
        assert_eq!(items[0].aliases(), vec!["rust-lang.org".to_string()]);
        assert!(source.text_items("firefox").is_empty());
        assert_eq!(source.rank(), Some(75));
    }
}
