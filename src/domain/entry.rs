use url::Url;

use crate::app::{GrabberError, Result};

/// Open bag of feed-supplied fields, stored verbatim alongside the article.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// One item from the syndication feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub link: String,
    pub metadata: Metadata,
}

impl FeedEntry {
    /// Build an entry, rejecting links that are not absolute http(s) URLs.
    pub fn new(link: &str, metadata: Metadata) -> Result<Self> {
        let link = link.trim();
        if link.is_empty() {
            return Err(GrabberError::MalformedEntry("entry has no link".into()));
        }

        let parsed = Url::parse(link)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GrabberError::MalformedEntry(format!(
                "unsupported link scheme: {}",
                link
            )));
        }

        Ok(Self {
            link: link.to_string(),
            metadata,
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_keeps_link_and_metadata() {
        let mut metadata = Metadata::new();
        metadata.insert("title".into(), json!("Show HN: a thing"));

        let entry = FeedEntry::new("https://example.com/a", metadata).unwrap();
        assert_eq!(entry.link, "https://example.com/a");
        assert_eq!(entry.title(), Some("Show HN: a thing"));
    }

    #[test]
    fn test_new_trims_link() {
        let entry = FeedEntry::new("  http://x/a \n", Metadata::new()).unwrap();
        assert_eq!(entry.link, "http://x/a");
    }

    #[test]
    fn test_empty_link_is_malformed() {
        let err = FeedEntry::new("   ", Metadata::new()).unwrap_err();
        assert!(matches!(err, GrabberError::MalformedEntry(_)));
    }

    #[test]
    fn test_relative_link_is_invalid() {
        let err = FeedEntry::new("/item?id=1", Metadata::new()).unwrap_err();
        assert!(matches!(err, GrabberError::InvalidUrl(_)));
    }

    #[test]
    fn test_non_http_scheme_is_malformed() {
        let err = FeedEntry::new("mailto:someone@example.com", Metadata::new()).unwrap_err();
        assert!(matches!(err, GrabberError::MalformedEntry(_)));
    }

    #[test]
    fn test_title_missing() {
        let entry = FeedEntry::new("http://x/a", Metadata::new()).unwrap();
        assert_eq!(entry.title(), None);
    }
}
