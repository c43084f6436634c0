use chrono::{DateTime, Utc};

use crate::domain::Metadata;

/// Persisted representation of one feed entry, keyed by link.
#[derive(Debug, Clone)]
pub struct ArticleRecord {
    pub id: i64,
    pub link: String,
    pub metadata: Metadata,
    pub text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub populated_at: Option<DateTime<Utc>>,
}

impl ArticleRecord {
    /// True once non-empty text has been written.
    pub fn is_populated(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// The stored link, unless it is blank. Returned as stored so it can
    /// be looked up again.
    pub fn usable_link(&self) -> Option<&str> {
        (!self.link.trim().is_empty()).then_some(self.link.as_str())
    }

    pub fn display_title(&self) -> &str {
        self.metadata
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or(&self.link)
    }
}
