pub mod sqlite;

use crate::app::Result;
use crate::domain::{ArticleRecord, FeedEntry};

pub use sqlite::SqliteStore;

/// Keyed collection of article records. The single source of truth for dedup.
pub trait ArticleStore {
    fn find_by_link(&self, link: &str) -> Result<Option<ArticleRecord>>;

    /// Create a record from a feed entry and return it as stored.
    ///
    /// Fails with `DuplicateKey` if the link is already present.
    fn insert(&self, entry: &FeedEntry) -> Result<ArticleRecord>;

    /// Persist the record's text.
    ///
    /// Fails with `NotFound` if the record is gone. Returns `false` without
    /// writing when the stored record already holds non-empty text.
    fn save(&self, record: &ArticleRecord) -> Result<bool>;

    fn count(&self) -> Result<usize>;
}
