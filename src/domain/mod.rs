pub mod article;
pub mod entry;

pub use article::ArticleRecord;
pub use entry::{FeedEntry, Metadata};
