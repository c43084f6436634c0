use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::app::Result;
use crate::domain::FeedEntry;
use crate::fetcher::ContentFetcher;
use crate::normalizer::Normalizer;

/// Yields the ordered entries of one syndication feed.
#[async_trait]
pub trait FeedSource {
    async fn entries(&self) -> Result<Vec<FeedEntry>>;
}

/// Feed retrieved over HTTP and parsed with the [`Normalizer`].
pub struct HttpFeedSource {
    url: String,
    fetcher: Arc<dyn ContentFetcher + Send + Sync>,
    normalizer: Normalizer,
}

impl HttpFeedSource {
    pub fn new(url: impl Into<String>, fetcher: Arc<dyn ContentFetcher + Send + Sync>) -> Self {
        Self {
            url: url.into(),
            fetcher,
            normalizer: Normalizer::new(),
        }
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn entries(&self) -> Result<Vec<FeedEntry>> {
        info!("Parsing {}...", self.url);
        let page = self.fetcher.fetch(&self.url).await?;

        if let Some(err) = page.status_error() {
            error!("{}", err);
        }

        self.normalizer.normalize(&page.body)
    }
}
