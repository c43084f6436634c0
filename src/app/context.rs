use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::app::error::{GrabberError, Result};
use crate::config::Config;
use crate::extractor::TextExtractor;
use crate::feed::HttpFeedSource;
use crate::fetcher::{ContentFetcher, HttpFetcher};
use crate::pipeline::{IngestionPipeline, RunSummary};
use crate::store::{ArticleStore, SqliteStore};

pub struct AppContext {
    pub store: Arc<SqliteStore>,
    pub feed: HttpFeedSource,
    pub pipeline: IngestionPipeline<SqliteStore>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let db_path = match config.db_path.clone() {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);
        info!("Using database {}", db_path.display());
        Self::with_store(config, store)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Self::with_store(config, store)
    }

    fn with_store(config: Config, store: Arc<SqliteStore>) -> Result<Self> {
        let fetcher: Arc<dyn ContentFetcher + Send + Sync> =
            Arc::new(HttpFetcher::new(&config.fetcher)?);
        let feed = HttpFeedSource::new(config.feed_url, fetcher.clone());
        let pipeline = IngestionPipeline::new(
            store.clone(),
            fetcher,
            TextExtractor::new(config.extractor),
            config.pipeline,
        );

        Ok(Self {
            store,
            feed,
            pipeline,
        })
    }

    /// One pass over the configured feed.
    pub async fn run(&self) -> Result<RunSummary> {
        let summary = self.pipeline.run(&self.feed).await;
        info!("{} articles stored", self.store.count()?);
        Ok(summary)
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| GrabberError::Config("Could not find data directory".into()))?;
        let grab_dir = data_dir.join("newsgrab");
        std::fs::create_dir_all(&grab_dir)?;
        Ok(grab_dir.join("newsgrab.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_run_against_live_http() {
        let server = MockServer::start().await;
        let rss = format!(
            r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>HN</title>
  <item><title>A</title><link>{uri}/a</link></item>
  <item><title>B</title><link>{uri}/b</link></item>
</channel></rss>"#,
            uri = server.uri()
        );

        Mock::given(method("GET"))
            .and(path("/rss"))
            .respond_with(ResponseTemplate::new(200).set_body_string(rss))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/a"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>Article body</p>"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/b"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<p>Oops</p>"))
            .expect(1)
            .mount(&server)
            .await;

        let config = Config::default().with_overrides(Some(format!("{}/rss", server.uri())), None);
        let ctx = AppContext::in_memory(config).unwrap();

        let first = ctx.run().await.unwrap();
        assert_eq!(first.entries, 2);
        assert_eq!(first.created, 2);
        assert_eq!(first.populated, 2);

        let second = ctx.run().await.unwrap();
        assert_eq!(second.created, 0);
        assert_eq!(second.already_populated, 2);

        let a = ctx
            .store
            .find_by_link(&format!("{}/a", server.uri()))
            .unwrap()
            .unwrap();
        assert_eq!(a.text.as_deref(), Some("Article body"));
        assert_eq!(ctx.store.count().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_latin1_page_stored_as_unicode() {
        let server = MockServer::start().await;
        let rss = format!(
            r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>HN</title>
  <item><title>Menu</title><link>{uri}/menu</link></item>
</channel></rss>"#,
            uri = server.uri()
        );

        Mock::given(method("GET"))
            .and(path("/rss"))
            .respond_with(ResponseTemplate::new(200).set_body_string(rss))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/menu"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                b"<p>Caf\xe9 cr\xe8me</p>".to_vec(),
                "text/html; charset=iso-8859-1",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let config = Config::default().with_overrides(Some(format!("{}/rss", server.uri())), None);
        let ctx = AppContext::in_memory(config).unwrap();
        ctx.run().await.unwrap();

        let menu = ctx
            .store
            .find_by_link(&format!("{}/menu", server.uri()))
            .unwrap()
            .unwrap();
        assert_eq!(menu.text.as_deref(), Some("Café crème"));
    }

    #[tokio::test]
    async fn test_file_backed_context() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("grab.db");
        let config = Config::default().with_overrides(None, Some(db.clone()));

        let ctx = AppContext::new(config).unwrap();
        assert_eq!(ctx.store.count().unwrap(), 0);
        assert!(db.exists());
    }
}
