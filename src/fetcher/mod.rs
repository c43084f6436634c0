pub mod charset;
pub mod config;
pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::{GrabberError, Result};

pub use config::FetcherConfig;
pub use http_fetcher::HttpFetcher;

/// Raw response for a URL. Non-2xx responses are still returned with
/// their body; callers decide what to do with them.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchedPage {
    /// Body decoded with the page's declared character set.
    pub fn text(&self) -> String {
        charset::decode(&self.body, self.content_type.as_deref())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `UnexpectedStatus` error to report for a non-2xx response.
    pub fn status_error(&self) -> Option<GrabberError> {
        (!self.is_success()).then(|| GrabberError::UnexpectedStatus {
            url: self.url.clone(),
            status: self.status,
        })
    }
}

/// Retrieves raw page content over HTTP.
///
/// Connection, DNS, timeout and body-read failures surface as
/// [`GrabberError::Transient`] with no partial content.
#[async_trait]
pub trait ContentFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}
