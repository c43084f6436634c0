//! Ingestion and enrichment.
//!
//! ```text
//! FeedSource → upsert(entry) → ArticleStore
//!                 └→ populate(link) → ContentFetcher → TextExtractor → ArticleStore::save
//! ```
//!
//! Records move `unpopulated → populated` exactly once. A transient fetch
//! failure leaves the record unpopulated for a later run; no error from one
//! entry stops the others.

pub mod config;
mod locks;

pub use config::{EmptyTextPolicy, PipelineConfig};

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use crate::app::{GrabberError, Result};
use crate::domain::{ArticleRecord, FeedEntry};
use crate::extractor::TextExtractor;
use crate::feed::FeedSource;
use crate::fetcher::ContentFetcher;
use crate::store::ArticleStore;
use locks::LinkLocks;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopulateOutcome {
    /// Text was already present; nothing fetched.
    AlreadyPopulated,
    /// New text written.
    Populated { chars: usize },
    /// Page had no visible text. `stored` tells whether `""` was written.
    Empty { stored: bool },
    /// Transient fetch failure; record left as it was.
    Deferred,
}

/// Counters for one pass over the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub entries: usize,
    pub created: usize,
    pub populated: usize,
    pub already_populated: usize,
    pub empty: usize,
    pub deferred: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, result: &Result<Ingested>) {
        let ingested = match result {
            Ok(ingested) => ingested,
            Err(_) => {
                self.failed += 1;
                return;
            }
        };

        if ingested.created {
            self.created += 1;
        }

        match &ingested.populate {
            Ok(PopulateOutcome::AlreadyPopulated) => self.already_populated += 1,
            Ok(PopulateOutcome::Populated { .. }) => self.populated += 1,
            Ok(PopulateOutcome::Empty { .. }) => self.empty += 1,
            Ok(PopulateOutcome::Deferred) => self.deferred += 1,
            Err(_) => self.failed += 1,
        }
    }
}

struct Ingested {
    record: ArticleRecord,
    created: bool,
    populate: Result<PopulateOutcome>,
}

pub struct IngestionPipeline<S: ArticleStore> {
    store: Arc<S>,
    fetcher: Arc<dyn ContentFetcher + Send + Sync>,
    extractor: TextExtractor,
    config: PipelineConfig,
    locks: LinkLocks,
}

impl<S: ArticleStore> IngestionPipeline<S> {
    pub fn new(
        store: Arc<S>,
        fetcher: Arc<dyn ContentFetcher + Send + Sync>,
        extractor: TextExtractor,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            fetcher,
            extractor,
            config,
            locks: LinkLocks::new(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Read the feed and upsert every entry in feed order.
    ///
    /// Never fails: a feed that cannot be read counts as empty, and each
    /// entry's errors are logged and tallied.
    pub async fn run(&self, source: &(dyn FeedSource + Send + Sync)) -> RunSummary {
        let entries = match source.entries().await {
            Ok(entries) => entries,
            Err(e) => {
                error!("Failed to read feed: {}", e);
                Vec::new()
            }
        };

        info!("Upserting {} entries...", entries.len());

        let mut summary = RunSummary {
            entries: entries.len(),
            ..Default::default()
        };

        let results: Vec<Result<Ingested>> = stream::iter(entries.iter())
            .map(|entry| self.ingest(entry))
            .buffer_unordered(self.config.concurrency())
            .collect()
            .await;

        for result in &results {
            summary.record(result);
        }

        info!(
            "Run complete: {} entries, {} new, {} populated, {} already populated, {} empty, {} deferred, {} failed",
            summary.entries,
            summary.created,
            summary.populated,
            summary.already_populated,
            summary.empty,
            summary.deferred,
            summary.failed
        );

        summary
    }

    /// Ensure a record exists for the entry, populate it, and return it.
    ///
    /// Idempotent: a second call for the same link creates nothing and, once
    /// the record is populated, fetches nothing. Populate failures are
    /// logged, not returned.
    pub async fn upsert(&self, entry: &FeedEntry) -> Result<ArticleRecord> {
        self.ingest(entry).await.map(|ingested| ingested.record)
    }

    async fn ingest(&self, entry: &FeedEntry) -> Result<Ingested> {
        let (record, created) = match self.resolve(entry).await {
            Ok(resolved) => resolved,
            Err(e) => {
                error!("Failed to upsert {}: {}", entry.link, e);
                return Err(e);
            }
        };

        let Some(link) = record.usable_link().map(String::from) else {
            error!("Unexpected: no url for record {}", record.id);
            return Err(GrabberError::MalformedEntry(format!(
                "record {} has no usable link",
                record.id
            )));
        };

        let populate = self.populate(&link).await;
        if let Err(e) = &populate {
            error!("Failed to populate {}: {}", link, e);
        }

        Ok(Ingested {
            record,
            created,
            populate,
        })
    }

    /// Find-or-create under the link lock. Returns the record and whether
    /// it was created by this call.
    async fn resolve(&self, entry: &FeedEntry) -> Result<(ArticleRecord, bool)> {
        let _guard = self.locks.acquire(&entry.link).await;

        if let Some(record) = self.store.find_by_link(&entry.link)? {
            debug!("Record found for {}.", entry.link);
            return Ok((record, false));
        }

        debug!("No record found for {}. Inserting one...", entry.link);
        match self.store.insert(entry) {
            Ok(record) => Ok((record, true)),
            Err(GrabberError::DuplicateKey(link)) => {
                // Another writer got there first.
                warn!("Record for {} appeared during insert, using it", link);
                let record = self
                    .store
                    .find_by_link(&link)?
                    .ok_or(GrabberError::NotFound(link))?;
                Ok((record, false))
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch, extract and save text for the record at `url`, unless it
    /// already has some.
    pub async fn populate(&self, url: &str) -> Result<PopulateOutcome> {
        let _guard = self.locks.acquire(url).await;

        let mut record = self
            .store
            .find_by_link(url)?
            .ok_or_else(|| GrabberError::NotFound(url.to_string()))?;

        if record.is_populated() {
            info!("Already populated {}.", url);
            return Ok(PopulateOutcome::AlreadyPopulated);
        }

        debug!("Grabbing {}", url);
        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) if e.is_transient() => {
                warn!("{}", e);
                return Ok(PopulateOutcome::Deferred);
            }
            Err(e) => return Err(e),
        };

        debug!(
            "Fetched {} ({} bytes, {})",
            url,
            page.body.len(),
            page.content_type.as_deref().unwrap_or("unknown type")
        );

        // Non-2xx bodies are still extracted.
        if let Some(err) = page.status_error() {
            error!("{}", err);
        }

        let text = self.extractor.extract(&page.text());
        let empty = text.is_empty();
        if empty {
            match self.config.empty_text {
                EmptyTextPolicy::Store => warn!("No text extracted from {}, storing it empty", url),
                EmptyTextPolicy::Skip => {
                    warn!("No text extracted from {}, leaving it unpopulated", url);
                    return Ok(PopulateOutcome::Empty { stored: false });
                }
            }
        }

        let chars = text.chars().count();
        record.text = Some(text);

        debug!("Saving new text into the database...");
        if !self.store.save(&record)? {
            info!("Already populated {}.", url);
            return Ok(PopulateOutcome::AlreadyPopulated);
        }

        if empty {
            Ok(PopulateOutcome::Empty { stored: true })
        } else {
            info!("Populated {} ({} chars)", record.display_title(), chars);
            Ok(PopulateOutcome::Populated { chars })
        }
    }
}
