//! # newsgrab
//!
//! Ingests one syndication feed into SQLite and stores the cleaned full
//! text of every linked article.
//!
//! ## Architecture
//!
//! ```text
//! FeedSource → IngestionPipeline::upsert → ArticleStore
//!                       └→ populate → ContentFetcher → TextExtractor → ArticleStore
//! ```
//!
//! Reruns are safe: links are deduplicated by the store, and a record whose
//! text is already present is never fetched again. A page that cannot be
//! reached is left unpopulated and picked up by a later run.
//!
//! ## Quick Start
//!
//! ```bash
//! # Ingest the default feed (Hacker News front page)
//! newsgrab
//!
//! # Another feed, another database
//! newsgrab --feed https://lobste.rs/rss --db ./lobsters.db
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together store,
/// fetcher, feed source and pipeline.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Configuration file loading (`~/.config/newsgrab/config.toml`).
pub mod config;

/// Core domain models.
///
/// - [`FeedEntry`](domain::FeedEntry): validated feed item with open metadata
/// - [`ArticleRecord`](domain::ArticleRecord): persisted article keyed by link
pub mod domain;

/// Plain-text extraction from HTML.
pub mod extractor;

/// Feed sources.
///
/// - [`FeedSource`](feed::FeedSource): async trait yielding ordered entries
/// - [`HttpFeedSource`](feed::HttpFeedSource): feed fetched over HTTP
pub mod feed;

/// HTTP page retrieval.
///
/// - [`ContentFetcher`](fetcher::ContentFetcher): async trait for fetching pages
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Feed parsing and normalization.
///
/// Converts RSS 0.9x/1.0/2.0, Atom 0.3/1.0, and JSON Feed 1.0
/// into [`FeedEntry`](domain::FeedEntry) values.
pub mod normalizer;

/// Upsert and populate orchestration.
pub mod pipeline;

/// SQLite persistence layer.
///
/// - [`ArticleStore`](store::ArticleStore): trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;
