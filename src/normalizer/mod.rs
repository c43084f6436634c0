//! Feed parsing.
//!
//! RSS documents are read with the `rss` crate so every item element lands in
//! the metadata under its own name (`comments`, `pubDate`, `guid`, ...).
//! Atom and JSON Feed fall back to feed-rs.

use feed_rs::model::Entry;
use feed_rs::parser;
use html_escape::decode_html_entities;
use rss::extension::Extension;
use rss::{Channel, Item};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::app::{GrabberError, Result};
use crate::domain::{FeedEntry, Metadata};

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse feed bytes into entries, in feed order.
    ///
    /// Entries without a usable link are logged and dropped here so that
    /// everything downstream can rely on `FeedEntry::link`.
    pub fn normalize(&self, body: &[u8]) -> Result<Vec<FeedEntry>> {
        let candidates: Vec<(String, Metadata)> = match Channel::read_from(body) {
            Ok(channel) => channel.items.into_iter().map(Self::rss_item).collect(),
            Err(rss_err) => {
                debug!("Not RSS ({}), trying feed-rs", rss_err);
                let feed =
                    parser::parse(body).map_err(|e| GrabberError::FeedParse(e.to_string()))?;
                feed.entries.into_iter().map(Self::feed_rs_entry).collect()
            }
        };

        let entries = candidates
            .into_iter()
            .filter_map(|(link, metadata)| {
                let label = metadata
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or("untitled")
                    .to_string();
                match FeedEntry::new(&link, metadata) {
                    Ok(feed_entry) => Some(feed_entry),
                    Err(e) => {
                        warn!("Dropping feed entry {:?}: {}", label, e);
                        None
                    }
                }
            })
            .collect();

        Ok(entries)
    }

    /// Link plus every element the item carried.
    fn rss_item(item: Item) -> (String, Metadata) {
        let mut metadata = Metadata::new();

        let permalink = item
            .guid
            .as_ref()
            .filter(|guid| guid.permalink)
            .map(|guid| guid.value.clone());
        let link = item.link.clone().or(permalink).unwrap_or_default();

        if let Some(title) = item.title {
            metadata.insert("title".into(), json!(decode_html_entities(&title).to_string()));
        }
        if let Some(link) = item.link {
            metadata.insert("link".into(), json!(link));
        }
        if let Some(description) = item.description {
            metadata.insert(
                "description".into(),
                json!(decode_html_entities(&description).to_string()),
            );
        }
        if let Some(author) = item.author {
            metadata.insert("author".into(), json!(author));
        }
        if !item.categories.is_empty() {
            let categories: Vec<Value> = item.categories.into_iter().map(|c| json!(c.name)).collect();
            metadata.insert("categories".into(), Value::Array(categories));
        }
        if let Some(comments) = item.comments {
            metadata.insert("comments".into(), json!(comments));
        }
        if let Some(enclosure) = item.enclosure {
            metadata.insert(
                "enclosure".into(),
                json!({
                    "url": enclosure.url,
                    "length": enclosure.length,
                    "type": enclosure.mime_type,
                }),
            );
        }
        if let Some(guid) = item.guid {
            metadata.insert("guid".into(), json!(guid.value));
        }
        if let Some(pub_date) = item.pub_date {
            metadata.insert("pubDate".into(), json!(pub_date));
        }
        if let Some(source) = item.source {
            metadata.insert(
                "source".into(),
                json!({ "url": source.url, "title": source.title }),
            );
        }
        if let Some(content) = item.content {
            metadata.insert("content:encoded".into(), json!(content));
        }
        for (prefix, elements) in item.extensions {
            for (name, values) in elements {
                metadata.insert(format!("{prefix}:{name}"), extension_value(&values));
            }
        }
        if let Some(dc) = item.dublin_core_ext {
            if !dc.creators.is_empty() {
                metadata.insert("dc:creator".into(), json!(dc.creators));
            }
            if !dc.dates.is_empty() {
                metadata.insert("dc:date".into(), json!(dc.dates));
            }
        }

        (link, metadata)
    }

    fn feed_rs_entry(entry: Entry) -> (String, Metadata) {
        let link = entry.links.first().map(|l| l.href.clone()).unwrap_or_default();
        let mut metadata = Metadata::new();

        if !entry.id.is_empty() {
            metadata.insert("id".into(), json!(entry.id));
        }
        if let Some(title) = entry.title {
            metadata.insert(
                "title".into(),
                json!(decode_html_entities(&title.content).to_string()),
            );
        }
        if let Some(summary) = entry.summary {
            metadata.insert(
                "summary".into(),
                json!(decode_html_entities(&summary.content).to_string()),
            );
        }
        if let Some(published) = entry.published {
            metadata.insert("published".into(), json!(published.to_rfc3339()));
        }
        if let Some(updated) = entry.updated {
            metadata.insert("updated".into(), json!(updated.to_rfc3339()));
        }
        if !entry.authors.is_empty() {
            let authors: Vec<Value> = entry.authors.into_iter().map(|a| json!(a.name)).collect();
            metadata.insert("authors".into(), Value::Array(authors));
        }
        if !entry.categories.is_empty() {
            let categories: Vec<Value> = entry
                .categories
                .into_iter()
                .map(|c| json!(c.term))
                .collect();
            metadata.insert("categories".into(), Value::Array(categories));
        }
        if entry.links.len() > 1 {
            let links: Vec<Value> = entry.links.into_iter().map(|l| json!(l.href)).collect();
            metadata.insert("links".into(), Value::Array(links));
        }

        (link, metadata)
    }
}

/// One value for a single occurrence, an array for repeats.
fn extension_value(values: &[Extension]) -> Value {
    let mut texts: Vec<Value> = values
        .iter()
        .map(|ext| json!(ext.value.clone().unwrap_or_default()))
        .collect();
    if texts.len() == 1 {
        texts.remove(0)
    } else {
        Value::Array(texts)
    }
}
