//! Plain-text extraction from fetched pages.
//!
//! ```text
//! decoded markup → html5ever DOM → visible text nodes → trimmed, joined text
//! ```
//!
//! Every visible text node is trimmed (inner whitespace runs collapse to a
//! single space), empty nodes are dropped, and the rest are joined in
//! document order with [`ExtractorConfig::separator`]. With the default empty
//! separator `<p>Hello <b>World</b></p>` yields `HelloWorld`.

mod config;

pub use config::ExtractorConfig;

use scraper::{Html, Node};

#[derive(Debug, Clone, Default)]
pub struct TextExtractor {
    config: ExtractorConfig,
}

impl TextExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Extract visible text. Never fails; malformed markup is parsed
    /// best-effort.
    pub fn extract(&self, markup: &str) -> String {
        let document = Html::parse_document(markup);

        let mut pieces: Vec<String> = Vec::new();
        for node in document.tree.root().descendants() {
            let Node::Text(text) = node.value() else {
                continue;
            };

            let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
                Node::Element(element) => self.is_skipped(element.name()),
                _ => false,
            });
            if hidden {
                continue;
            }

            let compact = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if !compact.is_empty() {
                pieces.push(compact);
            }
        }

        pieces.join(&self.config.separator)
    }

    fn is_skipped(&self, tag: &str) -> bool {
        self.config
            .skip_tags
            .iter()
            .any(|skip| skip.eq_ignore_ascii_case(tag))
    }
}
