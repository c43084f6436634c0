use serde::{Deserialize, Serialize};

/// Configuration for plain-text extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Inserted between visible text nodes (default: empty)
    pub separator: String,

    /// Elements whose contents are never visible text
    pub skip_tags: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            separator: String::new(),
            skip_tags: vec![
                "script".to_string(),
                "style".to_string(),
                "noscript".to_string(),
                "template".to_string(),
            ],
        }
    }
}
