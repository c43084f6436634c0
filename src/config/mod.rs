//! Configuration management for newsgrab.
//!
//! Configuration is read from `~/.config/newsgrab/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::extractor::ExtractorConfig;
use crate::fetcher::FetcherConfig;
use crate::pipeline::PipelineConfig;

pub const DEFAULT_FEED_URL: &str = "http://news.ycombinator.com/rss";

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The single feed ingested on every run.
    pub feed_url: String,
    /// SQLite database file. Defaults to the user data directory.
    pub db_path: Option<PathBuf>,
    pub fetcher: FetcherConfig,
    pub extractor: ExtractorConfig,
    pub pipeline: PipelineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            db_path: None,
            fetcher: FetcherConfig::default(),
            extractor: ExtractorConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// With an explicit path the file must exist. Without one, the default
    /// path is used and created with commented defaults when missing.
    /// Missing fields in the config file use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let config_path = Self::default_config_path()?;
                if !config_path.exists() {
                    Self::create_default_config(&config_path)?;
                    return Ok(Self::default());
                }
                Self::load_from(&config_path)
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Apply command-line overrides for the feed URL and database path.
    pub fn with_overrides(mut self, feed_url: Option<String>, db_path: Option<PathBuf>) -> Self {
        if let Some(feed_url) = feed_url {
            self.feed_url = feed_url;
        }
        if let Some(db_path) = db_path {
            self.db_path = Some(db_path);
        }
        self
    }

    /// Get the default config file path: `~/.config/newsgrab/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("newsgrab").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        format!(
            r##"# newsgrab configuration

# Feed ingested on every run
feed_url = "{DEFAULT_FEED_URL}"

# SQLite database file (default: <data dir>/newsgrab/newsgrab.db)
# db_path = "/var/lib/newsgrab/newsgrab.db"

[fetcher]
timeout_secs = 30
connect_timeout_secs = 10
# user_agent = "newsgrab/0.1.0"

[extractor]
# Inserted between visible text nodes
separator = ""
skip_tags = ["script", "style", "noscript", "template"]

[pipeline]
# Entries processed concurrently; 1 keeps strict feed order
workers = 1
# Pages with no visible text: "store" writes an empty string,
# "skip" leaves the article unpopulated
empty_text = "store"
"##
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
