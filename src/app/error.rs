use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrabberError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] rusqlite_migration::Error),

    #[error("Metadata encoding error: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network-level fetch failure. Retryable on a later run.
    #[error("Transient failure fetching {url}: {reason}")]
    Transient { url: String, reason: String },

    #[error("Unexpected HTTP response code {status} for {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Article not found: {0}")]
    NotFound(String),

    #[error("Article already exists: {0}")]
    DuplicateKey(String),

    #[error("Malformed feed entry: {0}")]
    MalformedEntry(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GrabberError {
    pub fn is_transient(&self) -> bool {
        matches!(self, GrabberError::Transient { .. })
    }
}

pub type Result<T> = std::result::Result<T, GrabberError>;
