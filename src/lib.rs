//! Hostcrawl: crawl workers for a host analytics platform
//!
//! This crate implements the pieces shared by every crawl worker: the
//! filesystem exchange channel that hands extracted documents to the host,
//! and the two-phase (discover, then fetch) paginated crawl engine that
//! feeds it. Per-source extractors live in [`sources`].

pub mod columns;
pub mod config;
pub mod crawler;
pub mod exchange;
pub mod logging;
pub mod sources;

use thiserror::Error;

/// Main error type for Hostcrawl operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Extraction error for {url}: {message}")]
    Extract { url: String, message: String },

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarvestError {
    /// Shorthand for an extraction failure on `url`
    pub fn extract(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extract {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed params at line {line}: {message}")]
    Params { line: usize, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Hostcrawl operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{HostConfig, RowBudget};
pub use crawler::{CrawlEngine, CrawlStats, Extractor};
pub use exchange::{ExchangeChannel, Record, RecordSink};
