//! Yoku: a polite auction-search crawler
//!
//! This crate pages through marketplace search results, extracts one record per
//! auction listing, and decodes the unix timestamps the marketplace embeds in
//! image filenames and tracking parameters.

pub mod config;
pub mod crawler;
pub mod listing;
pub mod output;
pub mod query;
pub mod timestamp;

use thiserror::Error;

/// Main error type for Yoku operations
#[derive(Debug, Error)]
pub enum YokuError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Yoku operations
pub type Result<T> = std::result::Result<T, YokuError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOutcome, Crawler, HttpFetcher, PageFetcher};
pub use listing::{AuctionListing, PageResult};
pub use query::{ParamValue, QueryBuilder, SearchParameters};
