//! Doc-Harvester: a narrow documentation harvester
//!
//! This crate fetches a documentation page, follows the handful of links that
//! sit beside or above it in the site hierarchy, and accumulates the cleaned
//! page text into a single JSON document that is saved periodically while the
//! harvest runs.

pub mod config;
pub mod crawler;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

pub use crawler::{ExtractError, FetchError};
pub use storage::StoreError;

/// Main error type for Doc-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] UrlError),

    #[error("Transport failure: {0}")]
    Transport(#[from] FetchError),

    #[error("Extraction failure: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),
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
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL '{url}': {source}")]
    Parse {
        url: String,
        source: ::url::ParseError,
    },

    #[error("URL has no host: {0}")]
    MissingHost(String),
}

/// Result type alias for Doc-Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Harvester, HarvestReport};
pub use state::{Node, NodeId, SiteGraph};
pub use storage::{DocumentSink, DocumentStore, NullStore};
pub use url::{canonical_url, ScopeClassifier, ScopeVerdict};
