//! LinkAmp: a backlink amplification toolkit
//!
//! This crate validates that candidate backlink URLs actually link to a target
//! domain, fans out best-effort amplification side-effects (search engine
//! notification, aggregator pings, URL shortening), and records per-link
//! results into locally stored campaigns.

pub mod config;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod remote;
pub mod storage;
pub mod validator;

use thiserror::Error;

/// Main error type for LinkAmp operations
#[derive(Debug, Error)]
pub enum LinkampError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("{service} rejected the request: {message}")]
    Remote { service: String, message: String },

    #[error("Link to {target_domain} not found on {url}")]
    LinkNotFound { url: String, target_domain: String },

    #[error("Invalid run configuration: {0}")]
    Configuration(String),

    #[error("Critical error processing {url}: {message}")]
    Critical { url: String, message: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

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

/// Result type alias for LinkAmp operations
pub type Result<T> = std::result::Result<T, LinkampError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{LinkResult, LinkType, Stage, StageConfig, StageOutcome};
