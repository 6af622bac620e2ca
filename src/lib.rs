//! Coach-Scraper: harvests chess coach profiles into a relational store
//!
//! This crate implements a fetch-extract-load pipeline that pages through the
//! coach directories of chess sites, caches the per-coach documents on disk,
//! extracts normalized records from them and upserts the records into SQLite.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod locale;
pub mod record;
pub mod site;
pub mod storage;

use thiserror::Error;

/// Main error type for Coach-Scraper operations
#[derive(Debug, Error)]
pub enum CoachError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Work queue '{0}' is closed")]
    QueueClosed(String),

    #[error("Pipeline for {site} aborted: {message}")]
    Pipeline { site: String, message: String },
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

/// Result type alias for Coach-Scraper operations
pub type Result<T> = std::result::Result<T, CoachError>;

// Re-export commonly used types
pub use config::Config;
pub use record::{CoachRecord, Title};
pub use site::Site;
