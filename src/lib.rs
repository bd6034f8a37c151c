//! Docdex: a local HTML documentation indexer and search engine
//!
//! This crate turns a directory tree of HTML documentation pages into a
//! queryable SQLite-backed archive, with ranked full-text search where the
//! storage engine supports it and a substring-scan fallback where it does not.

pub mod archive;
pub mod config;
pub mod extract;
pub mod index;
pub mod links;
pub mod ops;
pub mod search;
pub mod storage;

use thiserror::Error;

/// Main error type for docdex operations
#[derive(Debug, Error)]
pub enum DocdexError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Path is outside the archive root")]
    PathSecurity,

    #[error("File '{path}' not found in archive")]
    PathNotFound { path: String },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Archive index not initialized; retry after startup completes")]
    IndexUnavailable,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

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
}

/// Result type alias for docdex operations
pub type Result<T> = std::result::Result<T, DocdexError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use storage::{IndexStore, PageRecord, SearchMode};
