//! Storage module for the persistent page index
//!
//! This module owns the SQLite file that backs every query operation:
//! - Schema management for the page table and the derived FTS5 structure
//! - Bulk population during indexing and read access thereafter
//! - Ranked full-text search, with a substring-scan fallback when the
//!   storage engine lacks FTS5 support

mod schema;
mod store;

pub use store::IndexStore;

use std::fmt;
use std::path::Path;

use crate::Result;

/// Opens or creates the index database at the given path
pub fn open_store(path: &Path) -> Result<IndexStore> {
    IndexStore::open(path)
}

/// Represents one indexed HTML page
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    /// POSIX-style path relative to the archive root; unique key
    pub path: String,
    pub title: String,
    /// Normalized plain text content
    pub content: String,
    /// Size of the source file on disk at index time
    pub size_bytes: u64,
    /// RFC 3339 timestamp of the last (re)index
    pub indexed_at: String,
}

/// One ranked search result
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub path: String,
    pub title: String,
    /// Short contextual excerpt around a matched term
    pub snippet: String,
    /// Relevance score; lower is better. Always 0.0 in degraded mode.
    pub score: f64,
}

/// Compact page listing entry
#[derive(Debug, Clone, PartialEq)]
pub struct PageSummary {
    pub path: String,
    pub title: String,
}

/// Which search strategy the store can serve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// FTS5-backed ranked term matching
    Accelerated,
    /// Case-insensitive substring scan over page records
    Degraded,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accelerated => "accelerated",
            Self::Degraded => "degraded",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
