//! Search operations over the index store
//!
//! Query validation and strategy dispatch live here; the store itself only
//! knows how to execute each strategy. The search mode is decided once at
//! store-initialization time, so no per-call capability probing happens.

use crate::storage::{IndexStore, PageSummary, SearchHit, SearchMode};
use crate::{DocdexError, Result};
use std::path::Path;
use walkdir::WalkDir;

/// Aggregate archive statistics
#[derive(Debug, Clone)]
pub struct ArchiveStats {
    /// HTML files currently on disk under the root
    pub file_count: u64,

    /// Non-HTML files under the root (the index database included)
    pub other_file_count: u64,

    /// Total bytes of all regular files under the root
    pub total_size_bytes: u64,

    /// Page records in the index store
    pub indexed_page_count: u64,

    pub search_mode: SearchMode,
}

/// Runs a ranked term search, or a substring scan when the accelerated
/// index is unavailable. The result shape is identical in both modes.
///
/// # Errors
///
/// * `InvalidQuery` - empty/whitespace query or non-positive limit
/// * `IndexUnavailable` - the index has not been built yet
pub fn search(store: &IndexStore, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
    validate_limit(limit)?;
    if query.trim().is_empty() {
        return Err(DocdexError::InvalidQuery(
            "search query must not be empty".to_string(),
        ));
    }
    store.ensure_ready()?;

    match store.mode() {
        SearchMode::Accelerated => store.search_ranked(query, limit),
        SearchMode::Degraded => store.search_scan(query, limit),
    }
}

/// Lists indexed pages ordered by path, optionally narrowed by a
/// glob-style pattern (`*`, `?`, character classes) matched against the
/// page path.
pub fn list_pages(
    store: &IndexStore,
    filter_pattern: Option<&str>,
    limit: usize,
) -> Result<Vec<PageSummary>> {
    validate_limit(limit)?;
    store.ensure_ready()?;

    store.list(filter_pattern, limit)
}

/// Collects archive statistics: filesystem truth for file counts and
/// sizes, index truth for the page count and search mode.
pub fn archive_stats(root: &Path, store: &IndexStore) -> Result<ArchiveStats> {
    store.ensure_ready()?;

    let mut stats = ArchiveStats {
        file_count: 0,
        other_file_count: 0,
        total_size_bytes: 0,
        indexed_page_count: store.page_count()?,
        search_mode: store.mode(),
    };

    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        if crate::index::is_html_file(entry.path()) {
            stats.file_count += 1;
        } else {
            stats.other_file_count += 1;
        }
        if let Ok(metadata) = entry.metadata() {
            stats.total_size_bytes += metadata.len();
        }
    }

    Ok(stats)
}

fn validate_limit(limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(DocdexError::InvalidQuery(
            "limit must be a positive integer".to_string(),
        ));
    }
    Ok(())
}
