//! Caller-facing operation surface
//!
//! Thin wrappers around the core components that render results as
//! human-readable strings for an external tool-invocation layer. Errors are
//! rendered into the returned string; nothing propagates across this
//! boundary as a fault.

use crate::storage::IndexStore;
use crate::{archive, extract, links, search, DocdexError};
use std::path::Path;

/// Logs a failed operation and renders it for the caller
fn render_error(operation: &str, e: &DocdexError) -> String {
    tracing::warn!("{} failed: {}", operation, e);
    format!("Error: {}", e)
}

/// Searches page titles and content, rendering ranked results with snippets
pub fn search_archive(store: &IndexStore, query: &str, limit: usize) -> String {
    let hits = match search::search(store, query, limit) {
        Ok(hits) => hits,
        Err(e) => return render_error("search_archive", &e),
    };

    if hits.is_empty() {
        return format!("No results found for query: '{}'", query);
    }

    let mut response = format!("Found {} results for '{}':\n\n", hits.len(), query);
    for (i, hit) in hits.iter().enumerate() {
        response.push_str(&format!("{}. **{}**\n", i + 1, hit.title));
        response.push_str(&format!("   Path: {}\n", hit.path));
        response.push_str(&format!("   Snippet: {}\n\n", hit.snippet));
    }

    response
}

/// Retrieves one page: title, size, and extracted text, plus the raw HTML
/// when `include_raw` is set
pub fn get_page(root: &Path, store: &IndexStore, path: &str, include_raw: bool) -> String {
    if let Err(e) = store.ensure_ready() {
        return render_error("get_page", &e);
    }

    let absolute = match archive::resolve(root, path) {
        Ok(absolute) => absolute,
        Err(e) => return render_error("get_page", &e),
    };

    if !absolute.is_file() {
        return format!("Error: File '{}' not found in archive", path);
    }

    let bytes = match std::fs::read(&absolute) {
        Ok(bytes) => bytes,
        Err(e) => return format!("Error reading file '{}': {}", path, e),
    };
    let html = String::from_utf8_lossy(&bytes);
    let extraction = extract::extract(&html);

    let title = extraction.title.unwrap_or_else(|| {
        absolute
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("untitled")
            .to_string()
    });

    let mut response = format!("# {}\n\n", title);
    response.push_str(&format!("**Path:** {}\n", path));
    response.push_str(&format!("**File size:** {} bytes\n\n", bytes.len()));
    response.push_str(&format!("**Content:**\n{}", extraction.text));

    if include_raw {
        response.push_str(&format!("\n\n**Raw HTML:**\n```html\n{}\n```", html));
    }

    response
}

/// Lists indexed pages, optionally narrowed by a glob pattern on the path
pub fn list_pages(store: &IndexStore, filter_pattern: Option<&str>, limit: usize) -> String {
    let pages = match search::list_pages(store, filter_pattern, limit) {
        Ok(pages) => pages,
        Err(e) => return render_error("list_pages", &e),
    };

    if pages.is_empty() {
        return "No pages found in archive".to_string();
    }

    let mut response = format!("Archive contains {} pages", pages.len());
    if let Some(pattern) = filter_pattern {
        response.push_str(&format!(" matching '{}'", pattern));
    }
    response.push_str(":\n\n");

    for page in &pages {
        response.push_str(&format!("• **{}**\n  Path: {}\n\n", page.title, page.path));
    }

    response
}

/// Extracts and classifies the links of one page
pub fn extract_links(root: &Path, store: &IndexStore, path: &str, internal_only: bool) -> String {
    let records = match links::explore_links(root, store, path, internal_only) {
        Ok(records) => records,
        Err(e) => return render_error("extract_links", &e),
    };

    let qualifier = if internal_only { "internal " } else { "" };

    if records.is_empty() {
        return format!("No {}links found in '{}'", qualifier, path);
    }

    let mut response = format!(
        "Found {} {}links in '{}':\n\n",
        records.len(),
        qualifier,
        path
    );

    for record in &records {
        if !record.is_internal {
            response.push_str(&format!("• {} (external)\n", record.href));
        } else {
            match &record.resolved_path {
                Some(resolved) => {
                    let status = if record.exists { "indexed" } else { "not indexed" };
                    response.push_str(&format!("• {} -> {} ({})\n", record.href, resolved, status));
                }
                None => {
                    response.push_str(&format!("• {} -> (unresolvable)\n", record.href));
                }
            }
        }
    }

    response
}

/// Renders aggregate archive statistics
pub fn get_archive_stats(root: &Path, store: &IndexStore) -> String {
    let stats = match search::archive_stats(root, store) {
        Ok(stats) => stats,
        Err(e) => return render_error("get_archive_stats", &e),
    };

    let total_mb = stats.total_size_bytes as f64 / (1024.0 * 1024.0);

    let mut response = String::from("# Archive Statistics\n\n");
    response.push_str(&format!("**Archive Path:** {}\n", root.display()));
    response.push_str(&format!("**HTML Pages:** {}\n", stats.file_count));
    response.push_str(&format!("**Other Files:** {}\n", stats.other_file_count));
    response.push_str(&format!(
        "**Total Files:** {}\n",
        stats.file_count + stats.other_file_count
    ));
    response.push_str(&format!(
        "**Indexed Pages:** {}\n",
        stats.indexed_page_count
    ));
    response.push_str(&format!("**Total Size:** {:.1} MB\n", total_mb));
    response.push_str(&format!("**Search Mode:** {}\n", stats.search_mode));

    response
}
