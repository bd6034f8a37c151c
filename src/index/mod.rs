//! Archive indexer
//!
//! Walks the document root once, extracts every HTML page, and populates
//! the index store. Building is idempotent: a populated store is left
//! untouched unless a rebuild is forced.

use crate::archive;
use crate::extract;
use crate::storage::IndexStore;
use crate::Result;
use std::path::Path;
use walkdir::WalkDir;

/// File extensions treated as HTML pages during the walk
pub const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

/// Counts reported by an index build
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexOutcome {
    /// Pages successfully extracted and stored
    pub indexed: u64,

    /// Files that failed to read or extract and were skipped
    pub skipped: u64,
}

/// Populates the store from the HTML tree under `root`.
///
/// * Already populated and `force` is false: no-op.
/// * `force`: all existing page records (and the derived search structure)
///   are dropped before rebuilding.
///
/// Files that fail to read are logged and skipped; they never abort the
/// walk. After population the derived search index is rebuilt where the
/// engine supports it.
pub fn build_index(root: &Path, store: &mut IndexStore, force: bool) -> Result<IndexOutcome> {
    let existing = store.page_count()?;
    if existing > 0 && !force {
        tracing::info!(
            "index already contains {} pages, skipping rebuild",
            existing
        );
        store.mark_ready();
        return Ok(IndexOutcome::default());
    }

    if force {
        tracing::info!("force rebuild requested, clearing {} pages", existing);
        store.clear()?;
    }

    let root = root.canonicalize()?;
    tracing::info!("building search index from {}", root.display());

    let mut outcome = IndexOutcome::default();

    for entry in WalkDir::new(&root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("failed to walk archive entry: {}", e);
                outcome.skipped += 1;
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_html_file(entry.path()) {
            continue;
        }

        match index_file(&root, entry.path(), store) {
            Ok(()) => outcome.indexed += 1,
            Err(e) => {
                tracing::warn!("failed to index {}: {}", entry.path().display(), e);
                outcome.skipped += 1;
            }
        }
    }

    store.rebuild_search_index()?;
    store.mark_ready();

    tracing::info!(
        "search index built: {} pages indexed, {} skipped",
        outcome.indexed,
        outcome.skipped
    );

    Ok(outcome)
}

/// Whether the path's extension identifies it as an HTML page
pub(crate) fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            HTML_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Extracts and stores a single HTML file
fn index_file(root: &Path, file: &Path, store: &mut IndexStore) -> Result<()> {
    let relative = archive::relative_to_root(root, file)?;

    let bytes = std::fs::read(file)?;
    let html = String::from_utf8_lossy(&bytes);

    let extraction = extract::extract(&html);
    if extraction.lossy {
        tracing::debug!("{}: parsed with recovery, text is best-effort", relative);
    }

    let title = extraction.title.unwrap_or_else(|| {
        file.file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("untitled")
            .to_string()
    });

    store.upsert_page(&relative, &title, &extraction.text, bytes.len() as u64)
}
