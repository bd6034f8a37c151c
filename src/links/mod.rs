//! Link exploration
//!
//! Classifies the outbound links of one archived page as internal or
//! external. Internal targets are resolved against the containing page's
//! directory and validated against the index store, which is the source of
//! truth for existence; nothing here consults the filesystem for targets.

use crate::archive;
use crate::extract;
use crate::storage::IndexStore;
use crate::{DocdexError, Result};
use std::path::Path;
use url::Url;

/// One classified outbound link
#[derive(Debug, Clone)]
pub struct LinkRecord {
    /// Raw href attribute value as it appears in the document
    pub href: String,

    /// Root-relative target path; `None` for external or unresolvable links
    pub resolved_path: Option<String>,

    pub is_internal: bool,

    /// Whether the target is an indexed page; only meaningful when internal
    pub exists: bool,
}

/// Extracts and classifies all links of the page at `page_path`.
///
/// Document order and duplicates are preserved. With `internal_only`,
/// external links (scheme-based, fragment-only, and empty references) are
/// omitted from the result entirely.
///
/// # Errors
///
/// * `PathSecurity` - `page_path` escapes the archive root
/// * `PathNotFound` - the page file does not exist
pub fn explore_links(
    root: &Path,
    store: &IndexStore,
    page_path: &str,
    internal_only: bool,
) -> Result<Vec<LinkRecord>> {
    let absolute = archive::resolve(root, page_path)?;
    if !absolute.is_file() {
        return Err(DocdexError::PathNotFound {
            path: page_path.to_string(),
        });
    }

    let bytes = std::fs::read(&absolute)?;
    let html = String::from_utf8_lossy(&bytes);
    let hrefs = extract::extract_hrefs(&html);

    let page_relative = archive::relative_to_root(root, &absolute)?;
    let page_dir = match page_relative.rfind('/') {
        Some(index) => &page_relative[..index],
        None => "",
    };

    let mut records = Vec::with_capacity(hrefs.len());
    for href in hrefs {
        let record = classify(root, store, page_dir, &href)?;
        if internal_only && !record.is_internal {
            continue;
        }
        records.push(record);
    }

    Ok(records)
}

/// Classifies one href and resolves it when internal
fn classify(root: &Path, store: &IndexStore, page_dir: &str, href: &str) -> Result<LinkRecord> {
    // Absolute URLs (https://..., mailto:, javascript:, ...) all carry a
    // scheme and parse on their own; nothing with a scheme can name a page
    // inside the archive.
    if Url::parse(href).is_ok() {
        return Ok(external(href));
    }

    // Fragments and query strings address content within a target, not the
    // target itself.
    let base = href.split(|c| c == '#' || c == '?').next().unwrap_or("");
    if base.is_empty() {
        return Ok(external(href));
    }

    // A leading slash means root-absolute within the archive; anything else
    // is relative to the page's own directory.
    let candidate = if let Some(stripped) = base.strip_prefix('/') {
        stripped.to_string()
    } else if page_dir.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", page_dir, base)
    };

    match archive::resolve(root, &candidate) {
        Ok(target) => {
            let resolved = archive::relative_to_root(root, &target)?;
            let exists = store.contains_path(&resolved)?;
            Ok(LinkRecord {
                href: href.to_string(),
                resolved_path: Some(resolved),
                is_internal: true,
                exists,
            })
        }
        Err(DocdexError::PathSecurity) => Ok(LinkRecord {
            href: href.to_string(),
            resolved_path: None,
            is_internal: true,
            exists: false,
        }),
        Err(e) => Err(e),
    }
}

fn external(href: &str) -> LinkRecord {
    LinkRecord {
        href: href.to_string(),
        resolved_path: None,
        is_internal: false,
        exists: false,
    }
}
