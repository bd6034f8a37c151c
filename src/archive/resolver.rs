use crate::{DocdexError, Result};
use std::path::{Component, Path, PathBuf};

/// Resolves a caller-supplied path against the archive root.
///
/// Candidates are interpreted in order:
/// 1. An absolute path is used verbatim.
/// 2. A path whose first segment equals the root directory's own name is
///    joined onto the root's parent. This mirrors callers that include the
///    archive directory name in the path; a file that legitimately sits in
///    a subdirectory named like the root cannot be addressed with that
///    prefix and must be reached through another path form.
/// 3. Anything else is joined onto the root.
///
/// The result is normalized (`.`/`..` collapsed, symlinks resolved when the
/// path exists) and must stay within the root.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Absolute, normalized path inside the root
/// * `Err(DocdexError::PathSecurity)` - Normalized path escapes the root
pub fn resolve(root: &Path, candidate: &str) -> Result<PathBuf> {
    let root = root.canonicalize()?;
    let candidate = Path::new(candidate);

    let joined = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else if starts_with_root_name(&root, candidate) {
        match root.parent() {
            Some(parent) => parent.join(candidate),
            None => root.join(candidate),
        }
    } else {
        root.join(candidate)
    };

    // Symlinks can only be chased for paths that exist; everything else is
    // normalized lexically so that link targets and probes for missing
    // files still get a containment verdict.
    let normalized = match joined.canonicalize() {
        Ok(path) => path,
        Err(_) => normalize_lexically(&joined),
    };

    if normalized.starts_with(&root) {
        Ok(normalized)
    } else {
        Err(DocdexError::PathSecurity)
    }
}

/// Converts an absolute in-root path to its POSIX-style form relative to
/// the root, the shape page paths take throughout the index.
pub fn relative_to_root(root: &Path, absolute: &Path) -> Result<String> {
    let root = root.canonicalize()?;
    let relative = absolute
        .strip_prefix(&root)
        .map_err(|_| DocdexError::PathSecurity)?;

    let segments: Vec<&str> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();

    Ok(segments.join("/"))
}

/// Checks whether the candidate's first segment names the root directory
fn starts_with_root_name(root: &Path, candidate: &Path) -> bool {
    let root_name = match root.file_name() {
        Some(name) => name,
        None => return false,
    };

    matches!(
        candidate.components().next(),
        Some(Component::Normal(first)) if first == root_name
    )
}

/// Collapses `.` and `..` segments without touching the filesystem.
///
/// A `..` that would climb past the start of the path is kept, which makes
/// the subsequent containment check fail as it should.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    normalized.pop();
                } else {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}
