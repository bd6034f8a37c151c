use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the index database file placed inside the archive root when no
/// explicit database path is configured. Deleting this file forces a full
/// reindex on the next start.
pub const DEFAULT_DB_FILE: &str = ".archive_index.db";

/// Main configuration structure for docdex
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub index: IndexConfig,
}

/// Archive location configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    /// Root directory of the HTML documentation tree
    pub root: PathBuf,
}

/// Index storage configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexConfig {
    /// Path to the SQLite index file; defaults to `.archive_index.db`
    /// inside the archive root
    #[serde(rename = "database-path")]
    pub database_path: Option<PathBuf>,
}

impl Config {
    /// Builds a default configuration for a bare archive root, with the
    /// index database stored inside the root itself.
    pub fn for_root(root: &Path) -> Self {
        Self {
            archive: ArchiveConfig {
                root: root.to_path_buf(),
            },
            index: IndexConfig::default(),
        }
    }

    /// Resolves the effective database path for this configuration
    pub fn database_path(&self) -> PathBuf {
        self.index
            .database_path
            .clone()
            .unwrap_or_else(|| self.archive.root.join(DEFAULT_DB_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_path_is_inside_root() {
        let config = Config::for_root(Path::new("/tmp/docs"));
        assert_eq!(
            config.database_path(),
            Path::new("/tmp/docs").join(DEFAULT_DB_FILE)
        );
    }

    #[test]
    fn test_explicit_database_path_wins() {
        let mut config = Config::for_root(Path::new("/tmp/docs"));
        config.index.database_path = Some(PathBuf::from("/var/cache/docs.db"));
        assert_eq!(config.database_path(), PathBuf::from("/var/cache/docs.db"));
    }
}
