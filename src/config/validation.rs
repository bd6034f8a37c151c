use crate::config::types::Config;
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_archive(config)?;
    validate_index(config)?;
    Ok(())
}

/// Validates the archive section
fn validate_archive(config: &Config) -> Result<(), ConfigError> {
    let root = &config.archive.root;

    if root.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "archive root cannot be empty".to_string(),
        ));
    }

    if !root.exists() {
        return Err(ConfigError::Validation(format!(
            "archive root does not exist: {}",
            root.display()
        )));
    }

    if !root.is_dir() {
        return Err(ConfigError::Validation(format!(
            "archive root is not a directory: {}",
            root.display()
        )));
    }

    Ok(())
}

/// Validates the index section
fn validate_index(config: &Config) -> Result<(), ConfigError> {
    if let Some(db_path) = &config.index.database_path {
        if db_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "database-path cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_valid_config_passes() {
        let root = TempDir::new().unwrap();
        let config = Config::for_root(root.path());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_missing_root_rejected() {
        let config = Config::for_root(std::path::Path::new("/no/such/dir"));
        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_file_root_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = Config::for_root(file.path());
        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_empty_database_path_rejected() {
        let root = TempDir::new().unwrap();
        let mut config = Config::for_root(root.path());
        config.index.database_path = Some(PathBuf::new());
        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
