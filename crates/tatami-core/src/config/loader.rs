//! Configuration file discovery and loading

use super::format_config::FormatOverrides;
use crate::error::TatamiError;
use crate::result::Result;
use std::path::{Path, PathBuf};

/// Config file names searched during auto-discovery, in priority order
const CONFIG_FILE_NAMES: &[&str] = &["tatami.json", ".tatamirc.json"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by traversing upward from `start_path`
    ///
    /// Searches for `tatami.json` or `.tatamirc.json` starting from the
    /// given directory and moving up the directory tree until a config is
    /// found or the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| TatamiError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Load configuration overrides from a specific JSON file
    pub fn load_from_file(path: &Path) -> Result<FormatOverrides> {
        let content = std::fs::read_to_string(path).map_err(|e| TatamiError::io_error(path, e))?;
        serde_json::from_str(&content).map_err(|e| {
            TatamiError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load overrides from an explicit path or auto-discover from a directory
    ///
    /// If a custom path is provided, loads from that path (and errors if it
    /// does not exist). Otherwise attempts auto-discovery starting from
    /// `start_dir` (or the current directory) and falls back to an empty
    /// overrides record.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<FormatOverrides> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(TatamiError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(discovered) => Self::load_from_file(&discovered),
            None => Ok(FormatOverrides::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tatami.json");
        fs::write(&path, r#"{ "indentation": { "size": 4 } }"#).unwrap();

        let overrides = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(overrides.indentation.unwrap().size, Some(4));
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tatami.json");
        fs::write(&path, "{ not json").unwrap();

        let result = ConfigLoader::load_from_file(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_auto_discover_walks_up() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("tatami.json"), "{}").unwrap();
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        let found = ConfigLoader::auto_discover(&nested).unwrap();
        assert!(found.is_some());
        assert!(found.unwrap().ends_with("tatami.json"));
    }

    #[test]
    fn test_load_missing_custom_path_errors() {
        let result = ConfigLoader::load(Some(Path::new("/nonexistent/tatami.json")), None);
        assert!(result.is_err());
    }
}
