//! Repository configuration.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use grove_blob::BlobConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings for a [`Repository`](crate::Repository).
///
/// Every key is optional in the TOML form:
///
/// ```toml
/// follow_symlinks = true
/// ignored_dirs = [".grove", "target"]
///
/// [blob]
/// chunk_size = 8192
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    pub blob: BlobConfig,
    /// Stage the targets of symbolic links instead of the links themselves.
    pub follow_symlinks: bool,
    /// Directory names skipped when staging a directory recursively.
    pub ignored_dirs: Vec<String>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            blob: BlobConfig::default(),
            follow_symlinks: false,
            ignored_dirs: vec![".grove".into(), ".git".into()],
        }
    }
}

impl RepositoryConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn is_ignored_dir(&self, name: &OsStr) -> bool {
        self.ignored_dirs.iter().any(|dir| OsStr::new(dir) == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove_blob::TextEncoding;

    #[test]
    fn empty_toml_is_default() {
        let config = RepositoryConfig::from_toml_str("").unwrap();
        assert_eq!(config, RepositoryConfig::default());
        assert!(config.is_ignored_dir(OsStr::new(".grove")));
        assert!(!config.is_ignored_dir(OsStr::new("src")));
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = RepositoryConfig::from_toml_str(
            r#"
            follow_symlinks = true

            [blob]
            chunk_size = 16
            default_encoding = "latin1"
            "#,
        )
        .unwrap();
        assert!(config.follow_symlinks);
        assert_eq!(config.blob.chunk_size, 16);
        assert_eq!(config.blob.binary_sniff_len, 4000);
        assert_eq!(config.blob.default_encoding, TextEncoding::Latin1);
        assert_eq!(config.ignored_dirs, vec![".grove".to_string(), ".git".to_string()]);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grove.toml");
        fs::write(&path, "ignored_dirs = [\"target\"]\n").unwrap();
        let config = RepositoryConfig::load(&path).unwrap();
        assert!(config.is_ignored_dir(OsStr::new("target")));
        assert!(!config.is_ignored_dir(OsStr::new(".git")));
    }

    #[test]
    fn load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = RepositoryConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        let err = RepositoryConfig::from_toml_str("follow_symlinks = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
