//! Configuration types for the license header check.
//!
//! Split into the check config (what to enforce) and source-specific config
//! (how files are discovered). This keeps the adapter free of filesystem
//! concerns: it only ever sees `FileRecord`s.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Options for a single `LicenseCheck` instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[non_exhaustive]
pub struct LicenseCheckConfig {
    /// Path to the header template. Required; read exactly once at construction.
    pub path: PathBuf,
    /// Treat a missing header as an error (default: off).
    #[serde(default)]
    pub blocking: bool,
    /// Emit one `HeaderEvent` per checked file (default: off).
    #[serde(default)]
    pub log: bool,
}

impl LicenseCheckConfig {
    /// Non-blocking, non-logging config for the given header template.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            blocking: false,
            log: false,
        }
    }

    /// Load a config from a `.json`, `.yaml` or `.yml` file.
    ///
    /// A relative `path` inside the file is resolved against the directory
    /// containing the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unsupported
    /// extension, or does not deserialize into a `LicenseCheckConfig`.
    pub fn from_file(config_path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;

        let mut config: Self = match config_path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content).with_context(|| {
                format!("Invalid JSON in config file {}", config_path.display())
            })?,
            Some("yaml" | "yml") => serde_saphyr::from_str(&content).map_err(|e| {
                anyhow::anyhow!("Invalid YAML in config file {}: {e}", config_path.display())
            })?,
            _ => anyhow::bail!(
                "Unsupported config file format (expected .json, .yaml or .yml): {}",
                config_path.display()
            ),
        };

        if config.path.is_relative()
            && let Some(parent) = config_path.parent()
        {
            config.path = parent.join(&config.path);
        }

        Ok(config)
    }
}

/// How file contents are handed to the check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ContentMode {
    /// Read each file fully into memory (default).
    #[default]
    Buffer,
    /// Hand each file over as an open reader.
    Stream,
}

/// Filesystem-specific source options.
///
/// `patterns` is required and must be non-empty. Each entry is a file, a
/// directory (walked recursively) or a glob pattern.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct FsSourceConfig {
    /// Files, directories or glob patterns to check.
    pub patterns: Vec<String>,
    /// Exclude patterns (glob format), matched against the path or the file name.
    pub exclude: Vec<String>,
    /// Representation of the contents handed to the check.
    pub mode: ContentMode,
    /// Maximum file size in bytes for buffered reads (default: 10 MB).
    pub max_file_size: u64,
    /// Whether to follow symbolic links while walking directories.
    ///
    /// **Defaults to `false`**: following symlinks allows escaping the
    /// directory being checked.
    pub follow_links: bool,
    /// Maximum directory traversal depth (default: 64).
    pub max_depth: usize,
}

impl Default for FsSourceConfig {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            exclude: Vec::new(),
            mode: ContentMode::Buffer,
            max_file_size: 10_485_760,
            follow_links: false,
            max_depth: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_defaults_flags_off() {
        let config = LicenseCheckConfig::new("header.txt");
        assert_eq!(config.path, PathBuf::from("header.txt"));
        assert!(!config.blocking);
        assert!(!config.log);
    }

    #[test]
    fn test_from_json_file_defaults_missing_flags() {
        let tmp = TempDir::new().unwrap();
        let cfg = tmp.path().join("license.json");
        std::fs::write(&cfg, r#"{"path": "header.txt", "log": true}"#).unwrap();

        let config = LicenseCheckConfig::from_file(&cfg).unwrap();
        assert_eq!(config.path, tmp.path().join("header.txt"));
        assert!(config.log);
        assert!(!config.blocking);
    }

    #[test]
    fn test_from_yaml_file_keeps_absolute_path() {
        let tmp = TempDir::new().unwrap();
        let header = tmp.path().join("header.txt");
        let cfg = tmp.path().join("license.yaml");
        std::fs::write(
            &cfg,
            format!("path: {}\nblocking: true\n", header.display()),
        )
        .unwrap();

        let config = LicenseCheckConfig::from_file(&cfg).unwrap();
        assert_eq!(config.path, header);
        assert!(config.blocking);
        assert!(!config.log);
    }

    #[test]
    fn test_from_file_rejects_unknown_extension() {
        let tmp = TempDir::new().unwrap();
        let cfg = tmp.path().join("license.toml");
        std::fs::write(&cfg, "path = \"header.txt\"\n").unwrap();

        let err = LicenseCheckConfig::from_file(&cfg).unwrap_err().to_string();
        assert!(err.contains("Unsupported config file format"), "got: {err}");
    }

    #[test]
    fn test_from_file_requires_path() {
        let tmp = TempDir::new().unwrap();
        let cfg = tmp.path().join("license.json");
        std::fs::write(&cfg, r#"{"blocking": true}"#).unwrap();

        assert!(LicenseCheckConfig::from_file(&cfg).is_err());
    }

    #[test]
    fn test_fs_source_defaults() {
        let config = FsSourceConfig::default();
        assert!(config.patterns.is_empty());
        assert_eq!(config.mode, ContentMode::Buffer);
        assert_eq!(config.max_file_size, 10_485_760);
        assert!(!config.follow_links);
        assert_eq!(config.max_depth, 64);
    }
}
