//! Configuration for the log writer

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::logging::{Severity, WriteMode, DEFAULT_BUFFER_CAPACITY, DEFAULT_MAX_FILE_SIZE};

/// Writer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Destination log file (`~` is expanded)
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Where formatted lines go
    #[serde(default)]
    pub mode: WriteMode,

    /// Messages below this level are dropped
    #[serde(default)]
    pub min_severity: Severity,

    /// File size in bytes at which the log is truncated and reseeded (default: 20 MB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// In-memory buffer ceiling in bytes for memory-then-file mode (default: 10 MB)
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,

    /// Version string shown in the banner
    #[serde(default = "default_version")]
    pub version: String,

    /// Collapse memory and console-only modes to file-only (default: true on Windows)
    #[serde(default = "default_force_file_only")]
    pub force_file_only: bool,

    /// Write the banner when a file-backed writer starts
    #[serde(default = "default_banner_on_start")]
    pub banner_on_start: bool,
}

fn default_path() -> PathBuf {
    PathBuf::from("program_log.txt")
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_buffer_capacity() -> usize {
    DEFAULT_BUFFER_CAPACITY
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_force_file_only() -> bool {
    cfg!(windows)
}

fn default_banner_on_start() -> bool {
    true
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            mode: WriteMode::default(),
            min_severity: Severity::default(),
            max_file_size: default_max_file_size(),
            buffer_capacity: default_buffer_capacity(),
            version: default_version(),
            force_file_only: default_force_file_only(),
            banner_on_start: default_banner_on_start(),
        }
    }
}

impl WriterConfig {
    /// Create a default configuration writing to `path`
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file, or return defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from the default location
    pub fn load_default() -> Result<Self> {
        match config_file_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Save configuration as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// The log path with `~` expanded to the home directory
    pub fn expanded_path(&self) -> PathBuf {
        let raw = self.path.to_string_lossy();
        PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
    }

    /// The write mode after applying the file-only policy
    pub fn effective_mode(&self) -> WriteMode {
        self.mode.resolve(self.force_file_only)
    }
}

/// Get the configuration directory (`<config dir>/sololog`)
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sololog"))
}

/// Get the path to the config file
pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = WriterConfig::default();
        assert_eq!(config.path, PathBuf::from("program_log.txt"));
        assert_eq!(config.mode, WriteMode::FileOnly);
        assert_eq!(config.min_severity, Severity::Info);
        assert_eq!(config.max_file_size, 20_000_000);
        assert_eq!(config.buffer_capacity, 10_000_000);
        assert!(config.banner_on_start);
    }

    #[test]
    fn test_config_serialization() {
        let mut config = WriterConfig::with_path("/var/log/app.log");
        config.mode = WriteMode::MemoryThenFile;
        config.min_severity = Severity::Warning;

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: WriterConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = WriterConfig::from_toml(
            r#"
            mode = "console_and_file"
            min_severity = "error"
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, WriteMode::ConsoleAndFile);
        assert_eq!(config.min_severity, Severity::Error);
        assert_eq!(config.path, PathBuf::from("program_log.txt"));
        assert_eq!(config.buffer_capacity, DEFAULT_BUFFER_CAPACITY);
    }

    #[test]
    fn test_invalid_config_is_error() {
        assert!(WriterConfig::from_toml("mode = \"sideways\"").is_err());
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = WriterConfig::load(&temp_dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, WriterConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = WriterConfig::with_path("app.log");
        config.max_file_size = 1024;
        config.save(&path).unwrap();

        let loaded = WriterConfig::load(&path).unwrap();
        assert_eq!(loaded.max_file_size, 1024);
        assert_eq!(loaded.path, PathBuf::from("app.log"));
    }

    #[test]
    fn test_expanded_path_tilde() {
        let config = WriterConfig::with_path("~/app.log");
        let expanded = config.expanded_path();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("app.log"));
        }
    }

    #[test]
    fn test_effective_mode_policy() {
        let mut config = WriterConfig::default();
        config.mode = WriteMode::ConsoleOnly;

        config.force_file_only = true;
        assert_eq!(config.effective_mode(), WriteMode::FileOnly);

        config.force_file_only = false;
        assert_eq!(config.effective_mode(), WriteMode::ConsoleOnly);
    }

    #[test]
    fn test_config_file_path() {
        if let Some(path) = config_file_path() {
            assert!(path.ends_with("sololog/config.toml"));
        }
    }
}
