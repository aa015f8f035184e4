//! Asset loading with embedded fallbacks
//!
//! Two assets ship inside the binary: the default `config.yaml` and the DMC
//! thread dataset (`data/dmc.json`).
//!
//! - If no external path is configured: use the embedded asset
//! - If an external config path is set but missing: fall back to embedded
//! - If an external thread dataset is set: use it, with no fallback, so a
//!   broken dataset is reported instead of silently replaced

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded thread datasets
#[derive(RustEmbed)]
#[folder = "data/"]
#[include = "*.json"]
struct EmbeddedData;

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
struct EmbeddedConfig;

/// Name of the embedded thread dataset
pub const EMBEDDED_THREADS: &str = "dmc.json";

/// Asset category for selective operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    Config,
    Threads,
}

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Asset loader with optional filesystem overrides
#[derive(Debug, Clone, Default)]
pub struct AssetLoader {
    /// External config file path (from CONFIG_FILE env var)
    config_file: Option<PathBuf>,
    /// External thread dataset (from THREADS_FILE or config)
    threads_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new asset loader
    ///
    /// Paths should be `Some` only if the corresponding setting was given.
    pub fn new(config_file: Option<PathBuf>, threads_file: Option<PathBuf>) -> Self {
        Self {
            config_file,
            threads_file,
        }
    }

    /// Same loader with a different thread dataset location.
    pub fn with_threads_file(mut self, threads_file: Option<PathBuf>) -> Self {
        self.threads_file = threads_file;
        self
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    pub fn threads_file(&self) -> Option<&Path> {
        self.threads_file.as_deref()
    }

    /// Read the config file
    ///
    /// If an external path is configured and exists, uses that.
    /// Otherwise falls back to embedded config.
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading config from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
            tracing::warn!(path = %path.display(), "Config file not found, using embedded config");
        }

        EmbeddedConfig::get("config.yaml")
            .map(|f| {
                tracing::trace!("Loading config from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Embedded config.yaml not found")
            })
    }

    /// Read config as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Read the thread dataset
    pub fn read_threads(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.threads_file {
            tracing::trace!(path = %path.display(), "Loading thread dataset from filesystem");
            return Ok(Cow::Owned(fs::read(path)?));
        }

        EmbeddedData::get(EMBEDDED_THREADS)
            .map(|f| f.data)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Embedded {EMBEDDED_THREADS} not found"),
                )
            })
    }

    /// Human-readable origin of the thread dataset
    pub fn threads_source(&self) -> String {
        match self.threads_file {
            Some(ref path) => path.display().to_string(),
            None => format!("embedded ({EMBEDDED_THREADS})"),
        }
    }

    /// Extract embedded assets next to the configured paths (or into the
    /// working directory)
    pub fn init(&self, categories: &[AssetCategory], force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();

        for category in categories {
            let (path, data) = match category {
                AssetCategory::Config => (
                    self.config_file
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("config.yaml")),
                    EmbeddedConfig::get("config.yaml").map(|f| f.data),
                ),
                AssetCategory::Threads => (
                    self.threads_file
                        .clone()
                        .unwrap_or_else(|| PathBuf::from(EMBEDDED_THREADS)),
                    EmbeddedData::get(EMBEDDED_THREADS).map(|f| f.data),
                ),
            };
            let Some(data) = data else {
                continue;
            };

            if path.exists() && !force {
                report.skipped.push(path.display().to_string());
                continue;
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &*data)?;
            report.written.push(path.display().to_string());
        }

        Ok(report)
    }

    /// List embedded assets by category (for display)
    pub fn list_embedded(category: AssetCategory) -> Vec<String> {
        match category {
            AssetCategory::Config => vec!["config.yaml".to_string()],
            AssetCategory::Threads => EmbeddedData::iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppConfig;

    #[test]
    fn test_embedded_config_matches_defaults() {
        let loader = AssetLoader::default();
        let content = loader.read_config_string().unwrap();
        assert_eq!(AppConfig::from_yaml(&content).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_missing_external_config_falls_back() {
        let loader = AssetLoader::new(Some(PathBuf::from("/nonexistent/config.yaml")), None);
        assert!(loader.read_config_string().unwrap().contains("cache:"));
    }

    #[test]
    fn test_embedded_threads_present() {
        let loader = AssetLoader::default();
        assert!(!loader.read_threads().unwrap().is_empty());
        assert_eq!(
            AssetLoader::list_embedded(AssetCategory::Threads),
            vec![EMBEDDED_THREADS.to_string()]
        );
    }

    #[test]
    fn test_missing_external_threads_is_error() {
        let loader = AssetLoader::new(None, Some(PathBuf::from("/nonexistent/dmc.json")));
        assert!(loader.read_threads().is_err());
        assert_eq!(loader.threads_source(), "/nonexistent/dmc.json");
    }

    #[test]
    fn test_init_writes_and_skips() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("conf/config.yaml");
        let threads = dir.path().join("dmc.json");
        let loader = AssetLoader::new(Some(config.clone()), Some(threads.clone()));

        let report = loader
            .init(&[AssetCategory::Config, AssetCategory::Threads], false)
            .unwrap();
        assert_eq!(report.written.len(), 2);
        assert!(config.exists() && threads.exists());

        let report = loader.init(&[AssetCategory::Config], false).unwrap();
        assert_eq!(report.skipped.len(), 1);

        let report = loader.init(&[AssetCategory::Config], true).unwrap();
        assert_eq!(report.written.len(), 1);
    }
}
