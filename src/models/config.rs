use crate::assets::AssetLoader;
use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub blueprint: BlueprintDefaults,

    #[serde(default)]
    pub threads: ThreadsConfig,

    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Decoded-image cache settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CacheConfig {
    /// Maximum number of decoded images kept in memory
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Longest side images are shrunk to on registration
    #[serde(default = "default_max_dimension")]
    pub max_dimension: usize,
}

fn default_capacity() -> usize {
    32
}

fn default_max_dimension() -> usize {
    512
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            max_dimension: default_max_dimension(),
        }
    }
}

/// Values used when a request leaves a blueprint option out
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BlueprintDefaults {
    #[serde(default = "default_palette_size")]
    pub palette_size: usize,

    #[serde(default = "default_seed")]
    pub seed: i64,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    #[serde(default = "default_min_region_area")]
    pub min_region_area: usize,

    #[serde(default = "default_true")]
    pub merge_small_regions: bool,

    #[serde(default = "default_simplify_epsilon")]
    pub simplify_epsilon: f64,

    #[serde(default = "default_true")]
    pub include_preview: bool,
}

fn default_palette_size() -> usize {
    12
}

fn default_seed() -> i64 {
    42
}

fn default_max_iterations() -> usize {
    20
}

fn default_min_region_area() -> usize {
    20
}

fn default_true() -> bool {
    true
}

fn default_simplify_epsilon() -> f64 {
    1.0
}

impl Default for BlueprintDefaults {
    fn default() -> Self {
        Self {
            palette_size: default_palette_size(),
            seed: default_seed(),
            max_iterations: default_max_iterations(),
            min_region_area: default_min_region_area(),
            merge_small_regions: true,
            simplify_epsilon: default_simplify_epsilon(),
            include_preview: true,
        }
    }
}

/// Thread dataset location
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ThreadsConfig {
    /// External dataset replacing the embedded one
    #[serde(default)]
    pub dataset: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LimitsConfig {
    /// Largest accepted request body (base64 images included)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        cache_capacity = config.cache.capacity,
                        max_dimension = config.cache.max_dimension,
                        palette_size = config.blueprint.palette_size,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // an empty file deserializes to unit, not to an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Dataset path, with `THREADS_FILE`-style overrides taking precedence.
    pub fn threads_dataset(&self, override_path: Option<PathBuf>) -> Option<PathBuf> {
        override_path.or_else(|| self.threads.dataset.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.cache.capacity, 32);
        assert_eq!(config.cache.max_dimension, 512);
        assert_eq!(config.blueprint.palette_size, 12);
        assert_eq!(config.blueprint.seed, 42);
        assert_eq!(config.blueprint.max_iterations, 20);
        assert_eq!(config.blueprint.min_region_area, 20);
        assert!(config.blueprint.merge_small_regions);
        assert_eq!(config.blueprint.simplify_epsilon, 1.0);
        assert!(config.blueprint.include_preview);
        assert!(config.threads.dataset.is_none());
        assert_eq!(config.limits.max_upload_bytes, 16 * 1024 * 1024);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml(
            r#"
cache:
  capacity: 4
blueprint:
  palette_size: 6
  merge_small_regions: false
"#,
        )
        .unwrap();

        assert_eq!(config.cache.capacity, 4);
        assert_eq!(config.cache.max_dimension, 512);
        assert_eq!(config.blueprint.palette_size, 6);
        assert!(!config.blueprint.merge_small_regions);
        assert_eq!(config.blueprint.seed, 42);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(AppConfig::from_yaml("").unwrap(), AppConfig::default());
        assert_eq!(AppConfig::from_yaml("  \n").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_threads_dataset_override() {
        let config = AppConfig::from_yaml("threads:\n  dataset: /srv/dmc.json\n").unwrap();
        assert_eq!(
            config.threads_dataset(None),
            Some(PathBuf::from("/srv/dmc.json"))
        );
        assert_eq!(
            config.threads_dataset(Some(PathBuf::from("/tmp/other.json"))),
            Some(PathBuf::from("/tmp/other.json"))
        );
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(AppConfig::from_yaml("cache: [1, 2").is_err());
        assert!(AppConfig::from_yaml("cache:\n  capacity: lots\n").is_err());
    }
}
