pub mod config;

pub use config::{AppConfig, BlueprintDefaults, CacheConfig, LimitsConfig, ThreadsConfig};
