//! Thread dataset loading.
//!
//! The dataset is a JSON array of `{"id", "name", "hex"}` records, embedded
//! in the binary and optionally replaced by an external file.

use blueprint_engine::{EngineError, ThreadCatalog};
use serde::Deserialize;
use thiserror::Error;

use crate::assets::AssetLoader;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read thread dataset: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse thread dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid thread dataset: {0}")]
    Invalid(#[from] EngineError),
}

#[derive(Debug, Deserialize)]
struct ThreadRecord {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    name: String,
    hex: String,
}

/// Some published DMC tables store numeric ids as JSON numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

/// Parse a JSON dataset into a catalog, keeping file order.
pub fn parse_catalog(bytes: &[u8]) -> Result<ThreadCatalog, DatasetError> {
    let records: Vec<ThreadRecord> = serde_json::from_slice(bytes)?;
    let catalog = ThreadCatalog::from_entries(records.into_iter().map(|r| (r.id, r.name, r.hex)))?;
    Ok(catalog)
}

/// Load the dataset named by `loader`.
///
/// Failures are logged and yield `None`: the server still starts, and
/// thread matching reports the dataset as unavailable.
pub fn load_catalog(loader: &AssetLoader) -> Option<ThreadCatalog> {
    let source = loader.threads_source();
    let result = loader
        .read_threads()
        .map_err(DatasetError::from)
        .and_then(|bytes| parse_catalog(&bytes));

    match result {
        Ok(catalog) => {
            tracing::info!(source = %source, threads = catalog.len(), "Loaded thread dataset");
            Some(catalog)
        }
        Err(e) => {
            tracing::warn!(source = %source, error = %e, "Thread dataset unavailable");
            None
        }
    }
}
