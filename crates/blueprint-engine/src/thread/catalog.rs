//! The loaded DMC thread table.

use crate::color::{Lab, Srgb};
use crate::error::EngineError;

/// One thread color from the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DmcThread {
    pub id: String,
    pub name: String,
    /// Uppercase `#RRGGBB`.
    pub hex: String,
    pub rgb: Srgb,
    pub lab: Lab,
}

impl DmcThread {
    /// Build an entry from its dataset fields, parsing `hex`.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidInput`] when `hex` is not a 6-digit color.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        hex: &str,
    ) -> Result<Self, EngineError> {
        let rgb: Srgb = hex.parse()?;
        Ok(Self {
            id: id.into(),
            name: name.into(),
            hex: rgb.to_hex(),
            rgb,
            lab: Lab::from(rgb),
        })
    }
}

/// Immutable, non-empty list of threads in dataset order.
#[derive(Debug, Clone)]
pub struct ThreadCatalog {
    threads: Vec<DmcThread>,
}

impl ThreadCatalog {
    /// # Errors
    ///
    /// [`EngineError::DatasetUnavailable`] when `threads` is empty.
    pub fn new(threads: Vec<DmcThread>) -> Result<Self, EngineError> {
        if threads.is_empty() {
            return Err(EngineError::DatasetUnavailable(
                "thread dataset contains no entries".to_string(),
            ));
        }
        Ok(Self { threads })
    }

    /// Build from raw `(id, name, hex)` triples.
    ///
    /// A malformed hex anywhere makes the whole dataset unusable.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = (S, S, S)>,
        S: AsRef<str>,
    {
        let threads = entries
            .into_iter()
            .map(|(id, name, hex)| {
                DmcThread::new(id.as_ref(), name.as_ref(), hex.as_ref()).map_err(|e| {
                    EngineError::DatasetUnavailable(format!("thread {}: {e}", id.as_ref()))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(threads)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    pub fn threads(&self) -> &[DmcThread] {
        &self.threads
    }

    pub fn get(&self, id: &str) -> Option<&DmcThread> {
        self.threads.iter().find(|t| t.id == id)
    }
}
