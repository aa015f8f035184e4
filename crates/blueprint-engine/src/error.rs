//! Unified error type for the blueprint engine.
//!
//! Every fallible engine operation returns [`EngineError`]. Conditions that
//! can only arise from a bug inside the pipeline (an empty label map, a
//! zero-pixel sampling window) are not represented here; they panic.

use thiserror::Error;

/// Errors surfaced by engine operations.
///
/// The variants separate "bad request" ([`InvalidInput`](Self::InvalidInput))
/// from "bad payload" ([`DecodeFailure`](Self::DecodeFailure)) so callers can
/// report them differently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Out-of-range coordinates, malformed hex, missing fields, bad sizes.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Image bytes could not be decoded.
    #[error("decode failure: {0}")]
    DecodeFailure(String),

    /// Unknown session id or cache entry.
    #[error("not found: {0}")]
    NotFound(String),

    /// Thread dataset missing, unreadable or empty.
    #[error("thread dataset unavailable: {0}")]
    DatasetUnavailable(String),
}

impl EngineError {
    /// Short machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidInput(_) => "invalid_input",
            EngineError::DecodeFailure(_) => "decode_failure",
            EngineError::NotFound(_) => "not_found",
            EngineError::DatasetUnavailable(_) => "dataset_unavailable",
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        EngineError::InvalidInput(message.into())
    }
}
