//! # Error Types
//!
//! Errors raised while decoding bucket documents.

use thiserror::Error;

/// Errors that can occur while reading or writing `meta.json` and markers.
#[derive(Debug, Error)]
pub enum MetaError {
    /// Document is not valid JSON for the expected shape.
    #[error("decode document: {0}")]
    Decode(#[from] serde_json::Error),

    /// Document uses a format version this workspace does not understand.
    #[error("unexpected meta file version {0}")]
    UnsupportedVersion(u32),
}
