//! # Store Error Types
//!
//! Error types for persistence operations.
//!
//! ## Error Flow
//! ```text
//! io::Error / serde_json::Error
//!      │
//!      ▼
//! StoreError (this module) ← adds the storage key / path context
//!      │
//!      ▼
//! RegisterError (service crate) ← serialized for the embedding UI
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Persistence operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed (create, read, write, rename, remove).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be encoded to JSON for the given key.
    #[error("Failed to encode '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A stored document could not be decoded for the given key.
    ///
    /// Raised when a document on disk is corrupt or from an incompatible
    /// version.
    #[error("Failed to decode '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Entity not found in a stored collection.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
}

impl StoreError {
    /// Creates an Io error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Result type for persistence operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
