//! # Store Management
//!
//! Document store creation, configuration, and the storage key layout.
//!
//! Each storage key maps to one JSON file under the store root. Documents
//! are replaced whole on every write: the new content goes to a temporary
//! file first and is renamed over the old document, so readers never see a
//! half-written file.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::repository::movement::MovementRepository;
use crate::repository::product::ProductRepository;
use crate::repository::session::SessionRepository;

// =============================================================================
// Storage Keys
// =============================================================================

/// Product directory: array of Product.
pub const KEY_PRODUCTS: &str = "products";

/// Stock ledger: array of StockMovement, oldest first.
pub const KEY_STOCK_MOVEMENTS: &str = "stock_movements";

/// Session history: array of closed CashRegisterSession.
pub const KEY_SESSIONS: &str = "pos_sessions";

/// The single active session, if any. The key is removed entirely when the
/// session closes.
pub const KEY_ACTIVE_SESSION: &str = "pos_session";

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("/path/to/data").create_if_missing(true);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the JSON documents.
    pub root: PathBuf,

    /// Whether to create the directory if it doesn't exist.
    /// Default: true
    pub create_if_missing: bool,
}

impl StoreConfig {
    /// Creates a new store configuration with the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        StoreConfig {
            root: root.into(),
            create_if_missing: true,
        }
    }

    /// Sets whether a missing root directory is created on open.
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }
}

// =============================================================================
// Store
// =============================================================================

/// Main store handle providing repository access.
///
/// Cloning is cheap; clones share the same root directory.
///
/// ## Usage
/// ```rust,ignore
/// let store = Store::open(StoreConfig::new("./data"))?;
/// let products = store.products().load()?;
/// let history = store.sessions().history()?;
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Opens a store over the configured root directory.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        info!(root = %config.root.display(), "Opening store");

        if config.create_if_missing {
            fs::create_dir_all(&config.root).map_err(|e| StoreError::io(&config.root, e))?;
        }

        Ok(Store { root: config.root })
    }

    /// Returns the store root directory.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Returns the product repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.clone())
    }

    /// Returns the stock movement repository.
    pub fn movements(&self) -> MovementRepository {
        MovementRepository::new(self.clone())
    }

    /// Returns the session repository.
    pub fn sessions(&self) -> SessionRepository {
        SessionRepository::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Document access (used by the repositories)
    // -------------------------------------------------------------------------

    /// Reads and decodes the document stored under `key`.
    ///
    /// A missing document reads as `None`.
    pub(crate) fn read<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let path = self.path_for(key);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(key = %key, "Document absent");
                return Ok(None);
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        let value = serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode {
            key: key.to_string(),
            source: e,
        })?;
        Ok(Some(value))
    }

    /// Encodes `value` and replaces the document stored under `key`.
    pub(crate) fn write<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let path = self.path_for(key);
        let tmp = self.root.join(format!("{}.json.tmp", key));

        let bytes = serde_json::to_vec_pretty(value).map_err(|e| StoreError::Encode {
            key: key.to_string(),
            source: e,
        })?;

        // Replacement is atomic: temp file first, then rename over the old
        // document.
        fs::write(&tmp, bytes).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::io(&path, e))?;

        debug!(key = %key, "Document written");
        Ok(())
    }

    /// Removes the document stored under `key`. Removing an absent
    /// document is not an error.
    pub(crate) fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key);

        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(key = %key, "Document removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    /// Whether a document exists under `key`.
    pub(crate) fn exists(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
