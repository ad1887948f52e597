//! # till-store: Persistence Layer for Till POS
//!
//! Local key-value persistence: one JSON document per storage key,
//! written whole on every save.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Till POS Data Flow                          │
//! │                                                                 │
//! │  Register service operation (confirm_sale, close_session, ...)  │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │                  till-store (THIS CRATE)                  │  │
//! │  │                                                           │  │
//! │  │   ┌─────────────┐        ┌────────────────────────────┐   │  │
//! │  │   │    Store    │        │        Repositories        │   │  │
//! │  │   │ (store.rs)  │◄───────│  ProductRepository         │   │  │
//! │  │   │             │        │  MovementRepository        │   │  │
//! │  │   │ read/write/ │        │  SessionRepository         │   │  │
//! │  │   │ remove docs │        └────────────────────────────┘   │  │
//! │  │   └─────────────┘                                         │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │  <data dir>/products.json, stock_movements.json,          │  │
//! │  │  pos_sessions.json, pos_session.json                      │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use till_store::{Store, StoreConfig};
//!
//! let store = Store::open(StoreConfig::new("path/to/data"))?;
//!
//! let products = store.products().load()?;
//! store.sessions().append_closed(&closed_session)?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use store::{Store, StoreConfig};

// Repository re-exports for convenience
pub use repository::movement::MovementRepository;
pub use repository::product::ProductRepository;
pub use repository::session::SessionRepository;
