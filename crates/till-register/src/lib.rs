//! # Till Register Service
//!
//! The service layer a till UI embeds: one [`Register`] per till, owning
//! the product directory, the stock ledger, the session state machine and
//! the in-progress cart, persisted through `till-store`.
//!
//! ## Module Organization
//! ```text
//! till_register/
//! ├── lib.rs          ◄─── You are here (setup helpers)
//! ├── service.rs      ◄─── Register operations + response types
//! ├── state.rs        ◄─── Shared RegisterHandle for UI embedding
//! └── error.rs        ◄─── RegisterError envelope
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use till_register::{init_tracing, Register, RegisterHandle};
//! use till_store::{Store, StoreConfig};
//!
//! init_tracing();
//!
//! let data_dir = till_register::default_data_dir()
//!     .expect("no home directory");
//! let store = Store::open(StoreConfig::new(data_dir))?;
//! let register = RegisterHandle::new(Register::open(store)?);
//!
//! register.with_mut(|r| r.open_session(50_000))?;
//! register.with_mut(|r| r.add_to_cart("product-id"))?;
//! register.with_mut(|r| r.confirm_sale(PaymentMethod::Cash))?;
//! register.with_mut(|r| r.close_session(50_750))?;
//! ```

pub mod error;
pub mod service;
pub mod state;

use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use error::{ErrorCode, RegisterError};
pub use service::{
    CartResponse, CloseSessionResponse, ReceiptLine, Register, SaleReceipt, SessionResponse,
};
pub use state::RegisterHandle;

/// Initializes tracing with an env-filter subscriber.
///
/// Default level: INFO. Override with `RUST_LOG` (e.g.
/// `RUST_LOG=till_register=debug`). Call once at startup; later calls are
/// no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();

    info!("Tracing initialized");
}

/// Platform data directory for the store root.
///
/// - macOS: `~/Library/Application Support/com.tillpos.till-pos`
/// - Windows: `%APPDATA%/tillpos/till-pos/data`
/// - Linux: `~/.local/share/till-pos`
///
/// Returns `None` when no home directory can be determined.
pub fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "tillpos", "till-pos").map(|dirs| dirs.data_dir().to_path_buf())
}
