//! # till-core: Pure Business Logic for Till POS
//!
//! This crate is the heart of Till POS. It contains the cash-register
//! session state machine, the stock-movement ledger and the sale
//! transaction builder as pure logic with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Till POS Architecture                      │
//! │                                                                 │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │                 Till UI (external)                        │  │
//! │  │   Product grid ──► Cart panel ──► Tender ──► Close till   │  │
//! │  └───────────────────────────┬───────────────────────────────┘  │
//! │                              │ in-process calls                 │
//! │  ┌───────────────────────────▼───────────────────────────────┐  │
//! │  │              till-register (service layer)                │  │
//! │  └───────────────────────────┬───────────────────────────────┘  │
//! │                              │                                  │
//! │  ┌───────────────────────────▼───────────────────────────────┐  │
//! │  │               ★ till-core (THIS CRATE) ★                  │  │
//! │  │                                                           │  │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌────────┐ ┌──────┐  │  │
//! │  │  │  types  │ │  money  │ │ session │ │  cart  │ │ledger│  │  │
//! │  │  │ Product │ │  Money  │ │  Till   │ │  Cart  │ │Stock │  │  │
//! │  │  │ PosSale │ │         │ │ Reconc. │ │CartItem│ │Ledger│  │  │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └────────┘ └──────┘  │  │
//! │  │                                                           │  │
//! │  │   NO FILESYSTEM • NO NETWORK • NO ASYNC                   │  │
//! │  └───────────────────────────┬───────────────────────────────┘  │
//! │                              │                                  │
//! │  ┌───────────────────────────▼───────────────────────────────┐  │
//! │  │            till-store (persistence layer)                 │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, StockMovement, PosSale, session)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`session`] - The till state machine and close-of-day reconciliation
//! - [`cart`] - The in-progress sale cart
//! - [`ledger`] - Product directory and append-only stock ledger
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Deterministic operations**: the only ambient inputs are the system
//!    clock (timestamps) and id generation
//! 2. **No I/O**: filesystem and network access is FORBIDDEN here
//! 3. **Integer money**: all monetary values are minor units (i64)
//! 4. **Explicit errors**: all failures are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod ledger;
pub mod money;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use till_core::Money` instead of
// `use till_core::money::Money`.

pub use cart::{Cart, CartItem, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{Directory, StockLedger};
pub use money::Money;
pub use session::{Reconciliation, Till, TillState};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of distinct lines allowed in a single cart.
///
/// Prevents runaway carts and keeps transaction sizes reasonable.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line in the cart.
///
/// Guards against fat-finger quantities (e.g. 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
