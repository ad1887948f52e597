//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Error Types                             │
//! │                                                                 │
//! │  till-core errors (this file)                                   │
//! │  ├── CoreError        - Business rule violations                │
//! │  └── ValidationError  - Input validation failures               │
//! │                                                                 │
//! │  till-store errors (separate crate)                             │
//! │  └── StoreError       - Persistence failures                    │
//! │                                                                 │
//! │  till-register errors (service crate)                           │
//! │  └── RegisterError    - What the embedding UI sees              │
//! │                                                                 │
//! │  Flow: ValidationError → CoreError → RegisterError → UI         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error here is locally recoverable; the UI layer re-prompts.
//! None is fatal to the process.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Negative money where only a non-negative amount is valid
    /// (opening balance, counted cash).
    #[error("Invalid {field}: {cents} is negative")]
    InvalidAmount { field: &'static str, cents: i64 },

    /// Operation attempted in the wrong till state, e.g. closing a till
    /// that has no open session.
    #[error("Cannot {operation} while the till is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// Product id does not exist in the directory.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Product exists but has no stock record for the given warehouse.
    #[error("Product {product_id} has no stock record for warehouse {warehouse_id}")]
    LocationNotFound {
        product_id: String,
        warehouse_id: String,
    },

    /// Product has no warehouse locations at all, so it cannot be sold.
    #[error("Product {sku} is not stocked in any warehouse")]
    NotStocked { sku: String },

    /// Soft pre-check failure: the primary location's stock is zero or
    /// below when adding to the cart.
    #[error("{sku} is out of stock at warehouse {warehouse_id}")]
    OutOfStock { sku: String, warehouse_id: String },

    /// Confirm attempted with no cart lines.
    #[error("Cannot confirm a sale with an empty cart")]
    EmptyCart,

    /// Quantity update targeted a product that has no cart line.
    #[error("Product {0} is not in the cart")]
    NotInCart(String),

    /// Cart has reached the maximum number of lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds the maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Tendered cash does not cover the cart total.
    #[error("Tendered {tendered_cents} does not cover total {total_cents}")]
    InsufficientTender {
        tendered_cents: i64,
        total_cents: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. malformed UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
