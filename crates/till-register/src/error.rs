//! # Register Error Type
//!
//! Unified error envelope for register service operations.
//!
//! Every failure the embedding UI can see is a `RegisterError` carrying a
//! machine-readable `code` for programmatic handling and a human-readable
//! `message` for display. All errors are recoverable; the UI re-prompts.

use serde::Serialize;
use till_core::CoreError;
use till_store::StoreError;

/// Error returned from register service operations.
///
/// ## Serialization
/// What the embedding UI receives when an operation fails:
/// ```json
/// {
///   "code": "OUT_OF_STOCK",
///   "message": "COLA-330 is out of stock at warehouse w1"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for register responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Negative money where a non-negative amount is required
    InvalidAmount,

    /// Operation attempted in the wrong till state
    InvalidState,

    /// Product or warehouse lookup miss
    NotFound,

    /// Soft stock pre-check failed
    OutOfStock,

    /// Confirm attempted with no cart lines
    EmptyCart,

    /// Cart operation failed (limits, missing line)
    CartError,

    /// Tender does not cover the total
    PaymentError,

    /// Input validation failed
    ValidationError,

    /// Persistence operation failed
    StorageError,
}

impl RegisterError {
    /// Creates a new register error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        RegisterError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        RegisterError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        RegisterError::new(ErrorCode::ValidationError, message)
    }
}

/// Converts core errors to register errors.
impl From<CoreError> for RegisterError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::InvalidAmount { .. } => ErrorCode::InvalidAmount,
            CoreError::InvalidState { .. } => ErrorCode::InvalidState,
            CoreError::ProductNotFound(_)
            | CoreError::LocationNotFound { .. }
            | CoreError::NotStocked { .. } => ErrorCode::NotFound,
            CoreError::OutOfStock { .. } => ErrorCode::OutOfStock,
            CoreError::EmptyCart => ErrorCode::EmptyCart,
            CoreError::NotInCart(_) | CoreError::CartTooLarge { .. } => ErrorCode::CartError,
            CoreError::QuantityTooLarge { .. } => ErrorCode::CartError,
            CoreError::InsufficientTender { .. } => ErrorCode::PaymentError,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        RegisterError::new(code, err.to_string())
    }
}

/// Converts store errors to register errors.
impl From<StoreError> for RegisterError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => RegisterError::not_found(&entity, &id),
            other => {
                // Log the full error, surface a stable message.
                tracing::error!("Store operation failed: {}", other);
                RegisterError::new(ErrorCode::StorageError, "Storage operation failed")
            }
        }
    }
}

impl std::fmt::Display for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for RegisterError {}

// =============================================================================
// Unit Tests
// =============================================================================
