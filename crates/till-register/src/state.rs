//! # Register Handle
//!
//! Shared-ownership wrapper for embedding the register in a UI event loop.
//!
//! The register itself is single-threaded run-to-completion; the handle
//! serializes access so UI handlers on different threads never interleave
//! inside an operation.

use std::sync::{Arc, Mutex};

use crate::service::Register;

/// Shared handle to a register.
///
/// `Arc` for shared ownership across handlers, `Mutex` so only one
/// operation runs at a time.
#[derive(Debug, Clone)]
pub struct RegisterHandle {
    inner: Arc<Mutex<Register>>,
}

impl RegisterHandle {
    /// Wraps a register in a shared handle.
    pub fn new(register: Register) -> Self {
        RegisterHandle {
            inner: Arc::new(Mutex::new(register)),
        }
    }

    /// Executes a function with read access to the register.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let cart = handle.with(|r| r.cart());
    /// ```
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Register) -> R,
    {
        let register = self.inner.lock().expect("Register mutex poisoned");
        f(&register)
    }

    /// Executes a function with write access to the register.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// handle.with_mut(|r| r.add_to_cart(&product_id))?;
    /// ```
    pub fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Register) -> R,
    {
        let mut register = self.inner.lock().expect("Register mutex poisoned");
        f(&mut register)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
