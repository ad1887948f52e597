//! # Cart (Sale Transaction Builder)
//!
//! The in-progress sale: an ordered, mutable list of lines built up while a
//! register session is open, discarded on confirmation or cancellation.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                              │
//! │                                                                 │
//! │  Operator Action        Operation              Cart Change      │
//! │  ───────────────        ─────────              ───────────      │
//! │  Tap product ─────────► add_item() ──────────► line qty +1      │
//! │                                               (new line at the  │
//! │                                                current price)   │
//! │  Edit quantity ───────► update_quantity() ───► line qty = n     │
//! │                                               (n <= 0 removes)  │
//! │  Cancel sale ─────────► clear() ─────────────► all lines gone   │
//! │  Confirm sale ────────► sale_items() + clear() (service layer)  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stock check on add is a soft, best-effort check against the
//! directory's current snapshot, not a reservation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, SaleItem};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Item
// =============================================================================

/// One line of the in-progress sale.
///
/// Price, sku and name are frozen when the line is created; later product
/// updates in the directory do not change lines already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product the line sells.
    pub product_id: String,

    /// Warehouse the line depletes (the product's primary location).
    pub warehouse_id: String,

    /// SKU at time of adding (frozen).
    pub sku: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Unit price in minor units at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Quantity on the line (>= 1).
    pub quantity: i64,

    /// When this line was added.
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Line total (unit price × quantity).
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }

    /// Converts the line into the sale item recorded on confirmation.
    pub fn to_sale_item(&self) -> SaleItem {
        SaleItem {
            product_id: self.product_id.clone(),
            warehouse_id: self.warehouse_id.clone(),
            quantity: self.quantity,
            unit_price_cents: self.unit_price_cents,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The in-progress sale cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (re-adding increments quantity)
/// - Quantity is always >= 1 (an update to <= 0 removes the line)
/// - At most [`MAX_CART_ITEMS`] lines, [`MAX_ITEM_QUANTITY`] per line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in the cart, in the order they were first added.
    pub items: Vec<CartItem>,

    /// When the cart was created/last cleared.
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds one unit of a product, selling from its primary location.
    ///
    /// ## Behavior
    /// - Fails with `NotStocked` when the product has no locations
    /// - Fails with `OutOfStock` when the primary location's stock is <= 0
    ///   (a soft check against the directory snapshot, not a reservation)
    /// - If the product already has a line: quantity += 1
    /// - Otherwise: appends a new line at the location's current price
    pub fn add_item(&mut self, product: &Product) -> CoreResult<()> {
        let location = product
            .primary_location()
            .ok_or_else(|| CoreError::NotStocked {
                sku: product.sku.clone(),
            })?;

        if location.stock <= 0 {
            return Err(CoreError::OutOfStock {
                sku: product.sku.clone(),
                warehouse_id: location.warehouse_id.clone(),
            });
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let new_qty = item.quantity + 1;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(CartItem {
            product_id: product.id.clone(),
            warehouse_id: location.warehouse_id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            unit_price_cents: location.price_cents,
            quantity: 1,
            added_at: Utc::now(),
        });
        Ok(())
    }

    /// Sets the quantity of a line.
    ///
    /// ## Behavior
    /// - Quantity <= 0 removes the line entirely
    /// - Fails with `NotInCart` when the product has no line
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = quantity;
            Ok(())
        } else {
            Err(CoreError::NotInCart(product_id.to_string()))
        }
    }

    /// Removes a line by product id.
    pub fn remove_item(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        if self.items.len() == initial_len {
            Err(CoreError::NotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    /// Returns the number of lines in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Cart total: Σ over lines of quantity × unit price. Pure.
    pub fn total_cents(&self) -> i64 {
        self.items.iter().map(|i| i.line_total_cents()).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The sale items a confirmation of this cart would record.
    pub fn sale_items(&self) -> Vec<SaleItem> {
        self.items.iter().map(CartItem::to_sale_item).collect()
    }

    /// Change owed for a cash tender of `tendered`.
    ///
    /// The caller validates the tender before confirming a cash sale;
    /// confirmation itself does not re-check it.
    pub fn change_due(&self, tendered: Money) -> CoreResult<Money> {
        let total = Money::from_cents(self.total_cents());
        if tendered < total {
            return Err(CoreError::InsufficientTender {
                tendered_cents: tendered.cents(),
                total_cents: total.cents(),
            });
        }
        Ok(tendered - total)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart totals summary for service responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub total_cents: i64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total_cents: cart.total_cents(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
