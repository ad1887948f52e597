//! # Register Service
//!
//! The single service instance that owns a till's state and orchestrates
//! the core against the store.
//!
//! ## Confirm Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     confirm_sale(method)                        │
//! │                                                                 │
//! │  1. Session open?            ── no ──► InvalidState             │
//! │  2. Cart non-empty?          ── no ──► EmptyCart                │
//! │  3. Every line's (product, warehouse) exists in the directory?  │
//! │                              ── no ──► NotFound (nothing posted)│
//! │  4. Build PosSale (fresh id, frozen items, total)               │
//! │  5. Per line: ledger movement −qty, reason pos_sale,            │
//! │     reference = sale id (applies stock delta)                   │
//! │  6. Append sale to the open session                             │
//! │  7. Persist products + movements + active session               │
//! │  8. Clear the cart, return the receipt                          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Step 3 validates every line before step 5 posts anything, so the
//! posting loop cannot fail halfway and leave a torn sale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::RegisterError;
use till_core::{
    validation, Cart, CartItem, CartTotals, CashRegisterSession, CoreError, Directory, Money,
    MovementReason, PaymentMethod, PosSale, Product, Reconciliation, SessionSummary, StockLedger,
    StockMovement, Till, TillState,
};
use till_store::Store;

// =============================================================================
// Responses
// =============================================================================

/// Response to opening a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub opening_time: DateTime<Utc>,
    pub opening_balance_cents: i64,
}

/// Cart view including lines and totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.items.clone(),
            totals: CartTotals::from(cart),
        }
    }
}

/// One printed line of a confirmed sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

/// Response to confirming a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    pub sale_id: String,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<ReceiptLine>,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
}

/// Response to closing a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseSessionResponse {
    pub session_id: String,
    pub opening_time: DateTime<Utc>,
    pub closing_time: Option<DateTime<Utc>>,
    pub opening_balance_cents: i64,
    pub sale_count: usize,
    pub total_sales_cents: i64,
    pub reconciliation: Reconciliation,
}

// =============================================================================
// Register
// =============================================================================

/// One till's register: directory, ledger, session state machine and cart,
/// backed by the store.
///
/// The register is the explicit owner of the active session; there is no
/// ambient global state. Operations run to completion on the calling
/// thread (wrap the register in a [`crate::RegisterHandle`] to share it
/// with a UI event loop).
#[derive(Debug)]
pub struct Register {
    store: Store,
    directory: Directory,
    ledger: StockLedger,
    till: Till,
    cart: Cart,
}

impl Register {
    /// Opens a register over a store, loading persisted state.
    ///
    /// Resumes the persisted active session if one exists (e.g. after the
    /// process restarted while a till was trading).
    pub fn open(store: Store) -> Result<Self, RegisterError> {
        let products = store.products().load()?;
        let movements = store.movements().load()?;
        let active = store.sessions().active()?;

        let resumed = active.is_some();
        let till = match active {
            Some(session) => Till::resume(session),
            None => Till::new(),
        };

        info!(
            products = products.len(),
            movements = movements.len(),
            resumed_session = resumed,
            "Register opened"
        );

        Ok(Register {
            store,
            directory: Directory::from_products(products),
            ledger: StockLedger::from_movements(movements),
            till,
            cart: Cart::new(),
        })
    }

    /// Current till state.
    pub fn till_state(&self) -> TillState {
        self.till.state()
    }

    /// The open session, if any.
    pub fn active_session(&self) -> Option<&CashRegisterSession> {
        self.till.session()
    }

    /// Read access to the product directory.
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    // -------------------------------------------------------------------------
    // Directory maintenance
    // -------------------------------------------------------------------------

    /// Inserts or replaces a product in the directory and persists it.
    ///
    /// The seam the product-maintenance screens feed; the register itself
    /// only ever reads the directory.
    pub fn upsert_product(&mut self, product: Product) -> Result<(), RegisterError> {
        validation::validate_sku(&product.sku).map_err(CoreError::from)?;
        validation::validate_product_name(&product.name).map_err(CoreError::from)?;
        for location in &product.locations {
            validation::validate_price_cents(location.price_cents).map_err(CoreError::from)?;
        }

        debug!(product_id = %product.id, sku = %product.sku, "Upserting product");
        self.directory.upsert(product);
        self.store.products().save(self.directory.products())?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Session lifecycle
    // -------------------------------------------------------------------------

    /// Opens a session with the given opening balance.
    pub fn open_session(
        &mut self,
        opening_balance_cents: i64,
    ) -> Result<SessionResponse, RegisterError> {
        debug!(opening_balance_cents, "open_session");

        let session = self.till.open_session(Money::from_cents(opening_balance_cents))?;
        let response = SessionResponse {
            session_id: session.id.clone(),
            opening_time: session.opening_time,
            opening_balance_cents: session.opening_balance_cents,
        };
        self.store.sessions().save_active(session)?;

        info!(session_id = %response.session_id, opening_balance_cents, "Session opened");
        Ok(response)
    }

    /// Closes the open session against a counted cash amount.
    ///
    /// The closed session moves into history, the active-session key is
    /// removed, the cart is discarded, and the till returns to idle.
    pub fn close_session(
        &mut self,
        counted_cash_cents: i64,
    ) -> Result<CloseSessionResponse, RegisterError> {
        debug!(counted_cash_cents, "close_session");

        let (closed, reconciliation) =
            self.till.close_session(Money::from_cents(counted_cash_cents))?;

        self.store.sessions().append_closed(&closed)?;
        self.store.sessions().clear_active()?;
        self.cart.clear();

        info!(
            session_id = %closed.id,
            expected_cash_cents = reconciliation.expected_cash_cents,
            difference_cents = reconciliation.difference_cents,
            "Session closed"
        );

        Ok(CloseSessionResponse {
            session_id: closed.id.clone(),
            opening_time: closed.opening_time,
            closing_time: closed.closing_time,
            opening_balance_cents: closed.opening_balance_cents,
            sale_count: closed.sales.len(),
            total_sales_cents: closed.total_sales_cents(),
            reconciliation,
        })
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    /// Adds one unit of a product to the cart.
    ///
    /// Only valid while a session is open. Sells from the product's
    /// primary location at its current price.
    pub fn add_to_cart(&mut self, product_id: &str) -> Result<CartResponse, RegisterError> {
        debug!(product_id, "add_to_cart");
        self.require_open_session("add to the cart")?;

        let product = self.directory.get_required(product_id)?;
        self.cart.add_item(product)?;
        Ok(CartResponse::from(&self.cart))
    }

    /// Sets the quantity of a cart line; a quantity <= 0 removes the line.
    pub fn update_cart_quantity(
        &mut self,
        product_id: &str,
        quantity: i64,
    ) -> Result<CartResponse, RegisterError> {
        debug!(product_id, quantity, "update_cart_quantity");
        self.require_open_session("update the cart")?;

        self.cart.update_quantity(product_id, quantity)?;
        Ok(CartResponse::from(&self.cart))
    }

    /// Current cart view.
    pub fn cart(&self) -> CartResponse {
        CartResponse::from(&self.cart)
    }

    /// Change owed for a cash tender of the current cart total.
    ///
    /// The UI calls this before `confirm_sale` for cash payments;
    /// confirmation itself does not take the tendered amount.
    pub fn change_due(&self, tendered_cents: i64) -> Result<i64, RegisterError> {
        let change = self.cart.change_due(Money::from_cents(tendered_cents))?;
        Ok(change.cents())
    }

    // -------------------------------------------------------------------------
    // Sale confirmation
    // -------------------------------------------------------------------------

    /// Confirms the cart as one sale on the open session.
    ///
    /// Emits one ledger movement per line (negated quantity, reason
    /// `pos_sale`, reference = sale id), appends the sale to the session,
    /// persists everything, and clears the cart. All lines are validated
    /// against the directory before any movement is posted.
    pub fn confirm_sale(
        &mut self,
        payment_method: PaymentMethod,
    ) -> Result<SaleReceipt, RegisterError> {
        debug!(?payment_method, "confirm_sale");
        self.require_open_session("confirm a sale")?;

        if self.cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        // Validate every line before posting anything: a lookup miss here
        // costs nothing, a lookup miss mid-loop would tear the sale.
        for item in &self.cart.items {
            let product = self.directory.get_required(&item.product_id)?;
            if product.location(&item.warehouse_id).is_none() {
                return Err(CoreError::LocationNotFound {
                    product_id: item.product_id.clone(),
                    warehouse_id: item.warehouse_id.clone(),
                }
                .into());
            }
        }

        let sale = PosSale {
            id: Uuid::new_v4().to_string(),
            items: self.cart.sale_items(),
            total_cents: self.cart.total_cents(),
            payment_method,
            created_at: Utc::now(),
        };

        let lines: Vec<ReceiptLine> = self
            .cart
            .items
            .iter()
            .map(|i| ReceiptLine {
                sku: i.sku.clone(),
                name: i.name.clone(),
                quantity: i.quantity,
                unit_price_cents: i.unit_price_cents,
                line_total_cents: i.line_total_cents(),
            })
            .collect();

        for item in &sale.items {
            self.ledger.record_movement(
                &mut self.directory,
                &item.product_id,
                &item.warehouse_id,
                -item.quantity,
                MovementReason::PosSale,
                Some(&sale.id),
            )?;
        }

        let receipt = SaleReceipt {
            sale_id: sale.id.clone(),
            created_at: sale.created_at,
            lines,
            total_cents: sale.total_cents,
            payment_method,
        };

        self.till.record_sale(sale)?;
        self.persist_trading_state()?;
        self.cart.clear();

        info!(
            sale_id = %receipt.sale_id,
            total_cents = receipt.total_cents,
            lines = receipt.lines.len(),
            "Sale confirmed"
        );
        Ok(receipt)
    }

    // -------------------------------------------------------------------------
    // Stock movements
    // -------------------------------------------------------------------------

    /// Records a stock movement outside the POS flow and persists it.
    ///
    /// The seam the invoicing and manual-adjustment flows write through:
    /// negative quantities deplete, positive quantities replenish.
    pub fn record_movement(
        &mut self,
        product_id: &str,
        warehouse_id: &str,
        quantity: i64,
        reason: MovementReason,
        reference_id: Option<&str>,
    ) -> Result<StockMovement, RegisterError> {
        debug!(product_id, warehouse_id, quantity, ?reason, "record_movement");

        let movement = self.ledger.record_movement(
            &mut self.directory,
            product_id,
            warehouse_id,
            quantity,
            reason,
            reference_id,
        )?;

        self.store.products().save(self.directory.products())?;
        self.store.movements().save(self.ledger.movements())?;

        info!(movement_id = %movement.id, quantity, "Movement recorded");
        Ok(movement)
    }

    /// Stock movements newest first, optionally filtered by text.
    pub fn stock_movements(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<StockMovement>, RegisterError> {
        let filter = match filter {
            Some(f) => Some(
                validation::validate_movement_filter(f).map_err(CoreError::from)?,
            ),
            None => None,
        };

        Ok(self
            .ledger
            .query(filter.as_deref())
            .cloned()
            .collect())
    }

    // -------------------------------------------------------------------------
    // History
    // -------------------------------------------------------------------------

    /// Summaries of closed sessions, newest opening first.
    ///
    /// Each summary is recomputed from the stored sales on every call.
    pub fn session_history(&self) -> Result<Vec<SessionSummary>, RegisterError> {
        let mut summaries: Vec<SessionSummary> = self
            .store
            .sessions()
            .history()?
            .iter()
            .map(SessionSummary::of)
            .collect();

        summaries.sort_by(|a, b| b.opening_time.cmp(&a.opening_time));
        Ok(summaries)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn require_open_session(&self, operation: &'static str) -> Result<(), RegisterError> {
        match self.till.state() {
            TillState::Open => Ok(()),
            state => Err(CoreError::InvalidState {
                operation,
                state: state.as_str(),
            }
            .into()),
        }
    }

    /// Persists everything a confirmed sale touched.
    fn persist_trading_state(&self) -> Result<(), RegisterError> {
        self.store.products().save(self.directory.products())?;
        self.store.movements().save(self.ledger.movements())?;
        if let Some(session) = self.till.session() {
            self.store.sessions().save_active(session)?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
