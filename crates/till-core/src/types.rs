//! # Domain Types
//!
//! Core domain types used throughout Till POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Domain Types                             │
//! │                                                                 │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌───────────────┐  │
//! │  │     Product      │  │  StockMovement   │  │    PosSale    │  │
//! │  │  ──────────────  │  │  ──────────────  │  │  ───────────  │  │
//! │  │  id (UUID)       │  │  id (UUIDv7)     │  │  id (UUID)    │  │
//! │  │  sku (business)  │  │  product_id      │  │  items        │  │
//! │  │  name            │  │  warehouse_id    │  │  total_cents  │  │
//! │  │  locations[]     │  │  quantity (±)    │  │  payment      │  │
//! │  └──────────────────┘  │  reason          │  └───────────────┘  │
//! │                        │  reference_id    │                     │
//! │  ┌──────────────────┐  └──────────────────┘  ┌───────────────┐  │
//! │  │  WarehouseStock  │                        │CashRegister-  │  │
//! │  │  ──────────────  │  ┌──────────────────┐  │Session        │  │
//! │  │  warehouse_id    │  │  PaymentMethod   │  │  ───────────  │  │
//! │  │  stock           │  │  Cash, Transfer, │  │  opening_*    │  │
//! │  │  price_cents     │  │  cards, Check    │  │  sales[]      │  │
//! │  └──────────────────┘  └──────────────────┘  │  closing_*    │  │
//! │                                              └───────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Timestamps are `chrono::DateTime<Utc>` and serialize as ISO-8601
//! strings, so every entity round-trips losslessly through JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Warehouse Stock (location)
// =============================================================================

/// A product's stock/price record scoped to one warehouse.
///
/// `stock` is a soft invariant: the ledger may drive it negative (oversell
/// is a business exception surfaced elsewhere, not a ledger-layer rule).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseStock {
    /// Warehouse this record belongs to. Unique within a product.
    pub warehouse_id: String,

    /// Current stock level at this warehouse.
    pub stock: i64,

    /// Unit price in minor units at this warehouse.
    pub price_cents: i64,
}

impl WarehouseStock {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether the location currently has sellable stock.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale, stocked in one or more warehouses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name shown to the operator and on receipts.
    pub name: String,

    /// One row per warehouse the product is stocked in.
    pub locations: Vec<WarehouseStock>,
}

impl Product {
    /// Returns the primary warehouse location (the first row).
    ///
    /// Cart additions sell from the primary location.
    pub fn primary_location(&self) -> Option<&WarehouseStock> {
        self.locations.first()
    }

    /// Returns the location record for a warehouse, if the product is
    /// stocked there.
    pub fn location(&self, warehouse_id: &str) -> Option<&WarehouseStock> {
        self.locations
            .iter()
            .find(|l| l.warehouse_id == warehouse_id)
    }

    /// Mutable variant of [`Product::location`].
    pub fn location_mut(&mut self, warehouse_id: &str) -> Option<&mut WarehouseStock> {
        self.locations
            .iter_mut()
            .find(|l| l.warehouse_id == warehouse_id)
    }
}

// =============================================================================
// Movement Reason
// =============================================================================

/// Why an inventory-affecting event happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementReason {
    /// Depletion caused by an invoiced sale.
    InvoiceSale,
    /// Depletion caused by a point-of-sale sale.
    PosSale,
    /// Operator-entered correction, either direction.
    ManualAdjustment,
    /// Replenishment from a customer return.
    Return,
}

impl MovementReason {
    /// Stable lowercase label, used by the movement query filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementReason::InvoiceSale => "invoice_sale",
            MovementReason::PosSale => "pos_sale",
            MovementReason::ManualAdjustment => "manual_adjustment",
            MovementReason::Return => "return",
        }
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// One immutable signed-quantity inventory event.
///
/// Movements are never edited or deleted; they are the audit trail. The sum
/// of all movements for a (product, warehouse) pair, added to that
/// location's initial stock, equals the location's current stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    /// Unique, time-ordered identifier (UUID v7).
    pub id: String,

    /// Product the movement applies to.
    pub product_id: String,

    /// Warehouse the movement applies to.
    pub warehouse_id: String,

    /// Signed quantity: negative = depletion, positive = replenishment.
    pub quantity: i64,

    /// Why the movement happened.
    pub reason: MovementReason,

    /// Id of the sale/invoice that caused it, when there is one.
    pub reference_id: Option<String>,

    /// When the movement was recorded.
    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    /// Whether this movement removed stock.
    #[inline]
    pub fn is_depletion(&self) -> bool {
        self.quantity < 0
    }

    /// Whether this movement added stock.
    #[inline]
    pub fn is_replenishment(&self) -> bool {
        self.quantity > 0
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a point-of-sale sale was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash into the drawer.
    Cash,
    /// Debit card on an external terminal.
    DebitCard,
    /// Credit card on an external terminal.
    CreditCard,
    /// Bank transfer.
    Transfer,
    /// Paper check.
    Check,
}

impl PaymentMethod {
    /// Only cash sales count toward the drawer's expected balance.
    #[inline]
    pub fn is_cash(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item of a confirmed point-of-sale sale.
///
/// The unit price is frozen at confirmation time; later price changes in
/// the directory never alter a recorded sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItem {
    pub product_id: String,
    pub warehouse_id: String,
    /// Quantity sold (>= 1).
    pub quantity: i64,
    /// Unit price in minor units at time of sale (frozen).
    pub unit_price_cents: i64,
}

impl SaleItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }
}

// =============================================================================
// POS Sale
// =============================================================================

/// A confirmed point-of-sale sale, owned by its parent session.
///
/// `total_cents` is computed from the items once, at creation, and never
/// recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosSale {
    pub id: String,
    pub items: Vec<SaleItem>,
    /// Σ quantity × unit_price over `items`, fixed at creation.
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

impl PosSale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Recomputes the total from the items. Equal to `total_cents` for any
    /// well-formed sale; used by consistency checks.
    pub fn items_total_cents(&self) -> i64 {
        self.items.iter().map(|i| i.line_total_cents()).sum()
    }
}

// =============================================================================
// Cash Register Session
// =============================================================================

/// One continuous period a cash drawer is open for trading.
///
/// Created Open with an operator-supplied opening balance; `sales` is
/// append-only while open; closed exactly once, after which the session is
/// immutable and lives in history. Every financial figure below is derived
/// from `sales` on each call, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashRegisterSession {
    pub id: String,
    pub opening_time: DateTime<Utc>,
    /// Cash in the drawer when the session opened (>= 0).
    pub opening_balance_cents: i64,
    /// Sales recorded during the session, in confirmation order.
    pub sales: Vec<PosSale>,
    /// Absent until the session is closed.
    pub closing_time: Option<DateTime<Utc>>,
    /// Counted cash at close. Absent until the session is closed.
    pub closing_balance_cents: Option<i64>,
}

impl CashRegisterSession {
    /// Whether the session has been closed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closing_time.is_some()
    }

    /// Total of all sales, any payment method.
    pub fn total_sales_cents(&self) -> i64 {
        self.sales.iter().map(|s| s.total_cents).sum()
    }

    /// Total of cash sales only.
    pub fn cash_sales_cents(&self) -> i64 {
        self.sales
            .iter()
            .filter(|s| s.payment_method.is_cash())
            .map(|s| s.total_cents)
            .sum()
    }

    /// Cash that should be in the drawer: opening balance + cash sales.
    pub fn expected_cash_cents(&self) -> i64 {
        self.opening_balance_cents + self.cash_sales_cents()
    }

    /// Counted minus expected cash. `None` until the session is closed;
    /// zero is the reconciled case, any other value is informational.
    pub fn difference_cents(&self) -> Option<i64> {
        self.closing_balance_cents
            .map(|counted| counted - self.expected_cash_cents())
    }
}

// =============================================================================
// Session Summary
// =============================================================================

/// Financial summary of a closed session, computed from the session's own
/// sales array on every read so history stays consistent with its immutable
/// source even if summary logic changes later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub opening_time: DateTime<Utc>,
    pub closing_time: Option<DateTime<Utc>>,
    pub opening_balance_cents: i64,
    pub sale_count: usize,
    pub total_sales_cents: i64,
    pub cash_sales_cents: i64,
    pub expected_cash_cents: i64,
    /// closing balance − expected cash; zero when the drawer reconciled.
    pub difference_cents: i64,
}

impl SessionSummary {
    /// Computes the summary for a session.
    pub fn of(session: &CashRegisterSession) -> Self {
        SessionSummary {
            session_id: session.id.clone(),
            opening_time: session.opening_time,
            closing_time: session.closing_time,
            opening_balance_cents: session.opening_balance_cents,
            sale_count: session.sales.len(),
            total_sales_cents: session.total_sales_cents(),
            cash_sales_cents: session.cash_sales_cents(),
            expected_cash_cents: session.expected_cash_cents(),
            difference_cents: session.difference_cents().unwrap_or(0),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(total: i64, method: PaymentMethod) -> PosSale {
        PosSale {
            id: format!("sale-{}-{:?}", total, method),
            items: vec![SaleItem {
                product_id: "p1".to_string(),
                warehouse_id: "w1".to_string(),
                quantity: 1,
                unit_price_cents: total,
            }],
            total_cents: total,
            payment_method: method,
            created_at: Utc::now(),
        }
    }

    fn open_session(opening: i64, sales: Vec<PosSale>) -> CashRegisterSession {
        CashRegisterSession {
            id: "s1".to_string(),
            opening_time: Utc::now(),
            opening_balance_cents: opening,
            sales,
            closing_time: None,
            closing_balance_cents: None,
        }
    }

    #[test]
    fn test_cash_sales_excludes_other_methods() {
        let session = open_session(
            50_000,
            vec![
                sale(750, PaymentMethod::Cash),
                sale(80, PaymentMethod::Transfer),
            ],
        );

        assert_eq!(session.total_sales_cents(), 830);
        assert_eq!(session.cash_sales_cents(), 750);
        assert_eq!(session.expected_cash_cents(), 50_750);
        assert_eq!(session.difference_cents(), None);
    }

    #[test]
    fn test_difference_after_close() {
        let mut session = open_session(50_000, vec![sale(750, PaymentMethod::Cash)]);
        session.closing_time = Some(Utc::now());
        session.closing_balance_cents = Some(50_700);

        assert!(session.is_closed());
        assert_eq!(session.difference_cents(), Some(-50));
    }

    #[test]
    fn test_summary_matches_session_figures() {
        let mut session = open_session(
            1_000,
            vec![
                sale(200, PaymentMethod::Cash),
                sale(300, PaymentMethod::Check),
            ],
        );
        session.closing_time = Some(Utc::now());
        session.closing_balance_cents = Some(1_200);

        let summary = SessionSummary::of(&session);
        assert_eq!(summary.sale_count, 2);
        assert_eq!(summary.total_sales_cents, 500);
        assert_eq!(summary.cash_sales_cents, 200);
        assert_eq!(summary.expected_cash_cents, 1_200);
        assert_eq!(summary.difference_cents, 0);
    }

    /// Computing the summary twice from the same stored sales yields
    /// identical results.
    #[test]
    fn test_summary_idempotent() {
        let session = open_session(1_000, vec![sale(200, PaymentMethod::Cash)]);
        assert_eq!(SessionSummary::of(&session), SessionSummary::of(&session));
    }

    #[test]
    fn test_sale_items_total_matches_total() {
        let s = sale(750, PaymentMethod::Cash);
        assert_eq!(s.items_total_cents(), s.total_cents);
    }

    #[test]
    fn test_product_location_lookup() {
        let product = Product {
            id: "p1".to_string(),
            sku: "COLA-330".to_string(),
            name: "Cola 330ml".to_string(),
            locations: vec![
                WarehouseStock {
                    warehouse_id: "w1".to_string(),
                    stock: 5,
                    price_cents: 750,
                },
                WarehouseStock {
                    warehouse_id: "w2".to_string(),
                    stock: 0,
                    price_cents: 800,
                },
            ],
        };

        assert_eq!(product.primary_location().unwrap().warehouse_id, "w1");
        assert!(product.location("w2").is_some());
        assert!(!product.location("w2").unwrap().in_stock());
        assert!(product.location("w3").is_none());
    }

    #[test]
    fn test_movement_direction() {
        let movement = StockMovement {
            id: "m1".to_string(),
            product_id: "p1".to_string(),
            warehouse_id: "w1".to_string(),
            quantity: -2,
            reason: MovementReason::PosSale,
            reference_id: Some("sale-1".to_string()),
            created_at: Utc::now(),
        };
        assert!(movement.is_depletion());
        assert!(!movement.is_replenishment());
    }

    #[test]
    fn test_payment_method_serde_names() {
        let json = serde_json::to_string(&PaymentMethod::DebitCard).unwrap();
        assert_eq!(json, "\"debit_card\"");
        let back: PaymentMethod = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PaymentMethod::DebitCard);
    }

    /// Serializing a session (including timestamps) and deserializing it
    /// reproduces equal instants and identical sales.
    #[test]
    fn test_session_serde_round_trip() {
        let mut session = open_session(
            50_000,
            vec![
                sale(750, PaymentMethod::Cash),
                sale(80, PaymentMethod::Transfer),
            ],
        );
        session.closing_time = Some(Utc::now());
        session.closing_balance_cents = Some(50_750);

        let json = serde_json::to_string(&session).unwrap();
        let back: CashRegisterSession = serde_json::from_str(&json).unwrap();

        assert_eq!(back.opening_time, session.opening_time);
        assert_eq!(back.closing_time, session.closing_time);
        assert_eq!(back.sales, session.sales);
        assert_eq!(back, session);
    }
}
