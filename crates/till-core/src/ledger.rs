//! # Product Directory & Stock Ledger
//!
//! The directory holds the read-mostly product/warehouse reference data;
//! the ledger is the append-only log of inventory-affecting events.
//!
//! ## Stock Update Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   Two Views Of One Fact                         │
//! │                                                                 │
//! │  Ledger movements (immutable)        Directory stock (mutable)  │
//! │  ────────────────────────────        ─────────────────────────  │
//! │  m1: p1/w1  -3  pos_sale             p1/w1.stock                │
//! │  m2: p1/w1  -2  invoice_sale    ──►    = initial + Σ deltas     │
//! │  m3: p1/w1  +5  return                                          │
//! │                                                                 │
//! │  record_movement appends the event AND applies the delta in     │
//! │  the same call, so the two views never diverge.                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ledger does not enforce `stock >= 0`: movements that drive stock
//! negative are accepted and oversell is surfaced as a business exception
//! elsewhere.

use chrono::Utc;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::types::{MovementReason, Product, StockMovement, WarehouseStock};

// =============================================================================
// Directory
// =============================================================================

/// The product/warehouse reference data the ledger and the cart read.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    products: Vec<Product>,
}

impl Directory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Directory {
            products: Vec::new(),
        }
    }

    /// Creates a directory from loaded products.
    pub fn from_products(products: Vec<Product>) -> Self {
        Directory { products }
    }

    /// All products, in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Looks up a product by id.
    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    /// Looks up a product by id, failing with `ProductNotFound`.
    pub fn get_required(&self, product_id: &str) -> CoreResult<&Product> {
        self.get(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))
    }

    /// Current stock at a location, if the product is stocked there.
    pub fn current_stock(&self, product_id: &str, warehouse_id: &str) -> Option<i64> {
        self.get(product_id)
            .and_then(|p| p.location(warehouse_id))
            .map(|l| l.stock)
    }

    /// Mutable access to a product's location record.
    ///
    /// Fails with `LocationNotFound` when the (product, warehouse) pair has
    /// no stock record; `ProductNotFound` when the product id is unknown.
    pub fn location_mut(
        &mut self,
        product_id: &str,
        warehouse_id: &str,
    ) -> CoreResult<&mut WarehouseStock> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        product
            .location_mut(warehouse_id)
            .ok_or_else(|| CoreError::LocationNotFound {
                product_id: product_id.to_string(),
                warehouse_id: warehouse_id.to_string(),
            })
    }

    /// Inserts a product, or replaces the existing product with the same id.
    pub fn upsert(&mut self, product: Product) {
        if let Some(existing) = self.products.iter_mut().find(|p| p.id == product.id) {
            *existing = product;
        } else {
            self.products.push(product);
        }
    }
}

// =============================================================================
// Stock Ledger
// =============================================================================

/// Append-only log of inventory-affecting events.
///
/// Movements carry unique, time-ordered ids (UUID v7) and are never edited
/// or deleted once recorded.
#[derive(Debug, Clone, Default)]
pub struct StockLedger {
    movements: Vec<StockMovement>,
}

impl StockLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        StockLedger {
            movements: Vec::new(),
        }
    }

    /// Creates a ledger from loaded movements (oldest first).
    pub fn from_movements(movements: Vec<StockMovement>) -> Self {
        StockLedger { movements }
    }

    /// Records a movement and applies its delta to the matching location.
    ///
    /// The location is resolved before anything is mutated, so a
    /// `LocationNotFound`/`ProductNotFound` failure leaves both the ledger
    /// and the directory untouched. Callers posting a batch of movements
    /// (one sale, several lines) pre-validate every line first; this call
    /// has no cross-call rollback.
    pub fn record_movement(
        &mut self,
        directory: &mut Directory,
        product_id: &str,
        warehouse_id: &str,
        quantity: i64,
        reason: MovementReason,
        reference_id: Option<&str>,
    ) -> CoreResult<StockMovement> {
        let location = directory.location_mut(product_id, warehouse_id)?;
        location.stock += quantity;

        let movement = StockMovement {
            // v7: ids sort in creation order, per the movement id contract
            id: Uuid::now_v7().to_string(),
            product_id: product_id.to_string(),
            warehouse_id: warehouse_id.to_string(),
            quantity,
            reason,
            reference_id: reference_id.map(str::to_string),
            created_at: Utc::now(),
        };
        self.movements.push(movement.clone());
        Ok(movement)
    }

    /// All movements, oldest first (the persisted order).
    pub fn movements(&self) -> &[StockMovement] {
        &self.movements
    }

    /// Lazy, restartable read view over the ledger, newest first.
    ///
    /// An empty or absent filter matches everything; otherwise the filter
    /// is matched case-insensitively against product id, warehouse id,
    /// reference id and reason label. No mutation.
    pub fn query<'a>(
        &'a self,
        filter: Option<&'a str>,
    ) -> impl Iterator<Item = &'a StockMovement> + 'a {
        let needle = filter
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_lowercase);

        self.movements.iter().rev().filter(move |m| match &needle {
            None => true,
            Some(needle) => {
                m.product_id.to_lowercase().contains(needle)
                    || m.warehouse_id.to_lowercase().contains(needle)
                    || m.reason.as_str().contains(needle)
                    || m.reference_id
                        .as_deref()
                        .is_some_and(|r| r.to_lowercase().contains(needle))
            }
        })
    }

    /// Net quantity delta recorded for a (product, warehouse) pair.
    ///
    /// Added to the location's initial stock this equals its current stock;
    /// consistency checks rely on this fold.
    pub fn balance(&self, product_id: &str, warehouse_id: &str) -> i64 {
        self.movements
            .iter()
            .filter(|m| m.product_id == product_id && m.warehouse_id == warehouse_id)
            .map(|m| m.quantity)
            .sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn directory_with(stock: i64) -> Directory {
        Directory::from_products(vec![Product {
            id: "p1".to_string(),
            sku: "COLA-330".to_string(),
            name: "Cola 330ml".to_string(),
            locations: vec![WarehouseStock {
                warehouse_id: "w1".to_string(),
                stock,
                price_cents: 750,
            }],
        }])
    }

    #[test]
    fn test_record_movement_applies_delta() {
        let mut directory = directory_with(10);
        let mut ledger = StockLedger::new();

        let movement = ledger
            .record_movement(
                &mut directory,
                "p1",
                "w1",
                -3,
                MovementReason::PosSale,
                Some("sale-1"),
            )
            .unwrap();

        assert_eq!(movement.quantity, -3);
        assert_eq!(movement.reference_id.as_deref(), Some("sale-1"));
        assert_eq!(directory.current_stock("p1", "w1"), Some(7));
        assert_eq!(ledger.movements().len(), 1);
    }

    #[test]
    fn test_record_movement_unknown_location_mutates_nothing() {
        let mut directory = directory_with(10);
        let mut ledger = StockLedger::new();

        let err = ledger
            .record_movement(
                &mut directory,
                "p1",
                "w9",
                -3,
                MovementReason::PosSale,
                None,
            )
            .unwrap_err();

        assert!(matches!(err, CoreError::LocationNotFound { .. }));
        assert_eq!(directory.current_stock("p1", "w1"), Some(10));
        assert!(ledger.movements().is_empty());
    }

    #[test]
    fn test_record_movement_unknown_product() {
        let mut directory = directory_with(10);
        let mut ledger = StockLedger::new();

        let err = ledger
            .record_movement(
                &mut directory,
                "p9",
                "w1",
                -1,
                MovementReason::PosSale,
                None,
            )
            .unwrap_err();

        assert!(matches!(err, CoreError::ProductNotFound(_)));
    }

    #[test]
    fn test_ledger_accepts_negative_stock() {
        let mut directory = directory_with(1);
        let mut ledger = StockLedger::new();

        ledger
            .record_movement(
                &mut directory,
                "p1",
                "w1",
                -5,
                MovementReason::InvoiceSale,
                Some("inv-7"),
            )
            .unwrap();

        // Oversell is accepted at the ledger layer.
        assert_eq!(directory.current_stock("p1", "w1"), Some(-4));
    }

    /// current stock == initial stock + Σ movement deltas, always.
    #[test]
    fn test_stock_consistency_invariant() {
        let initial = 10;
        let mut directory = directory_with(initial);
        let mut ledger = StockLedger::new();

        let deltas = [-3, -2, 5, -1];
        for (i, delta) in deltas.iter().enumerate() {
            ledger
                .record_movement(
                    &mut directory,
                    "p1",
                    "w1",
                    *delta,
                    MovementReason::ManualAdjustment,
                    Some(&format!("adj-{}", i)),
                )
                .unwrap();
        }

        assert_eq!(
            directory.current_stock("p1", "w1").unwrap(),
            initial + ledger.balance("p1", "w1")
        );
    }

    #[test]
    fn test_query_newest_first_and_restartable() {
        let mut directory = directory_with(10);
        let mut ledger = StockLedger::new();

        ledger
            .record_movement(&mut directory, "p1", "w1", -1, MovementReason::PosSale, None)
            .unwrap();
        ledger
            .record_movement(&mut directory, "p1", "w1", 4, MovementReason::Return, None)
            .unwrap();

        let first_pass: Vec<i64> = ledger.query(None).map(|m| m.quantity).collect();
        assert_eq!(first_pass, vec![4, -1]);

        // The view restarts cleanly.
        let second_pass: Vec<i64> = ledger.query(None).map(|m| m.quantity).collect();
        assert_eq!(second_pass, first_pass);
    }

    #[test]
    fn test_query_filter() {
        let mut directory = directory_with(10);
        directory.upsert(Product {
            id: "p2".to_string(),
            sku: "CHIPS".to_string(),
            name: "Chips".to_string(),
            locations: vec![WarehouseStock {
                warehouse_id: "w2".to_string(),
                stock: 3,
                price_cents: 300,
            }],
        });
        let mut ledger = StockLedger::new();

        ledger
            .record_movement(
                &mut directory,
                "p1",
                "w1",
                -1,
                MovementReason::PosSale,
                Some("sale-1"),
            )
            .unwrap();
        ledger
            .record_movement(
                &mut directory,
                "p2",
                "w2",
                -2,
                MovementReason::InvoiceSale,
                Some("inv-1"),
            )
            .unwrap();

        assert_eq!(ledger.query(Some("p2")).count(), 1);
        assert_eq!(ledger.query(Some("SALE-1")).count(), 1);
        assert_eq!(ledger.query(Some("invoice")).count(), 1);
        assert_eq!(ledger.query(Some("")).count(), 2);
        assert_eq!(ledger.query(Some("nothing")).count(), 0);
    }

    #[test]
    fn test_movement_ids_unique_and_timestamps_ordered() {
        let mut directory = directory_with(10);
        let mut ledger = StockLedger::new();

        for _ in 0..3 {
            ledger
                .record_movement(&mut directory, "p1", "w1", -1, MovementReason::PosSale, None)
                .unwrap();
        }

        let movements = ledger.movements();
        let mut ids: Vec<&str> = movements.iter().map(|m| m.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);

        assert!(movements
            .windows(2)
            .all(|w| w[0].created_at <= w[1].created_at));
    }

    #[test]
    fn test_directory_upsert_replaces() {
        let mut directory = directory_with(10);
        directory.upsert(Product {
            id: "p1".to_string(),
            sku: "COLA-330".to_string(),
            name: "Cola 330ml (new)".to_string(),
            locations: vec![WarehouseStock {
                warehouse_id: "w1".to_string(),
                stock: 2,
                price_cents: 800,
            }],
        });

        assert_eq!(directory.products().len(), 1);
        assert_eq!(directory.get("p1").unwrap().name, "Cola 330ml (new)");
    }
}
