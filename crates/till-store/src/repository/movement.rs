//! # Stock Movement Repository
//!
//! Persistence for the stock ledger. The stored document is the full
//! movement log, oldest first; movements are append-only and never edited
//! or deleted once stored.

use tracing::debug;

use crate::error::StoreResult;
use crate::store::{Store, KEY_STOCK_MOVEMENTS};
use till_core::StockMovement;

/// Repository for the persisted stock ledger.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    store: Store,
}

impl MovementRepository {
    /// Creates a new MovementRepository.
    pub fn new(store: Store) -> Self {
        MovementRepository { store }
    }

    /// Loads the full movement log, oldest first. An absent document loads
    /// as an empty ledger.
    pub fn load(&self) -> StoreResult<Vec<StockMovement>> {
        let movements: Vec<StockMovement> =
            self.store.read(KEY_STOCK_MOVEMENTS)?.unwrap_or_default();
        debug!(count = movements.len(), "Loaded stock movements");
        Ok(movements)
    }

    /// Replaces the stored log with `movements`.
    ///
    /// Callers only ever extend the log they loaded; the ledger is
    /// append-only above this layer.
    pub fn save(&self, movements: &[StockMovement]) -> StoreResult<()> {
        debug!(count = movements.len(), "Saving stock movements");
        self.store.write(KEY_STOCK_MOVEMENTS, &movements)
    }

    /// Appends a single movement to the stored log.
    pub fn append(&self, movement: &StockMovement) -> StoreResult<()> {
        let mut movements = self.load()?;
        movements.push(movement.clone());
        self.save(&movements)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreConfig;
    use chrono::Utc;
    use till_core::MovementReason;

    fn repo() -> (tempfile::TempDir, MovementRepository) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(StoreConfig::new(dir.path())).unwrap();
        (dir, store.movements())
    }

    fn movement(id: &str, quantity: i64) -> StockMovement {
        StockMovement {
            id: id.to_string(),
            product_id: "p1".to_string(),
            warehouse_id: "w1".to_string(),
            quantity,
            reason: MovementReason::PosSale,
            reference_id: Some("sale-1".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_store_loads_empty_ledger() {
        let (_dir, repo) = repo();
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let (_dir, repo) = repo();

        repo.append(&movement("m1", -1)).unwrap();
        repo.append(&movement("m2", -2)).unwrap();

        let loaded = repo.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "m1");
        assert_eq!(loaded[1].id, "m2");
    }

    /// Timestamps survive the ISO-8601 round trip exactly.
    #[test]
    fn test_movement_round_trip() {
        let (_dir, repo) = repo();

        let original = movement("m1", -3);
        repo.append(&original).unwrap();

        let loaded = repo.load().unwrap();
        assert_eq!(loaded[0], original);
        assert_eq!(loaded[0].created_at, original.created_at);
    }
}
