//! End-to-end register flows over a real (temporary) store.

use till_core::{MovementReason, PaymentMethod, Product, TillState, WarehouseStock};
use till_register::{ErrorCode, Register};
use till_store::{Store, StoreConfig};

fn product(id: &str, sku: &str, price_cents: i64, stock: i64) -> Product {
    Product {
        id: id.to_string(),
        sku: sku.to_string(),
        name: format!("{} (test)", sku),
        locations: vec![WarehouseStock {
            warehouse_id: "main".to_string(),
            stock,
            price_cents,
        }],
    }
}

fn register_at(dir: &tempfile::TempDir) -> Register {
    let store = Store::open(StoreConfig::new(dir.path())).unwrap();
    Register::open(store).unwrap()
}

fn seeded_register(dir: &tempfile::TempDir) -> Register {
    let mut register = register_at(dir);
    register
        .upsert_product(product("p-cola", "COLA-330", 750, 10))
        .unwrap();
    register
        .upsert_product(product("p-bag", "BAG", 80, 50))
        .unwrap();
    register
        .upsert_product(product("p-gone", "GONE", 500, 0))
        .unwrap();
    register
}

/// Open 50000, sell one item at 750 for cash tendering 1000: total 750, one
/// −1 ledger movement referencing the sale.
#[test]
fn cash_sale_posts_sale_and_ledger_movement() {
    let dir = tempfile::tempdir().unwrap();
    let mut register = seeded_register(&dir);

    register.open_session(50_000).unwrap();
    register.add_to_cart("p-cola").unwrap();

    assert_eq!(register.change_due(1_000).unwrap(), 250);

    let receipt = register.confirm_sale(PaymentMethod::Cash).unwrap();
    assert_eq!(receipt.total_cents, 750);
    assert_eq!(receipt.lines.len(), 1);
    assert_eq!(receipt.lines[0].quantity, 1);

    let session = register.active_session().unwrap();
    assert_eq!(session.sales.len(), 1);
    assert_eq!(session.sales[0].total_cents, 750);

    let movements = register.stock_movements(None).unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].product_id, "p-cola");
    assert_eq!(movements[0].warehouse_id, "main");
    assert_eq!(movements[0].quantity, -1);
    assert_eq!(movements[0].reason, MovementReason::PosSale);
    assert_eq!(
        movements[0].reference_id.as_deref(),
        Some(receipt.sale_id.as_str())
    );

    assert_eq!(register.directory().current_stock("p-cola", "main"), Some(9));
}

/// Open 50000, one cash sale of 750 and one transfer sale of 80, close at
/// 50750: expected cash 50750, difference 0.
#[test]
fn close_session_reconciles_cash_only() {
    let dir = tempfile::tempdir().unwrap();
    let mut register = seeded_register(&dir);

    register.open_session(50_000).unwrap();

    register.add_to_cart("p-cola").unwrap();
    register.confirm_sale(PaymentMethod::Cash).unwrap();

    register.add_to_cart("p-bag").unwrap();
    register.confirm_sale(PaymentMethod::Transfer).unwrap();

    let closed = register.close_session(50_750).unwrap();

    assert_eq!(closed.sale_count, 2);
    assert_eq!(closed.total_sales_cents, 830);
    assert_eq!(closed.reconciliation.cash_sales_cents, 750);
    assert_eq!(closed.reconciliation.expected_cash_cents, 50_750);
    assert_eq!(closed.reconciliation.difference_cents, 0);
    assert!(closed.reconciliation.is_balanced());
    assert_eq!(register.till_state(), TillState::NoSession);
}

/// Adding a product whose primary location has zero stock fails with
/// OutOfStock and leaves the cart unchanged.
#[test]
fn out_of_stock_product_cannot_enter_cart() {
    let dir = tempfile::tempdir().unwrap();
    let mut register = seeded_register(&dir);

    register.open_session(0).unwrap();

    let err = register.add_to_cart("p-gone").unwrap_err();
    assert_eq!(err.code, ErrorCode::OutOfStock);
    assert!(register.cart().items.is_empty());
}

/// Confirming an empty cart fails with EmptyCart: no session mutation, no
/// ledger movement.
#[test]
fn empty_cart_cannot_be_confirmed() {
    let dir = tempfile::tempdir().unwrap();
    let mut register = seeded_register(&dir);

    register.open_session(1_000).unwrap();

    let err = register.confirm_sale(PaymentMethod::Cash).unwrap_err();
    assert_eq!(err.code, ErrorCode::EmptyCart);
    assert!(register.active_session().unwrap().sales.is_empty());
    assert!(register.stock_movements(None).unwrap().is_empty());
}

/// Closing while no session is open fails with InvalidState.
#[test]
fn close_without_session_is_invalid_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut register = seeded_register(&dir);

    let err = register.close_session(0).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);
}

/// A negative opening balance is rejected and the till stays idle.
#[test]
fn negative_opening_balance_is_invalid_amount() {
    let dir = tempfile::tempdir().unwrap();
    let mut register = seeded_register(&dir);

    let err = register.open_session(-100).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidAmount);
    assert_eq!(register.till_state(), TillState::NoSession);
}

/// An open session survives a process restart: a new register over the
/// same store resumes it with its sales intact.
#[test]
fn active_session_resumes_after_restart() {
    let dir = tempfile::tempdir().unwrap();

    let session_id = {
        let mut register = seeded_register(&dir);
        let opened = register.open_session(50_000).unwrap();
        register.add_to_cart("p-cola").unwrap();
        register.confirm_sale(PaymentMethod::Cash).unwrap();
        opened.session_id
    };

    let mut register = register_at(&dir);
    assert_eq!(register.till_state(), TillState::Open);

    let session = register.active_session().unwrap();
    assert_eq!(session.id, session_id);
    assert_eq!(session.sales.len(), 1);

    // The resumed session closes normally.
    let closed = register.close_session(50_750).unwrap();
    assert_eq!(closed.reconciliation.difference_cents, 0);

    // And is gone for the next restart.
    let register = register_at(&dir);
    assert_eq!(register.till_state(), TillState::NoSession);
}

/// History lists closed sessions newest-opening-first with summaries
/// recomputed from the stored sales.
#[test]
fn session_history_summaries() {
    let dir = tempfile::tempdir().unwrap();
    let mut register = seeded_register(&dir);

    register.open_session(1_000).unwrap();
    register.add_to_cart("p-cola").unwrap();
    register.confirm_sale(PaymentMethod::Cash).unwrap();
    register.close_session(1_750).unwrap();

    register.open_session(2_000).unwrap();
    register.add_to_cart("p-bag").unwrap();
    register.confirm_sale(PaymentMethod::Check).unwrap();
    register.close_session(1_900).unwrap();

    let history = register.session_history().unwrap();
    assert_eq!(history.len(), 2);

    // Newest opening first.
    assert!(history[0].opening_time >= history[1].opening_time);
    assert_eq!(history[0].opening_balance_cents, 2_000);
    assert_eq!(history[0].cash_sales_cents, 0);
    assert_eq!(history[0].expected_cash_cents, 2_000);
    assert_eq!(history[0].difference_cents, -100);

    assert_eq!(history[1].difference_cents, 0);
    assert_eq!(history[1].total_sales_cents, 750);

    // Recomputing yields identical summaries.
    assert_eq!(register.session_history().unwrap(), history);
}

/// Stock stays consistent with the ledger across sales, adjustments and a
/// restart: current = initial + Σ deltas.
#[test]
fn stock_consistency_across_flows_and_restart() {
    let dir = tempfile::tempdir().unwrap();
    let initial = 10;

    {
        let mut register = seeded_register(&dir);
        register.open_session(0).unwrap();

        register.add_to_cart("p-cola").unwrap();
        register.update_cart_quantity("p-cola", 3).unwrap();
        register.confirm_sale(PaymentMethod::DebitCard).unwrap();

        register
            .record_movement("p-cola", "main", -2, MovementReason::InvoiceSale, Some("inv-1"))
            .unwrap();
        register
            .record_movement("p-cola", "main", 5, MovementReason::Return, None)
            .unwrap();
    }

    let register = register_at(&dir);
    let movements = register.stock_movements(Some("p-cola")).unwrap();
    let delta: i64 = movements.iter().map(|m| m.quantity).sum();

    assert_eq!(delta, -3 - 2 + 5);
    assert_eq!(
        register.directory().current_stock("p-cola", "main"),
        Some(initial + delta)
    );

    // Newest first: the replenishment is the most recent movement.
    assert_eq!(movements[0].quantity, 5);
}

/// A second open while a session is trading is refused.
#[test]
fn open_session_twice_is_invalid_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut register = seeded_register(&dir);

    register.open_session(100).unwrap();
    let err = register.open_session(100).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);
}
