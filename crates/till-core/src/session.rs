//! # Cash Register Session (state machine)
//!
//! One till's lifecycle: opening balance, recorded sales, closing
//! reconciliation.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Till State Machine                          │
//! │                                                                 │
//! │              open_session(balance >= 0)                         │
//! │   ┌───────────┐ ─────────────────────────► ┌───────────┐       │
//! │   │ NoSession │                            │   Open    │       │
//! │   │ (idle)    │ ◄───────────────────────── │ (trading) │       │
//! │   └───────────┘  close_session(counted)    └───────────┘       │
//! │                  │                                              │
//! │                  ▼                                              │
//! │          Closed session (immutable) ──► Session History         │
//! │                                                                 │
//! │   No Open → Open re-entry. No reopening a Closed session.       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Closing computes `expected_cash = opening_balance + cash_sales` and
//! reports `difference = counted − expected`. The difference is reported,
//! never corrected: zero is the reconciled case, any other value is
//! informational.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CashRegisterSession, PosSale};

// =============================================================================
// Till State
// =============================================================================

/// The two externally observable till states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TillState {
    /// No session is open; the till is idle.
    NoSession,
    /// A session is open and trading.
    Open,
}

impl TillState {
    /// Stable label used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            TillState::NoSession => "idle",
            TillState::Open => "open",
        }
    }
}

// =============================================================================
// Reconciliation
// =============================================================================

/// The close-of-session comparison of expected vs. counted cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    /// Σ sale totals where the payment method was cash.
    pub cash_sales_cents: i64,
    /// opening balance + cash sales.
    pub expected_cash_cents: i64,
    /// What the operator counted in the drawer.
    pub counted_cents: i64,
    /// counted − expected. Zero when the drawer reconciled.
    pub difference_cents: i64,
}

impl Reconciliation {
    /// Whether counted cash matched expected cash exactly.
    #[inline]
    pub fn is_balanced(&self) -> bool {
        self.difference_cents == 0
    }
}

// =============================================================================
// Till
// =============================================================================

/// One till: holds at most one open session.
///
/// Single-step operations (`open_session`, `close_session`) perform no
/// partial mutation: they either transition fully or fail leaving the till
/// exactly as it was.
#[derive(Debug, Default)]
pub struct Till {
    session: Option<CashRegisterSession>,
}

impl Till {
    /// Creates an idle till.
    pub fn new() -> Self {
        Till { session: None }
    }

    /// Creates a till resuming a previously persisted open session.
    ///
    /// A closed session cannot be resumed; the till starts idle instead.
    pub fn resume(session: CashRegisterSession) -> Self {
        if session.is_closed() {
            Till { session: None }
        } else {
            Till {
                session: Some(session),
            }
        }
    }

    /// Current state of the till.
    pub fn state(&self) -> TillState {
        if self.session.is_some() {
            TillState::Open
        } else {
            TillState::NoSession
        }
    }

    /// The open session, if any.
    pub fn session(&self) -> Option<&CashRegisterSession> {
        self.session.as_ref()
    }

    /// Opens a new session with the given opening balance.
    ///
    /// ## Failures
    /// - `InvalidAmount` when the balance is negative (till unchanged)
    /// - `InvalidState` when a session is already open
    pub fn open_session(&mut self, opening_balance: Money) -> CoreResult<&CashRegisterSession> {
        if opening_balance.is_negative() {
            return Err(CoreError::InvalidAmount {
                field: "opening balance",
                cents: opening_balance.cents(),
            });
        }

        if self.session.is_some() {
            return Err(CoreError::InvalidState {
                operation: "open a session",
                state: TillState::Open.as_str(),
            });
        }

        let session = CashRegisterSession {
            id: Uuid::new_v4().to_string(),
            opening_time: Utc::now(),
            opening_balance_cents: opening_balance.cents(),
            sales: Vec::new(),
            closing_time: None,
            closing_balance_cents: None,
        };
        Ok(self.session.insert(session))
    }

    /// Appends a confirmed sale to the open session.
    ///
    /// ## Failures
    /// - `InvalidState` when no session is open
    pub fn record_sale(&mut self, sale: PosSale) -> CoreResult<()> {
        match self.session.as_mut() {
            Some(session) => {
                session.sales.push(sale);
                Ok(())
            }
            None => Err(CoreError::InvalidState {
                operation: "record a sale",
                state: TillState::NoSession.as_str(),
            }),
        }
    }

    /// Closes the open session against a counted cash amount.
    ///
    /// Returns the closed, now-immutable session (for the history store)
    /// and the reconciliation report. The till returns to `NoSession`.
    ///
    /// ## Failures
    /// - `InvalidAmount` when the counted amount is negative (till unchanged)
    /// - `InvalidState` when no session is open
    pub fn close_session(
        &mut self,
        counted_cash: Money,
    ) -> CoreResult<(CashRegisterSession, Reconciliation)> {
        if counted_cash.is_negative() {
            return Err(CoreError::InvalidAmount {
                field: "counted cash",
                cents: counted_cash.cents(),
            });
        }

        let mut session = self.session.take().ok_or(CoreError::InvalidState {
            operation: "close the session",
            state: TillState::NoSession.as_str(),
        })?;

        let cash_sales_cents = session.cash_sales_cents();
        let expected_cash_cents = session.expected_cash_cents();
        let reconciliation = Reconciliation {
            cash_sales_cents,
            expected_cash_cents,
            counted_cents: counted_cash.cents(),
            difference_cents: counted_cash.cents() - expected_cash_cents,
        };

        session.closing_time = Some(Utc::now());
        session.closing_balance_cents = Some(counted_cash.cents());

        Ok((session, reconciliation))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
