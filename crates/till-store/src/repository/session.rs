//! # Session Repository
//!
//! Persistence for cash-register sessions.
//!
//! ## Two Keys
//! ```text
//! pos_session   — the single active session, saved after every change
//!                 to it and removed entirely when the session closes
//! pos_sessions  — the history of closed sessions, append-only
//! ```
//!
//! A closed session in history is immutable: it is appended once and never
//! rewritten.

use tracing::{debug, info};

use crate::error::StoreResult;
use crate::store::{Store, KEY_ACTIVE_SESSION, KEY_SESSIONS};
use till_core::CashRegisterSession;

/// Repository for active-session state and closed-session history.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    store: Store,
}

impl SessionRepository {
    /// Creates a new SessionRepository.
    pub fn new(store: Store) -> Self {
        SessionRepository { store }
    }

    // -------------------------------------------------------------------------
    // Active session
    // -------------------------------------------------------------------------

    /// Loads the active session, if one was persisted.
    pub fn active(&self) -> StoreResult<Option<CashRegisterSession>> {
        self.store.read(KEY_ACTIVE_SESSION)
    }

    /// Persists the active session.
    pub fn save_active(&self, session: &CashRegisterSession) -> StoreResult<()> {
        debug!(session_id = %session.id, sales = session.sales.len(), "Saving active session");
        self.store.write(KEY_ACTIVE_SESSION, session)
    }

    /// Removes the active-session key entirely.
    pub fn clear_active(&self) -> StoreResult<()> {
        debug!("Clearing active session");
        self.store.remove(KEY_ACTIVE_SESSION)
    }

    // -------------------------------------------------------------------------
    // History
    // -------------------------------------------------------------------------

    /// Loads the closed-session history in stored (close) order. An absent
    /// document loads as empty history.
    pub fn history(&self) -> StoreResult<Vec<CashRegisterSession>> {
        let sessions: Vec<CashRegisterSession> =
            self.store.read(KEY_SESSIONS)?.unwrap_or_default();
        debug!(count = sessions.len(), "Loaded session history");
        Ok(sessions)
    }

    /// Appends a closed session to history.
    pub fn append_closed(&self, session: &CashRegisterSession) -> StoreResult<()> {
        let mut sessions = self.history()?;
        sessions.push(session.clone());
        self.store.write(KEY_SESSIONS, &sessions)?;
        info!(session_id = %session.id, "Closed session appended to history");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
