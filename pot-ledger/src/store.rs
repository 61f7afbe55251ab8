//! Read seam between the ledger and the settlement engine
//!
//! The engine never persists anything; it reads a transaction history and a
//! roster through [`LedgerStore`] and computes from that snapshot. The trait
//! exists so engines can be constructed against in-memory fakes in tests and
//! against real storage in the application.

use crate::{
    types::{Player, PlayerId, SessionId, Transaction, TransactionId, TransactionKind},
    Error, Result,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Read-only ledger and roster access for one or more sessions.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Full transaction history for a session, voided entries included.
    ///
    /// Callers filter voided rows themselves; implementations may pre-filter
    /// but the engine does not rely on it.
    async fn transaction_history(&self, session_id: SessionId) -> Result<Vec<Transaction>>;

    /// Roster with live chip counts, in seating/arrival order.
    async fn players(&self, session_id: SessionId) -> Result<Vec<Player>>;
}

#[derive(Debug, Default)]
struct SessionRecord {
    transactions: Vec<Transaction>,
    roster: Vec<Player>,
}

/// In-memory [`LedgerStore`] for tests, demos, and single-process callers.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    sessions: RwLock<HashMap<SessionId, SessionRecord>>,
}

impl MemoryLedger {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session with its roster. Replaces any existing roster.
    pub fn put_roster(&self, session_id: SessionId, roster: Vec<Player>) {
        let mut sessions = self.sessions.write();
        sessions.entry(session_id).or_default().roster = roster;
    }

    /// Update one player's live chip count.
    pub fn set_chips(&self, session_id: SessionId, player_id: PlayerId, chips: Decimal) -> Result<()> {
        let mut sessions = self.sessions.write();
        let record = sessions
            .get_mut(&session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;

        let player = record
            .roster
            .iter_mut()
            .find(|p| p.player_id == player_id)
            .ok_or_else(|| Error::PlayerNotFound(player_id.to_string()))?;

        player.current_chips = chips;
        Ok(())
    }

    /// Record a buy-in for a rostered player.
    pub fn record_buy_in(
        &self,
        session_id: SessionId,
        player_id: PlayerId,
        amount: Decimal,
    ) -> Result<TransactionId> {
        self.append(session_id, player_id, TransactionKind::BuyIn, amount)
    }

    /// Record a cash-out for a rostered player.
    pub fn record_cash_out(
        &self,
        session_id: SessionId,
        player_id: PlayerId,
        amount: Decimal,
    ) -> Result<TransactionId> {
        self.append(session_id, player_id, TransactionKind::CashOut, amount)
    }

    fn append(
        &self,
        session_id: SessionId,
        player_id: PlayerId,
        kind: TransactionKind,
        amount: Decimal,
    ) -> Result<TransactionId> {
        let tx = Transaction::new(session_id, player_id, kind, amount)?;
        let tx_id = tx.id;

        let mut sessions = self.sessions.write();
        let record = sessions
            .get_mut(&session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;

        if !record.roster.iter().any(|p| p.player_id == player_id) {
            return Err(Error::PlayerNotFound(player_id.to_string()));
        }

        tracing::debug!(%session_id, %player_id, %kind, %amount, "recorded transaction");
        record.transactions.push(tx);
        Ok(tx_id)
    }

    /// Void a transaction. It stays in the history for audit.
    pub fn void_transaction(&self, session_id: SessionId, tx_id: TransactionId) -> Result<()> {
        let mut sessions = self.sessions.write();
        let record = sessions
            .get_mut(&session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;

        let tx = record
            .transactions
            .iter_mut()
            .find(|t| t.id == tx_id)
            .ok_or_else(|| Error::InvalidTransaction(format!("no such transaction: {}", tx_id)))?;

        tx.voided = true;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn transaction_history(&self, session_id: SessionId) -> Result<Vec<Transaction>> {
        let sessions = self.sessions.read();
        let record = sessions
            .get(&session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        Ok(record.transactions.clone())
    }

    async fn players(&self, session_id: SessionId) -> Result<Vec<Player>> {
        let sessions = self.sessions.read();
        let record = sessions
            .get(&session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        Ok(record.roster.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_session(ledger: &MemoryLedger) -> (SessionId, PlayerId) {
        let session = SessionId::new();
        let alice = PlayerId::new();
        ledger.put_roster(
            session,
            vec![Player::new(alice, "Alice", Decimal::new(10000, 2))],
        );
        (session, alice)
    }

    #[tokio::test]
    async fn test_history_includes_voided_rows() {
        let ledger = MemoryLedger::new();
        let (session, alice) = seeded_session(&ledger);

        let tx1 = ledger
            .record_buy_in(session, alice, Decimal::new(5000, 2))
            .unwrap();
        ledger
            .record_buy_in(session, alice, Decimal::new(2500, 2))
            .unwrap();
        ledger.void_transaction(session, tx1).unwrap();

        let history = ledger.transaction_history(session).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.iter().filter(|t| t.voided).count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_session_is_an_error() {
        let ledger = MemoryLedger::new();
        let result = ledger.transaction_history(SessionId::new()).await;
        assert!(matches!(result, Err(Error::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn test_unrostered_player_rejected() {
        let ledger = MemoryLedger::new();
        let (session, _) = seeded_session(&ledger);

        let stranger = PlayerId::new();
        let result = ledger.record_buy_in(session, stranger, Decimal::new(1000, 2));
        assert!(matches!(result, Err(Error::PlayerNotFound(_))));
    }
}
