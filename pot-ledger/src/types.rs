//! Core types for the pot ledger
//!
//! All types are designed for:
//! - Exact arithmetic (Decimal for money)
//! - Serde round-tripping (downstream formatters and persistence sinks)
//! - Immutability: transactions are never edited, only voided

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a fresh session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Player identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(Uuid);

impl PlayerId {
    /// Create a fresh player ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Create a fresh transaction ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Player puts cash into the pot for chips
    BuyIn,
    /// Player redeems chips for cash from the pot
    CashOut,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::BuyIn => write!(f, "buy-in"),
            TransactionKind::CashOut => write!(f, "cash-out"),
        }
    }
}

/// A recorded buy-in or cash-out
///
/// Immutable once created. Voided transactions stay in the ledger for audit
/// but are excluded from every calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID
    pub id: TransactionId,

    /// Session this transaction belongs to
    pub session_id: SessionId,

    /// Player who bought in or cashed out
    pub player_id: PlayerId,

    /// Buy-in or cash-out
    pub kind: TransactionKind,

    /// Cash amount, 2-decimal precision, strictly positive
    pub amount: Decimal,

    /// When the transaction was recorded
    pub timestamp: DateTime<Utc>,

    /// Voided transactions are kept for audit but never counted
    pub voided: bool,
}

impl Transaction {
    /// Create a new non-voided transaction, validating the amount scale.
    pub fn new(
        session_id: SessionId,
        player_id: PlayerId,
        kind: TransactionKind,
        amount: Decimal,
    ) -> crate::Result<Self> {
        let amount = crate::money::check_scale(amount)?;
        if amount <= Decimal::ZERO {
            return Err(crate::Error::InvalidTransaction(format!(
                "{} amount must be positive, got {}",
                kind, amount
            )));
        }

        Ok(Self {
            id: TransactionId::new(),
            session_id,
            player_id,
            kind,
            amount,
            timestamp: Utc::now(),
            voided: false,
        })
    }

    /// True when this transaction counts toward balances.
    pub fn is_active(&self) -> bool {
        !self.voided
    }
}

/// Roster entry: a player and their live chip count
///
/// Chip counts are maintained by the caller (the table), not derived from
/// the transaction ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Player ID
    pub player_id: PlayerId,

    /// Display name
    pub name: String,

    /// Live chip balance in currency units
    pub current_chips: Decimal,
}

impl Player {
    /// Create a roster entry
    pub fn new(player_id: PlayerId, name: impl Into<String>, current_chips: Decimal) -> Self {
        Self {
            player_id,
            name: name.into(),
            current_chips,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_rejects_bad_scale() {
        let session = SessionId::new();
        let player = PlayerId::new();

        let result = Transaction::new(
            session,
            player,
            TransactionKind::BuyIn,
            Decimal::new(10001, 3), // 10.001
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_transaction_rejects_non_positive() {
        let session = SessionId::new();
        let player = PlayerId::new();

        assert!(
            Transaction::new(session, player, TransactionKind::BuyIn, Decimal::ZERO).is_err()
        );
        assert!(Transaction::new(
            session,
            player,
            TransactionKind::CashOut,
            Decimal::new(-100, 2)
        )
        .is_err());
    }

    #[test]
    fn test_voided_is_not_active() {
        let session = SessionId::new();
        let player = PlayerId::new();

        let mut tx =
            Transaction::new(session, player, TransactionKind::BuyIn, Decimal::new(5000, 2))
                .unwrap();
        assert!(tx.is_active());

        tx.voided = true;
        assert!(!tx.is_active());
    }
}
