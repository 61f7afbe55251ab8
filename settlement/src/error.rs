//! Error types for the settlement engine
//!
//! These are system errors only: unreachable roster, corrupt ledger rows,
//! bad configuration. Business outcomes (insufficient pot funds, an
//! imbalanced plan) are returned as data, never as `Error`.

use pot_ledger::SessionId;
use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
///
/// Each variant carries a stable code (see [`Error::code`]) so callers can
/// branch without matching on message text.
#[derive(Error, Debug)]
pub enum Error {
    /// Early cash-out quote failed on an infrastructure read
    #[error("Early cash-out failed for session {session_id}: {source}")]
    EarlyCashOut {
        /// Session being quoted
        session_id: SessionId,
        /// Originating ledger error
        #[source]
        source: pot_ledger::Error,
    },

    /// Settlement optimization failed on an infrastructure read
    #[error("Optimization failed for session {session_id}: {source}")]
    Optimization {
        /// Session being optimized
        session_id: SessionId,
        /// Originating ledger error
        #[source]
        source: pot_ledger::Error,
    },

    /// Validation failed on an infrastructure error (a logically invalid
    /// plan is reported in the result, not here)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Bank balance calculation failed on an infrastructure read
    #[error("Bank balance failed for session {session_id}: {source}")]
    BankBalance {
        /// Session being summed
        session_id: SessionId,
        /// Originating ledger error
        #[source]
        source: pot_ledger::Error,
    },

    /// Engine construction failed
    #[error("Settlement engine init failed: {0}")]
    Init(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Ledger error outside a specific operation context
    #[error("Ledger error: {0}")]
    Ledger(#[from] pot_ledger::Error),
}

impl Error {
    /// Stable machine-readable code for this error class.
    pub fn code(&self) -> &'static str {
        match self {
            Error::EarlyCashOut { .. } => "EARLY_CASHOUT_FAILED",
            Error::Optimization { .. } => "OPTIMIZATION_FAILED",
            Error::Validation(_) => "VALIDATION_FAILED",
            Error::BankBalance { .. } => "BANK_BALANCE_FAILED",
            Error::Init(_) | Error::Config(_) => "SETTLEMENT_INIT_FAILED",
            Error::Ledger(_) => "OPTIMIZATION_FAILED",
        }
    }
}
