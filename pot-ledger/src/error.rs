//! Error types for the pot ledger

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Session not found in the store
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Player not found in a session roster
    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    /// Amount violates the 2-decimal-place money contract
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Transaction row is malformed or inconsistent
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// Backing store read failed
    #[error("Store error: {0}")]
    Store(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}
