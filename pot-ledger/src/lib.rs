//! ChipTally Pot Ledger
//!
//! Shared data model and read seam for shared-pot cash games.
//!
//! # Architecture
//!
//! - **Immutable transactions**: Buy-ins and cash-outs are never edited;
//!   corrections happen by voiding, and voided rows are kept for audit
//! - **Read-only seam**: The settlement engine consumes the ledger through
//!   the [`LedgerStore`] trait; persistence is the caller's concern
//! - **Exact arithmetic**: All amounts are `Decimal`, routed through the
//!   [`money`] primitives (round-half-up to 2 decimal places)
//!
//! # Invariants
//!
//! - Amounts admit at most 2 decimal places
//! - Voided transactions are excluded from every calculation
//! - Higher layers recompute derived state per call; nothing here caches

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod error;
pub mod money;
pub mod store;
pub mod types;

// Re-exports
pub use error::{Error, Result};
pub use store::{LedgerStore, MemoryLedger};
pub use types::{Player, PlayerId, SessionId, Transaction, TransactionId, TransactionKind};
