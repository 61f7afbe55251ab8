//! Settlement Optimization & Validation Engine
//!
//! Turns a session's ledger of buy-ins and cash-outs into per-player net
//! positions, an early-cash-out quote, a minimized peer-to-peer payment
//! plan, and a mathematical validation of that plan.
//!
//! # Architecture
//!
//! The pipeline runs against a single ledger snapshot taken up front:
//!
//! 1. **Balances**: Derive each player's net position from chips and buy-ins
//! 2. **Optimization**: Greedily pair debtors with creditors into transfers
//! 3. **Validation**: Re-derive balance and per-player checks independently
//!
//! The engine persists nothing and caches nothing across calls; every
//! result is recomputed from the current ledger. Business conditions
//! (insufficient pot, imbalanced plan) are reported as data; only
//! infrastructure failures surface as [`Error`].
//!
//! # Example
//!
//! ```no_run
//! use pot_ledger::{MemoryLedger, SessionId};
//! use settlement::{Config, SettlementEngine};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> settlement::Result<()> {
//!     let ledger = Arc::new(MemoryLedger::new());
//!     let engine = SettlementEngine::new(ledger, Config::default())?;
//!
//!     let session = SessionId::new();
//!     let settlement = engine.optimize_settlement(session).await?;
//!     println!(
//!         "{} payments settle {} players",
//!         settlement.transaction_count,
//!         settlement.player_settlements.len()
//!     );
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod balance;
pub mod cashout;
pub mod config;
pub mod engine;
pub mod error;
pub mod optimizer;
pub mod types;
pub mod validator;

// Re-exports
pub use balance::{BalanceCalculator, BankBalanceTracker};
pub use cashout::EarlyCashOutCalculator;
pub use config::Config;
pub use engine::SettlementEngine;
pub use error::{Error, Result};
pub use optimizer::DebtOptimizer;
pub use types::*;
pub use validator::SettlementValidator;
