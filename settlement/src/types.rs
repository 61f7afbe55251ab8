//! Core types for the settlement engine
//!
//! All results are value objects: fully determined by their inputs,
//! serializable for downstream formatters/persistence sinks, and never
//! mutated after construction.

use chrono::{DateTime, Utc};
use pot_ledger::{PlayerId, SessionId};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the pot a player ends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Standing {
    /// Net position ≥ 0: the pot owes the player
    Owed,
    /// Net position < 0: the player owes the pot
    Owes,
}

impl Standing {
    /// Classify a net amount. Zero counts as owed (a zero payout).
    pub fn from_net(net_amount: Decimal) -> Self {
        if net_amount >= Decimal::ZERO {
            Standing::Owed
        } else {
            Standing::Owes
        }
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Standing::Owed => write!(f, "owed"),
            Standing::Owes => write!(f, "owes"),
        }
    }
}

/// One player's derived net position
///
/// Recomputed on every call; never cached across ledger changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettlement {
    /// Player ID
    pub player_id: PlayerId,

    /// Display name, carried for downstream formatting
    pub player_name: String,

    /// Live chip balance at calculation time
    pub current_chips: Decimal,

    /// Sum of the player's non-voided buy-ins
    pub total_buy_ins: Decimal,

    /// current_chips - total_buy_ins
    pub net_amount: Decimal,

    /// Owes or owed classification of `net_amount`
    pub standing: Standing,
}

impl PlayerSettlement {
    /// True when the player neither owes nor is owed (within a cent).
    pub fn is_even(&self) -> bool {
        pot_ledger::money::is_settled(self.net_amount)
    }
}

/// A directed, single-purpose transfer in a payment plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Paying player
    pub from_player_id: PlayerId,

    /// Paying player's name
    pub from_player_name: String,

    /// Receiving player
    pub to_player_id: PlayerId,

    /// Receiving player's name
    pub to_player_name: String,

    /// Transfer amount; strictly positive, 2 decimal places
    pub amount: Decimal,
}

/// Optimized settlement for a whole session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedSettlement {
    /// Session settled
    pub session_id: SessionId,

    /// Net position per rostered player, roster order
    pub player_settlements: Vec<PlayerSettlement>,

    /// Transfers that settle everyone exactly
    pub payment_plan: Vec<Payment>,

    /// Sum of all plan amounts
    pub total_amount: Decimal,

    /// Number of transfers in the plan
    pub transaction_count: usize,

    /// Naive baseline: one payment per non-zero-net player
    pub direct_transaction_count: usize,

    /// Transfers eliminated versus the baseline
    pub transaction_reduction: usize,

    /// Reduction as a percentage of the baseline (0.0 – 100.0)
    pub reduction_percentage: f64,

    /// True when the net positions sum to zero within a cent
    pub is_balanced: bool,

    /// When this settlement was computed
    pub calculated_at: DateTime<Utc>,
}

impl OptimizedSettlement {
    /// Recompute the reduction percentage from the recorded counts.
    pub fn calculate_reduction_percentage(&self) -> f64 {
        ratio_to_percentage(self.transaction_reduction, self.direct_transaction_count)
    }

    /// Signed sum of plan entries touching a player: credits positive,
    /// debits negative.
    pub fn plan_sum_for(&self, player_id: PlayerId) -> Decimal {
        let mut sum = Decimal::ZERO;
        for payment in &self.payment_plan {
            if payment.to_player_id == player_id {
                sum = pot_ledger::money::add(sum, payment.amount);
            }
            if payment.from_player_id == player_id {
                sum = pot_ledger::money::sub(sum, payment.amount);
            }
        }
        sum
    }
}

/// Pot totals for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankBalance {
    /// Sum of all non-voided buy-ins
    pub total_buy_ins: Decimal,

    /// Sum of all non-voided cash-outs
    pub total_cash_outs: Decimal,

    /// total_buy_ins - total_cash_outs
    pub available_for_cash_out: Decimal,

    /// False when the house has paid out more than it took in, a
    /// data-integrity condition that must gate any further payout
    pub is_balanced: bool,
}

/// Early cash-out quote for one departing player
///
/// Insufficient pot funds is a business condition: it sets `can_payout`
/// to false rather than failing the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarlyCashOut {
    /// Player being quoted
    pub player_id: PlayerId,

    /// Player's name
    pub player_name: String,

    /// current_chips - total_buy_ins at quote time
    pub net_amount: Decimal,

    /// Whether the house pays the player or the player pays the house
    pub standing: Standing,

    /// Absolute amount changing hands
    pub settlement_amount: Decimal,

    /// True when the pot can cover the payout (always true when the player
    /// owes the house)
    pub can_payout: bool,

    /// Pot figures the payout check was made against, for display/audit
    pub bank_balance: BankBalance,

    /// When the quote was computed
    pub quoted_at: DateTime<Utc>,
}

/// Severity of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Invalidates the settlement
    Critical,
    /// Non-fatal anomaly
    Warning,
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Machine-readable code (e.g. `PLAN_IMBALANCED`, `PLAYER_MISMATCH`)
    pub code: String,

    /// Severity of the finding
    pub severity: Severity,

    /// Offending player, when the finding is player-specific
    pub player_id: Option<PlayerId>,

    /// Human-readable description
    pub message: String,
}

/// Result of validating an [`OptimizedSettlement`]
///
/// Advisory only: validation never mutates the settlement it checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementValidation {
    /// True when no critical errors were found
    pub is_valid: bool,

    /// Critical findings
    pub errors: Vec<ValidationIssue>,

    /// Non-fatal findings (reserved; currently always empty)
    pub warnings: Vec<ValidationIssue>,

    /// Ordered human-readable narrative of every check performed
    pub audit_trail: Vec<String>,

    /// When validation ran
    pub validated_at: DateTime<Utc>,
}

impl SettlementValidation {
    /// True when any critical finding was recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Settlement pipeline phase for one session
///
/// `Idle` is both the initial state and the state after a reset;
/// `Completed` is only reached when validation passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementPhase {
    /// No optimization has run (or the session was reset)
    Idle,
    /// An optimization is in flight
    Optimizing,
    /// The last optimization produced a validated settlement
    Completed,
    /// The last optimization hit a system error or failed validation
    Error,
}

impl SettlementPhase {
    /// True for `Completed` and `Error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SettlementPhase::Completed | SettlementPhase::Error)
    }
}

/// Helper shared by plans and quotes: percentage as a display float.
pub(crate) fn ratio_to_percentage(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    (Decimal::from(numerator as u64) / Decimal::from(denominator as u64))
        .to_f64()
        .unwrap_or(0.0)
        * 100.0
}
