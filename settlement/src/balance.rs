//! Balance derivation
//!
//! [`BalanceCalculator`] turns a roster plus transaction history into one
//! [`PlayerSettlement`] per player; [`BankBalanceTracker`] aggregates the
//! pot totals. Both are pure functions of a ledger snapshot: voided
//! transactions are filtered here regardless of what the store promised.

use crate::types::{BankBalance, PlayerSettlement, Standing};
use pot_ledger::{
    money,
    types::{Player, Transaction, TransactionKind},
};
use rust_decimal::Decimal;

/// Derives per-player net positions from a ledger snapshot.
#[derive(Debug, Default)]
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Create a calculator
    pub fn new() -> Self {
        Self
    }

    /// One settlement per rostered player, in roster order.
    ///
    /// `net_amount = current_chips - total_buy_ins`. A player with no
    /// transactions nets to their raw chip count (zero when they hold no
    /// chips). Amounts route through the shared money primitives.
    pub fn calculate(
        &self,
        players: &[Player],
        transactions: &[Transaction],
    ) -> Vec<PlayerSettlement> {
        players
            .iter()
            .map(|player| {
                let total_buy_ins = transactions
                    .iter()
                    .filter(|tx| {
                        tx.is_active()
                            && tx.player_id == player.player_id
                            && tx.kind == TransactionKind::BuyIn
                    })
                    .fold(Decimal::ZERO, |acc, tx| money::add(acc, tx.amount));

                let current_chips = money::round2(player.current_chips);
                let net_amount = money::sub(current_chips, total_buy_ins);

                PlayerSettlement {
                    player_id: player.player_id,
                    player_name: player.name.clone(),
                    current_chips,
                    total_buy_ins,
                    net_amount,
                    standing: Standing::from_net(net_amount),
                }
            })
            .collect()
    }
}

/// Aggregates pot totals from a ledger snapshot.
#[derive(Debug, Default)]
pub struct BankBalanceTracker;

impl BankBalanceTracker {
    /// Create a tracker
    pub fn new() -> Self {
        Self
    }

    /// Sum non-voided buy-ins and cash-outs into a [`BankBalance`].
    ///
    /// `is_balanced == false` means the house has paid out more than it
    /// took in; a correctly recorded ledger never produces it, but every
    /// payout must check it.
    pub fn calculate(&self, transactions: &[Transaction]) -> BankBalance {
        let mut total_buy_ins = Decimal::ZERO;
        let mut total_cash_outs = Decimal::ZERO;

        for tx in transactions.iter().filter(|tx| tx.is_active()) {
            match tx.kind {
                TransactionKind::BuyIn => {
                    total_buy_ins = money::add(total_buy_ins, tx.amount);
                }
                TransactionKind::CashOut => {
                    total_cash_outs = money::add(total_cash_outs, tx.amount);
                }
            }
        }

        let available_for_cash_out = money::sub(total_buy_ins, total_cash_outs);

        BankBalance {
            total_buy_ins,
            total_cash_outs,
            available_for_cash_out,
            is_balanced: available_for_cash_out >= Decimal::ZERO,
        }
    }
}
