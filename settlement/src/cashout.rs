//! Early cash-out quoting
//!
//! Quotes what one departing player settles for right now, and whether the
//! pot can actually cover it. Insufficient funds is a business condition
//! carried in the result (`can_payout`), never an error: the caller decides
//! whether to block the cash-out, prompt for an organizer override, or
//! queue it.

use crate::{
    balance::{BalanceCalculator, BankBalanceTracker},
    types::{EarlyCashOut, Standing},
};
use chrono::Utc;
use pot_ledger::{
    types::{Player, PlayerId, Transaction},
    Error as LedgerError,
};

/// Quotes a single player's settlement at any point in a session.
#[derive(Debug, Default)]
pub struct EarlyCashOutCalculator {
    balances: BalanceCalculator,
    bank: BankBalanceTracker,
}

impl EarlyCashOutCalculator {
    /// Create a calculator
    pub fn new() -> Self {
        Self {
            balances: BalanceCalculator::new(),
            bank: BankBalanceTracker::new(),
        }
    }

    /// Quote `player_id` against a ledger snapshot.
    ///
    /// `net ≥ 0` means the house pays the player `net`; otherwise the
    /// player pays the house `|net|`. A payout is additionally checked
    /// against the pot's available funds. An unrostered player is a system
    /// error.
    pub fn quote(
        &self,
        players: &[Player],
        transactions: &[Transaction],
        player_id: PlayerId,
    ) -> pot_ledger::Result<EarlyCashOut> {
        let settlements = self.balances.calculate(players, transactions);
        let settlement = settlements
            .into_iter()
            .find(|s| s.player_id == player_id)
            .ok_or_else(|| LedgerError::PlayerNotFound(player_id.to_string()))?;

        let bank_balance = self.bank.calculate(transactions);

        let settlement_amount = settlement.net_amount.abs();
        let can_payout = match settlement.standing {
            // Player pays the house: no pot funds are needed
            Standing::Owes => true,
            Standing::Owed => settlement_amount <= bank_balance.available_for_cash_out,
        };

        tracing::debug!(
            %player_id,
            net = %settlement.net_amount,
            available = %bank_balance.available_for_cash_out,
            can_payout,
            "early cash-out quoted"
        );

        Ok(EarlyCashOut {
            player_id,
            player_name: settlement.player_name,
            net_amount: settlement.net_amount,
            standing: settlement.standing,
            settlement_amount,
            can_payout,
            bank_balance,
            quoted_at: Utc::now(),
        })
    }
}
