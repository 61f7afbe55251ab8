//! Debt optimization
//!
//! Reduces a set of per-player net positions to a short list of
//! debtor-to-creditor transfers. The greedy pairing walks both lists in
//! roster/arrival order, NOT sorted by magnitude; downstream consumers
//! depend on this ordering, so do not switch it to largest-with-largest
//! without product sign-off. Pairing always converges in at most
//! `debtors + creditors - 1` transfers, the standard bound for debt
//! simplification, though arrival-order pairing does not guarantee the
//! theoretical minimum for every distribution.

use crate::types::Payment;
use crate::PlayerSettlement;
use pot_ledger::money;
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// Greedy debt-simplification engine.
#[derive(Debug, Default)]
pub struct DebtOptimizer;

impl DebtOptimizer {
    /// Create an optimizer
    pub fn new() -> Self {
        Self
    }

    /// Build the optimized payment plan.
    ///
    /// Players with a zero net (within a cent) are ignored. Each step
    /// transfers `min(debtor remaining, creditor remaining)` between the
    /// current first debtor and the current first creditor and retires
    /// whichever side drops below the cent epsilon, so every emitted
    /// amount is strictly positive.
    pub fn optimize(&self, settlements: &[PlayerSettlement]) -> Vec<Payment> {
        let mut debtors: VecDeque<(&PlayerSettlement, Decimal)> = settlements
            .iter()
            .filter(|s| s.net_amount < Decimal::ZERO && !s.is_even())
            .map(|s| (s, s.net_amount.abs()))
            .collect();

        let mut creditors: VecDeque<(&PlayerSettlement, Decimal)> = settlements
            .iter()
            .filter(|s| s.net_amount > Decimal::ZERO && !s.is_even())
            .map(|s| (s, s.net_amount))
            .collect();

        let mut plan = Vec::new();

        while let (Some(&(debtor, debt)), Some(&(creditor, credit))) =
            (debtors.front(), creditors.front())
        {
            let amount = money::round2(debt.min(credit));

            plan.push(Payment {
                from_player_id: debtor.player_id,
                from_player_name: debtor.player_name.clone(),
                to_player_id: creditor.player_id,
                to_player_name: creditor.player_name.clone(),
                amount,
            });

            let debt_left = money::sub(debt, amount);
            let credit_left = money::sub(credit, amount);

            if money::is_settled(debt_left) {
                debtors.pop_front();
            } else if let Some(front) = debtors.front_mut() {
                front.1 = debt_left;
            }

            if money::is_settled(credit_left) {
                creditors.pop_front();
            } else if let Some(front) = creditors.front_mut() {
                front.1 = credit_left;
            }
        }

        plan
    }

    /// Naive baseline transfer count: one payment per non-zero-net player.
    pub fn direct_transaction_count(&self, settlements: &[PlayerSettlement]) -> usize {
        settlements.iter().filter(|s| !s.is_even()).count()
    }

    /// Unoptimized direct plan, used when the optimization budget is blown.
    ///
    /// Every debtor pays every creditor their proportional share of the
    /// debt, with the final creditor absorbing the debtor's rounding
    /// remainder so each debtor settles exactly. This emits up to
    /// `debtors × creditors` transfers and makes no attempt to minimize.
    pub fn direct_plan(&self, settlements: &[PlayerSettlement]) -> Vec<Payment> {
        let debtors: Vec<&PlayerSettlement> = settlements
            .iter()
            .filter(|s| s.net_amount < Decimal::ZERO && !s.is_even())
            .collect();
        let creditors: Vec<&PlayerSettlement> = settlements
            .iter()
            .filter(|s| s.net_amount > Decimal::ZERO && !s.is_even())
            .collect();

        let total_credit = creditors
            .iter()
            .fold(Decimal::ZERO, |acc, c| money::add(acc, c.net_amount));
        if total_credit <= Decimal::ZERO {
            return Vec::new();
        }

        let mut plan = Vec::new();

        for debtor in &debtors {
            let debt = debtor.net_amount.abs();
            let mut remaining = debt;

            for (i, creditor) in creditors.iter().enumerate() {
                let amount = if i + 1 == creditors.len() {
                    remaining
                } else {
                    money::round2(debt * creditor.net_amount / total_credit)
                };

                if amount < money::EPSILON {
                    continue;
                }

                plan.push(Payment {
                    from_player_id: debtor.player_id,
                    from_player_name: debtor.player_name.clone(),
                    to_player_id: creditor.player_id,
                    to_player_name: creditor.player_name.clone(),
                    amount,
                });
                remaining = money::sub(remaining, amount);
            }
        }

        plan
    }
}
