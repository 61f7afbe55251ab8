//! Property-based tests for settlement invariants
//!
//! These tests use proptest to verify the engine's contract:
//! - Zero-sum: generated net positions sum to ~0 and stay settled
//! - Plan correctness: per-player signed plan sums equal recorded nets
//! - Non-regression: optimized count never exceeds the direct baseline
//! - Idempotence: validating the same settlement twice is identical

use chrono::Utc;
use pot_ledger::{money, MemoryLedger, Player, PlayerId, SessionId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use settlement::{
    Config, DebtOptimizer, OptimizedSettlement, PlayerSettlement, SettlementEngine,
    SettlementValidator, Standing,
};
use std::sync::Arc;

/// Strategy for a zero-sum set of net positions, in cents.
///
/// Generates n-1 free positions and balances the last one so the whole
/// table nets to zero, like a real chip-conserving session.
fn zero_sum_nets_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-500_000i64..500_000i64, 1..12).prop_map(|mut nets| {
        let sum: i64 = nets.iter().sum();
        nets.push(-sum);
        nets
    })
}

fn settlements_from_nets(nets: &[i64]) -> Vec<PlayerSettlement> {
    nets.iter()
        .enumerate()
        .map(|(i, cents)| {
            let net = Decimal::new(*cents, 2);
            PlayerSettlement {
                player_id: PlayerId::new(),
                player_name: format!("P{}", i),
                current_chips: Decimal::ZERO,
                total_buy_ins: Decimal::ZERO,
                net_amount: net,
                standing: Standing::from_net(net),
            }
        })
        .collect()
}

fn settlement_from(player_settlements: Vec<PlayerSettlement>) -> OptimizedSettlement {
    let optimizer = DebtOptimizer::new();
    let payment_plan = optimizer.optimize(&player_settlements);
    let direct = optimizer.direct_transaction_count(&player_settlements);
    let total_amount = payment_plan
        .iter()
        .fold(Decimal::ZERO, |acc, p| money::add(acc, p.amount));

    OptimizedSettlement {
        session_id: SessionId::new(),
        transaction_count: payment_plan.len(),
        direct_transaction_count: direct,
        transaction_reduction: direct.saturating_sub(payment_plan.len()),
        reduction_percentage: 0.0,
        total_amount,
        is_balanced: true,
        calculated_at: Utc::now(),
        player_settlements,
        payment_plan,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: zero-sum inputs stay zero-sum through the money primitives
    #[test]
    fn prop_zero_sum_preserved(nets in zero_sum_nets_strategy()) {
        let settlements = settlements_from_nets(&nets);
        let sum = settlements
            .iter()
            .fold(Decimal::ZERO, |acc, s| money::add(acc, s.net_amount));
        prop_assert!(money::is_settled(sum));
    }

    /// Property: every plan entry is strictly positive with 2-dp amounts,
    /// and the plan length never exceeds the standard bound
    #[test]
    fn prop_plan_entries_well_formed(nets in zero_sum_nets_strategy()) {
        let settlements = settlements_from_nets(&nets);
        let plan = DebtOptimizer::new().optimize(&settlements);

        let debtors = settlements.iter().filter(|s| s.net_amount < Decimal::ZERO && !s.is_even()).count();
        let creditors = settlements.iter().filter(|s| s.net_amount > Decimal::ZERO && !s.is_even()).count();

        if debtors > 0 && creditors > 0 {
            prop_assert!(plan.len() <= debtors + creditors - 1);
        } else {
            prop_assert!(plan.is_empty());
        }

        for payment in &plan {
            prop_assert!(payment.amount > Decimal::ZERO);
            prop_assert_eq!(payment.amount, money::round2(payment.amount));
        }
    }

    /// Property: each player's signed plan sum reproduces their net
    #[test]
    fn prop_plan_settles_every_player(nets in zero_sum_nets_strategy()) {
        let settlement = settlement_from(settlements_from_nets(&nets));

        for player in &settlement.player_settlements {
            let plan_sum = settlement.plan_sum_for(player.player_id);
            prop_assert!(
                money::approx_eq(plan_sum, player.net_amount),
                "player {} nets {} but plan sums to {}",
                player.player_name,
                player.net_amount,
                plan_sum
            );
        }
    }

    /// Property: optimization never increases the transfer count
    #[test]
    fn prop_never_worse_than_direct(nets in zero_sum_nets_strategy()) {
        let settlements = settlements_from_nets(&nets);
        let optimizer = DebtOptimizer::new();

        let plan = optimizer.optimize(&settlements);
        prop_assert!(plan.len() <= optimizer.direct_transaction_count(&settlements));
    }

    /// Property: the optimizer's output always passes validation
    #[test]
    fn prop_optimizer_output_validates(nets in zero_sum_nets_strategy()) {
        let settlement = settlement_from(settlements_from_nets(&nets));
        let validation = SettlementValidator::new().validate(&settlement);

        prop_assert!(validation.is_valid, "errors: {:?}", validation.errors);
    }

    /// Property: validation is deterministic for a fixed settlement
    #[test]
    fn prop_validation_idempotent(nets in zero_sum_nets_strategy()) {
        let settlement = settlement_from(settlements_from_nets(&nets));
        let validator = SettlementValidator::new();

        let first = validator.validate(&settlement);
        let second = validator.validate(&settlement);

        prop_assert_eq!(first.is_valid, second.is_valid);
        prop_assert_eq!(first.errors, second.errors);
        prop_assert_eq!(first.warnings, second.warnings);
        prop_assert_eq!(first.audit_trail, second.audit_trail);
    }

    /// Property: the direct fallback plan settles each debtor exactly
    #[test]
    fn prop_direct_plan_exact_per_debtor(nets in zero_sum_nets_strategy()) {
        let settlements = settlements_from_nets(&nets);
        let plan = DebtOptimizer::new().direct_plan(&settlements);

        for debtor in settlements.iter().filter(|s| s.net_amount < Decimal::ZERO && !s.is_even()) {
            let paid = plan
                .iter()
                .filter(|p| p.from_player_id == debtor.player_id)
                .fold(Decimal::ZERO, |acc, p| money::add(acc, p.amount));
            prop_assert!(
                money::approx_eq(paid, debtor.net_amount.abs()),
                "debtor {} owes {} but direct plan moves {}",
                debtor.player_name,
                debtor.net_amount.abs(),
                paid
            );
        }
    }

    /// Property: pot totals track buy-ins minus cash-outs exactly
    #[test]
    fn prop_bank_balance_exact(buy_ins in prop::collection::vec(1i64..100_000, 1..30),
                               cash_out_cents in 1i64..100_000) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let ledger = Arc::new(MemoryLedger::new());
            let session = SessionId::new();
            let player = PlayerId::new();
            ledger.put_roster(session, vec![Player::new(player, "Solo", Decimal::ZERO)]);

            let mut expected = Decimal::ZERO;
            for cents in &buy_ins {
                ledger
                    .record_buy_in(session, player, Decimal::new(*cents, 2))
                    .unwrap();
                expected = money::add(expected, Decimal::new(*cents, 2));
            }
            ledger
                .record_cash_out(session, player, Decimal::new(cash_out_cents, 2))
                .unwrap();
            expected = money::sub(expected, Decimal::new(cash_out_cents, 2));

            let engine = SettlementEngine::new(ledger, Config::default()).unwrap();
            let bank = engine.calculate_bank_balance(session).await.unwrap();

            prop_assert_eq!(bank.available_for_cash_out, expected);
            Ok(())
        })?;
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    /// Buy-in $100, cash out $175.50: the tracked profit must be exactly
    /// 75.50, never a floating-point artifact.
    #[tokio::test]
    async fn test_currency_safe_profit() {
        let ledger = Arc::new(MemoryLedger::new());
        let session = SessionId::new();
        let player = PlayerId::new();
        ledger.put_roster(
            session,
            vec![Player::new(player, "Runner", Decimal::new(17550, 2))],
        );
        ledger
            .record_buy_in(session, player, Decimal::new(10000, 2))
            .unwrap();

        let engine = SettlementEngine::new(ledger, Config::default()).unwrap();
        let quote = engine
            .calculate_early_cash_out(session, player)
            .await
            .unwrap();

        assert_eq!(quote.net_amount.to_string(), "75.50");
        assert_eq!(quote.settlement_amount, Decimal::new(7550, 2));
    }

    /// Full pipeline over a messy session: rebuys, a void, a mid-game
    /// cash-out, then a validated optimized settlement.
    #[tokio::test]
    async fn test_full_session_lifecycle() {
        let ledger = Arc::new(MemoryLedger::new());
        let session = SessionId::new();
        let alice = PlayerId::new();
        let bob = PlayerId::new();
        let carol = PlayerId::new();

        ledger.put_roster(
            session,
            vec![
                Player::new(alice, "Alice", Decimal::new(26000, 2)),
                Player::new(bob, "Bob", Decimal::new(4000, 2)),
                Player::new(carol, "Carol", Decimal::new(5000, 2)),
            ],
        );

        for id in [alice, bob, carol] {
            ledger
                .record_buy_in(session, id, Decimal::new(10000, 2))
                .unwrap();
        }
        // Bob rebuys, then the organizer voids a fat-fingered duplicate
        ledger
            .record_buy_in(session, bob, Decimal::new(5000, 2))
            .unwrap();
        let dup = ledger
            .record_buy_in(session, bob, Decimal::new(5000, 2))
            .unwrap();
        ledger.void_transaction(session, dup).unwrap();

        let engine = SettlementEngine::new(ledger, Config::default()).unwrap();
        let settlement = engine.optimize_settlement(session).await.unwrap();

        // Active buy-ins: Alice 100, Bob 150, Carol 100. Nets: Alice +160,
        // Bob -110, Carol -50, so both debts flow to Alice.
        assert!(settlement.is_balanced);
        assert_eq!(settlement.transaction_count, 2);
        assert_eq!(settlement.direct_transaction_count, 3);
        assert!(settlement
            .payment_plan
            .iter()
            .all(|p| p.to_player_name == "Alice"));

        let validation = engine.validate_settlement(&settlement).unwrap();
        assert!(validation.is_valid);
        assert!(validation
            .audit_trail
            .iter()
            .any(|step| step.contains("Balance check passed")));
    }
}
