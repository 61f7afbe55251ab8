//! Settlement validation
//!
//! Independently re-derives two checks over a computed settlement and
//! reports them with a narrative audit trail:
//!
//! 1. **Balance**: total plan debits equal total plan credits (both equal
//!    the sum owed by negative-net players) within a cent
//! 2. **Per-player**: each player's signed plan sum equals their recorded
//!    net within a cent
//!
//! Validation is pure and advisory: deterministic for a given settlement,
//! never mutating it. A logically invalid plan is a result, not an error.

use crate::types::{OptimizedSettlement, Severity, SettlementValidation, ValidationIssue};
use chrono::Utc;
use pot_ledger::money;
use rust_decimal::Decimal;

/// Error code: plan debits and credits disagree.
pub const CODE_PLAN_IMBALANCED: &str = "PLAN_IMBALANCED";
/// Error code: one player's plan entries do not reproduce their net.
pub const CODE_PLAYER_MISMATCH: &str = "PLAYER_MISMATCH";

/// Proves (or disproves) that a payment plan settles everyone exactly.
#[derive(Debug, Default)]
pub struct SettlementValidator;

impl SettlementValidator {
    /// Create a validator
    pub fn new() -> Self {
        Self
    }

    /// Run both checks and assemble the audit trail.
    pub fn validate(&self, settlement: &OptimizedSettlement) -> SettlementValidation {
        let mut errors = Vec::new();
        let warnings = Vec::new();
        let mut audit_trail = Vec::new();

        audit_trail.push(format!(
            "Validating settlement for session {} ({} players, {} payments)",
            settlement.session_id,
            settlement.player_settlements.len(),
            settlement.payment_plan.len()
        ));

        // Check 1: total debits vs total credits
        let total_debits: Decimal = settlement
            .payment_plan
            .iter()
            .fold(Decimal::ZERO, |acc, p| money::add(acc, p.amount));

        let expected_credits = settlement
            .player_settlements
            .iter()
            .filter(|s| s.net_amount < Decimal::ZERO)
            .fold(Decimal::ZERO, |acc, s| {
                money::add(acc, s.net_amount.abs())
            });

        if money::approx_eq(total_debits, expected_credits) {
            audit_trail.push(format!(
                "Balance check passed: plan total {} matches amount owed {}",
                total_debits, expected_credits
            ));
        } else {
            audit_trail.push(format!(
                "Balance check FAILED: plan total {} does not match amount owed {}",
                total_debits, expected_credits
            ));
            errors.push(ValidationIssue {
                code: CODE_PLAN_IMBALANCED.to_string(),
                severity: Severity::Critical,
                player_id: None,
                message: format!(
                    "plan moves {} but players owe {}",
                    total_debits, expected_credits
                ),
            });
        }

        // Check 2: per-player signed sums
        for player in &settlement.player_settlements {
            let plan_sum = settlement.plan_sum_for(player.player_id);

            if money::approx_eq(plan_sum, player.net_amount) {
                audit_trail.push(format!(
                    "{}: plan sum {} matches net {}",
                    player.player_name, plan_sum, player.net_amount
                ));
            } else {
                audit_trail.push(format!(
                    "{}: plan sum {} DOES NOT match net {}",
                    player.player_name, plan_sum, player.net_amount
                ));
                errors.push(ValidationIssue {
                    code: CODE_PLAYER_MISMATCH.to_string(),
                    severity: Severity::Critical,
                    player_id: Some(player.player_id),
                    message: format!(
                        "{} settles {} via the plan but their net is {}",
                        player.player_name, plan_sum, player.net_amount
                    ),
                });
            }
        }

        let is_valid = errors.is_empty();
        audit_trail.push(if is_valid {
            "Validation passed: settlement is mathematically sound".to_string()
        } else {
            format!("Validation FAILED with {} error(s)", errors.len())
        });

        tracing::debug!(
            session_id = %settlement.session_id,
            is_valid,
            error_count = errors.len(),
            "settlement validated"
        );

        SettlementValidation {
            is_valid,
            errors,
            warnings,
            audit_trail,
            validated_at: Utc::now(),
        }
    }
}
