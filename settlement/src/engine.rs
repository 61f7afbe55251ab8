//! Settlement engine orchestration
//!
//! Wires the calculators together behind a constructor-injected
//! [`LedgerStore`]. Each call takes one consistent snapshot of the ledger
//! and roster up front and runs the whole pipeline against it without
//! re-reading, so a mutating ledger can never feed two halves of one
//! computation.
//!
//! Concurrency: per-session mutexes guarantee at most one in-flight
//! optimization per session; different sessions run freely in parallel.
//! The engine owns no other shared state; every result is a value.

use crate::{
    balance::{BalanceCalculator, BankBalanceTracker},
    cashout::EarlyCashOutCalculator,
    config::Config,
    optimizer::DebtOptimizer,
    types::{
        ratio_to_percentage, BankBalance, EarlyCashOut, OptimizedSettlement, Payment,
        PlayerSettlement, SettlementPhase, SettlementValidation,
    },
    validator::SettlementValidator,
    Error, Result,
};
use chrono::Utc;
use dashmap::DashMap;
use pot_ledger::{
    money,
    types::{Player, PlayerId, SessionId, Transaction},
    LedgerStore,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Settlement engine
pub struct SettlementEngine {
    /// Ledger/roster read seam
    ledger: Arc<dyn LedgerStore>,

    /// Balance derivation
    balances: BalanceCalculator,

    /// Pot aggregation
    bank: BankBalanceTracker,

    /// Early cash-out quoting
    cashout: EarlyCashOutCalculator,

    /// Plan validation
    validator: SettlementValidator,

    /// Configuration
    config: Config,

    /// Per-session single-flight guards
    in_flight: DashMap<SessionId, Arc<Mutex<()>>>,

    /// Per-session pipeline phase
    phases: DashMap<SessionId, SettlementPhase>,
}

impl std::fmt::Debug for SettlementEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettlementEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SettlementEngine {
    /// Create a new settlement engine over an injected ledger store.
    pub fn new(ledger: Arc<dyn LedgerStore>, config: Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Error::Init(e.to_string()))?;

        tracing::debug!(
            service = %config.service_name,
            version = %config.service_version,
            budget_ms = config.optimization_budget_ms,
            "settlement engine initialized"
        );

        Ok(Self {
            ledger,
            balances: BalanceCalculator::new(),
            bank: BankBalanceTracker::new(),
            cashout: EarlyCashOutCalculator::new(),
            validator: SettlementValidator::new(),
            config,
            in_flight: DashMap::new(),
            phases: DashMap::new(),
        })
    }

    /// Current pipeline phase for a session.
    pub fn phase(&self, session_id: SessionId) -> SettlementPhase {
        self.phases
            .get(&session_id)
            .map(|p| *p)
            .unwrap_or(SettlementPhase::Idle)
    }

    /// Reset a session's pipeline phase back to idle.
    ///
    /// Drops the session's phase entry entirely; a session with no entry
    /// reads as [`SettlementPhase::Idle`].
    pub fn reset(&self, session_id: SessionId) {
        self.phases.remove(&session_id);
    }

    fn set_phase(&self, session_id: SessionId, phase: SettlementPhase) {
        self.phases.insert(session_id, phase);
    }

    /// Quote one player's early cash-out against current ledger state.
    pub async fn calculate_early_cash_out(
        &self,
        session_id: SessionId,
        player_id: PlayerId,
    ) -> Result<EarlyCashOut> {
        let (players, transactions) = self
            .snapshot(session_id)
            .await
            .map_err(|source| Error::EarlyCashOut { session_id, source })?;

        self.cashout
            .quote(&players, &transactions, player_id)
            .map_err(|source| Error::EarlyCashOut { session_id, source })
    }

    /// Sum the pot for a session.
    pub async fn calculate_bank_balance(&self, session_id: SessionId) -> Result<BankBalance> {
        let transactions = self
            .ledger
            .transaction_history(session_id)
            .await
            .map_err(|source| Error::BankBalance { session_id, source })?;

        Ok(self.bank.calculate(&transactions))
    }

    /// Validate a computed settlement.
    ///
    /// Logical invalidity lives in the returned result; this only fails on
    /// infrastructure problems, which a pure re-derivation does not have.
    pub fn validate_settlement(
        &self,
        settlement: &OptimizedSettlement,
    ) -> Result<SettlementValidation> {
        Ok(self.validator.validate(settlement))
    }

    /// Run the full optimize-then-validate pipeline for a session.
    ///
    /// Takes the ledger snapshot, derives balances, builds the plan within
    /// the configured wall-clock budget (falling back to the unoptimized
    /// direct plan rather than blocking), and validates the outcome. The
    /// session's phase ends `Completed` only when validation passes.
    pub async fn optimize_settlement(&self, session_id: SessionId) -> Result<OptimizedSettlement> {
        let result = {
            // One optimization in flight per session; clone the guard out
            // so the map shard is not held across the await.
            let guard = self
                .in_flight
                .entry(session_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone();
            let _locked = guard.lock().await;

            self.set_phase(session_id, SettlementPhase::Optimizing);
            tracing::info!(%session_id, "starting settlement optimization");

            let result = self.run_pipeline(session_id).await;

            match &result {
                Ok(settlement) => {
                    let validation = self.validator.validate(settlement);
                    if validation.is_valid {
                        self.set_phase(session_id, SettlementPhase::Completed);
                        tracing::info!(
                            %session_id,
                            payments = settlement.transaction_count,
                            baseline = settlement.direct_transaction_count,
                            reduction_pct = settlement.reduction_percentage,
                            "settlement optimization complete"
                        );
                    } else {
                        self.set_phase(session_id, SettlementPhase::Error);
                        tracing::warn!(
                            %session_id,
                            errors = validation.errors.len(),
                            "optimized settlement failed validation"
                        );
                    }
                }
                Err(e) => {
                    self.set_phase(session_id, SettlementPhase::Error);
                    tracing::error!(%session_id, error = %e, "settlement optimization failed");
                }
            }

            result
        };

        // Our guard clone is dropped at this point; evict the mutex
        // unless another caller still holds or awaits it. Late arrivals
        // mint a fresh one through `entry` above.
        self.in_flight
            .remove_if(&session_id, |_, guard| Arc::strong_count(guard) == 1);

        result
    }

    async fn run_pipeline(&self, session_id: SessionId) -> Result<OptimizedSettlement> {
        let (players, transactions) = self
            .snapshot(session_id)
            .await
            .map_err(|source| Error::Optimization { session_id, source })?;

        let settlements = self.balances.calculate(&players, &transactions);

        let net_sum = settlements
            .iter()
            .fold(Decimal::ZERO, |acc, s| money::add(acc, s.net_amount));
        let is_balanced = money::is_settled(net_sum);
        if !is_balanced {
            tracing::warn!(%session_id, %net_sum, "net positions do not sum to zero");
        }

        let payment_plan = self.plan_within_budget(session_id, &settlements).await?;

        Ok(Self::assemble(session_id, settlements, payment_plan, is_balanced))
    }

    /// Build the plan under the wall-clock budget; on overrun, either fall
    /// back to the direct plan or fail, per configuration.
    async fn plan_within_budget(
        &self,
        session_id: SessionId,
        settlements: &[PlayerSettlement],
    ) -> Result<Vec<Payment>> {
        let input = settlements.to_vec();
        let handle = tokio::task::spawn_blocking(move || DebtOptimizer::new().optimize(&input));
        let compute = async move {
            handle.await.map_err(|join_err| Error::Optimization {
                session_id,
                source: pot_ledger::Error::Other(format!(
                    "optimization task failed: {}",
                    join_err
                )),
            })
        };

        self.plan_with_deadline(session_id, settlements, compute).await
    }

    async fn plan_with_deadline<F>(
        &self,
        session_id: SessionId,
        settlements: &[PlayerSettlement],
        compute: F,
    ) -> Result<Vec<Payment>>
    where
        F: std::future::Future<Output = Result<Vec<Payment>>>,
    {
        let budget = Duration::from_millis(self.config.optimization_budget_ms);

        match tokio::time::timeout(budget, compute).await {
            Ok(plan) => plan,
            Err(_elapsed) if self.config.fallback_on_budget => {
                tracing::warn!(
                    %session_id,
                    budget_ms = self.config.optimization_budget_ms,
                    "optimization budget exceeded, using unoptimized direct plan"
                );
                Ok(DebtOptimizer::new().direct_plan(settlements))
            }
            Err(_elapsed) => Err(Error::Optimization {
                session_id,
                source: pot_ledger::Error::Other(format!(
                    "optimization exceeded {}ms budget",
                    self.config.optimization_budget_ms
                )),
            }),
        }
    }

    fn assemble(
        session_id: SessionId,
        settlements: Vec<PlayerSettlement>,
        payment_plan: Vec<Payment>,
        is_balanced: bool,
    ) -> OptimizedSettlement {
        let total_amount = payment_plan
            .iter()
            .fold(Decimal::ZERO, |acc, p| money::add(acc, p.amount));

        let transaction_count = payment_plan.len();
        let direct_transaction_count =
            DebtOptimizer::new().direct_transaction_count(&settlements);
        // Fallback plans can exceed the baseline; the reduction clamps at 0.
        let transaction_reduction = direct_transaction_count.saturating_sub(transaction_count);
        let reduction_percentage =
            ratio_to_percentage(transaction_reduction, direct_transaction_count);

        OptimizedSettlement {
            session_id,
            player_settlements: settlements,
            payment_plan,
            total_amount,
            transaction_count,
            direct_transaction_count,
            transaction_reduction,
            reduction_percentage,
            is_balanced,
            calculated_at: Utc::now(),
        }
    }

    /// One consistent read of roster + history; the pipeline never
    /// re-reads after this.
    async fn snapshot(
        &self,
        session_id: SessionId,
    ) -> pot_ledger::Result<(Vec<Player>, Vec<Transaction>)> {
        let players = self.ledger.players(session_id).await?;
        let transactions = self.ledger.transaction_history(session_id).await?;
        Ok((players, transactions))
    }
}
