//! End-to-end settlement demo
//!
//! Seeds an in-memory ledger with a four-player cash game, quotes an early
//! cash-out, optimizes the session settlement, and prints the validated
//! result as JSON.

use anyhow::Result;
use pot_ledger::{MemoryLedger, Player, PlayerId, SessionId};
use rust_decimal::Decimal;
use settlement::{Config, SettlementEngine};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let ledger = Arc::new(MemoryLedger::new());
    let session = SessionId::new();

    let names = ["Alice", "Bob", "Carol", "Dave"];
    let chips = [15000i64, 8000, 8000, 9000];
    let ids: Vec<PlayerId> = names.iter().map(|_| PlayerId::new()).collect();

    let roster: Vec<Player> = ids
        .iter()
        .zip(names)
        .zip(chips)
        .map(|((id, name), c)| Player::new(*id, name, Decimal::new(c, 2)))
        .collect();
    ledger.put_roster(session, roster);

    for id in &ids {
        ledger.record_buy_in(session, *id, Decimal::new(10000, 2))?;
    }

    let engine = SettlementEngine::new(ledger, Config::default())?;

    let quote = engine.calculate_early_cash_out(session, ids[1]).await?;
    tracing::info!(
        player = %quote.player_name,
        standing = %quote.standing,
        amount = %quote.settlement_amount,
        can_payout = quote.can_payout,
        "early cash-out quote"
    );

    let settlement = engine.optimize_settlement(session).await?;
    let validation = engine.validate_settlement(&settlement)?;

    for step in &validation.audit_trail {
        tracing::info!("{}", step);
    }

    println!("{}", serde_json::to_string_pretty(&settlement)?);
    Ok(())
}
