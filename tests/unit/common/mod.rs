//! Shared test fixtures and helpers
//!
//! This module provides common utilities for testing bountyledger components.


use std::sync::Arc;

use bountyledger::adapters::InMemoryLedger;
use bountyledger::core::models::{Address, Amount, BountyDraft, RatingScores};
use bountyledger::core::services::WalletSession;
use chrono::{Duration, Utc};

/// Whole tokens as an [`Amount`]
pub fn tokens(n: u64) -> Amount {
    Amount::from_tokens(n).unwrap()
}

/// A draft due in a week that pays out without approval
pub fn draft(amount: u64) -> BountyDraft {
    BountyDraft::new(
        tokens(amount),
        "acme/widgets",
        "https://github.com/acme/widgets/issues/7",
        Utc::now() + Duration::days(7),
    )
}

/// Uniform scores with a short note
pub fn scores(score: u8) -> RatingScores {
    RatingScores {
        code_quality: score,
        communication: score,
        timeliness: score,
        reliability: score,
        feedback: "solid work".to_string(),
    }
}

/// Create a wallet on `ledger` and return a session connected to it
pub async fn connected(ledger: &InMemoryLedger) -> WalletSession {
    let mut session = WalletSession::new(Arc::new(ledger.clone()));
    session.initialize_wallet().await.unwrap();
    session
}

/// Address of the session's wallet
pub fn address_of(session: &WalletSession) -> Address {
    session.wallet().cloned().unwrap()
}
