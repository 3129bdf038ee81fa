//! Tests for WalletSession against the in-memory ledger

use std::sync::Arc;
use std::time::Duration;

use bountyledger::adapters::{InMemoryLedger, LedgerOptions};
use bountyledger::core::models::{Address, BountyId, BountyStatus, SessionState};
use bountyledger::core::services::WalletSession;
use bountyledger::error::LedgerError;

use crate::common::mocks::RecordingLedger;
use crate::common::{address_of, connected, draft, scores, tokens};

// =============================================================================
// Connection
// =============================================================================

#[tokio::test]
async fn test_connect_sets_address_and_balance() {
    let ledger = InMemoryLedger::default();
    let session = connected(&ledger).await;

    let conn = session.connection();
    assert!(conn.is_connected);
    assert_eq!(conn.wallet_address.as_ref(), session.wallet());
    assert_eq!(conn.balance, "100");
    assert!(!conn.is_busy());
}

#[tokio::test]
async fn test_connect_during_outage_leaves_state_unchanged() {
    let ledger = InMemoryLedger::default();
    let mut session = WalletSession::new(Arc::new(ledger.clone()));
    session.create_wallet().await.unwrap();
    let before = session.state();

    ledger.set_available(false);
    let err = session.connect().await.unwrap_err();
    assert!(matches!(err, LedgerError::Unavailable(_)));
    assert!(err.is_transient());
    assert_eq!(session.state(), before);

    ledger.set_available(true);
    session.connect().await.unwrap();
    assert!(session.is_connected());
}

#[tokio::test]
async fn test_connect_unknown_wallet_fails() {
    let ledger = InMemoryLedger::default();
    let mut session = WalletSession::new(Arc::new(ledger)).with_wallet(Address::random());

    let err = session.connect().await.unwrap_err();
    assert!(matches!(err, LedgerError::WalletNotFound(_)));
    assert_eq!(session.state(), SessionState::default());
}

#[tokio::test]
async fn test_disconnect_resets_everything() {
    let ledger = InMemoryLedger::default();
    let mut session = connected(&ledger).await;
    session.create_bounty_with(draft(5)).await.unwrap();
    session.register_developer(&["rust"]).await.unwrap();
    assert!(!session.state().issued_bounties.is_empty());

    session.disconnect();

    let conn = session.connection();
    assert!(!conn.is_connected);
    assert!(conn.wallet_address.is_none());
    assert_eq!(conn.balance, "0");
    assert_eq!(session.state(), SessionState::default());

    // Disconnecting twice is harmless
    session.disconnect();
    assert_eq!(session.state(), SessionState::default());
}

#[tokio::test]
async fn test_reconnect_after_disconnect() {
    let ledger = InMemoryLedger::default();
    let mut session = connected(&ledger).await;
    session.create_bounty_with(draft(5)).await.unwrap();
    session.disconnect();

    session.connect().await.unwrap();
    assert_eq!(session.state().issued_bounties.len(), 1);
    assert_eq!(session.connection().balance, "95");
}

// =============================================================================
// Bounties
// =============================================================================

#[tokio::test]
async fn test_create_bounty_escrows_and_refreshes() {
    let ledger = InMemoryLedger::default();
    let mut session = connected(&ledger).await;

    let id = session.create_bounty_with(draft(10)).await.unwrap();

    let state = session.state();
    assert_eq!(state.connection.balance, "90");
    assert_eq!(state.issued_bounties.len(), 1);
    assert_eq!(state.issued_bounties[0].id, id);
    assert_eq!(state.issued_bounties[0].status, BountyStatus::Open);
}

#[tokio::test]
async fn test_create_bounty_from_parts_pays_without_approval() {
    let ledger = InMemoryLedger::default();
    let mut session = connected(&ledger).await;
    let deadline = chrono::Utc::now() + chrono::Duration::days(3);

    let id = session
        .create_bounty(
            tokens(5),
            "acme/widgets",
            "https://github.com/acme/widgets/issues/12",
            deadline,
        )
        .await
        .unwrap();

    assert_eq!(id, BountyId(1));
    assert_eq!(session.connection().balance, "95");
    let record = session.bounty(id).await.unwrap();
    assert!(!record.requires_approval);
    assert_eq!(record.status, BountyStatus::Open);
    assert_eq!(record.amount, tokens(5));
    assert_eq!(record.deadline, deadline);
}

#[tokio::test]
async fn test_failed_create_bounty_creates_nothing() {
    let ledger = InMemoryLedger::default();
    let mut session = connected(&ledger).await;
    let before = ledger.snapshot().unwrap();

    let err = session.create_bounty_with(draft(500)).await.unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    assert_eq!(ledger.snapshot().unwrap(), before);
    assert!(session.state().issued_bounties.is_empty());
    assert_eq!(session.connection().balance, "100");
}

#[tokio::test]
async fn test_self_assign_while_disconnected_changes_nothing() {
    let ledger = InMemoryLedger::default();
    let mut issuer = connected(&ledger).await;
    let id = issuer.create_bounty_with(draft(5)).await.unwrap();

    let recording = Arc::new(RecordingLedger::new(ledger.clone()));
    let mut developer = WalletSession::new(recording.clone());
    developer.create_wallet().await.unwrap();
    recording.clear();
    let before = ledger.snapshot().unwrap();

    let err = developer.self_assign_bounty(id).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotConnected));
    assert!(recording.calls().is_empty());
    assert_eq!(ledger.snapshot().unwrap(), before);
}

#[tokio::test]
async fn test_self_assign_after_disconnect_fails() {
    let ledger = InMemoryLedger::default();
    let mut issuer = connected(&ledger).await;
    let mut last = BountyId(0);
    for _ in 0..42 {
        last = issuer.create_bounty_with(draft(1)).await.unwrap();
    }
    assert_eq!(last, BountyId(42));

    let mut developer = connected(&ledger).await;
    let record = developer.self_assign_bounty(BountyId(42)).await.unwrap();
    assert_eq!(record.status, BountyStatus::Assigned);

    developer.disconnect();
    let before = ledger.snapshot().unwrap();

    let err = developer.self_assign_bounty(BountyId(42)).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotConnected));
    assert_eq!(ledger.snapshot().unwrap(), before);
}

#[tokio::test]
async fn test_issuer_cannot_claim_own_bounty() {
    let ledger = InMemoryLedger::default();
    let mut issuer = connected(&ledger).await;
    let id = issuer.create_bounty_with(draft(5)).await.unwrap();

    let err = issuer.self_assign_bounty(id).await.unwrap_err();
    assert!(matches!(err, LedgerError::IssuerCannotAssignSelf(_)));
}

#[tokio::test]
async fn test_lifecycle_with_approval() {
    let ledger = InMemoryLedger::default();
    let mut issuer = connected(&ledger).await;
    let mut developer = connected(&ledger).await;
    let dev = address_of(&developer);
    developer.register_developer(&["Rust", "tokio"]).await.unwrap();

    let id = issuer.create_bounty_with(draft(10).with_approval()).await.unwrap();
    let record = issuer.assign_bounty(id, &dev).await.unwrap();
    assert_eq!(record.assignee.as_ref(), Some(&dev));

    developer.refresh_data().await.unwrap();
    assert_eq!(developer.state().assigned_bounties.len(), 1);

    let record = developer.submit_pull_request(id, 17).await.unwrap();
    assert_eq!(record.status, BountyStatus::InReview);
    assert_eq!(record.pr_number, Some(17));
    assert_eq!(developer.connection().balance, "100");

    let err = developer.approve_bounty(id).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotIssuer(_)));

    let record = issuer.approve_bounty(id).await.unwrap();
    assert_eq!(record.status, BountyStatus::Completed);
    assert_eq!(issuer.connection().balance, "90");

    developer.refresh_data().await.unwrap();
    let state = developer.state();
    assert_eq!(state.connection.balance, "110");
    let profile = state.developer_profile.unwrap();
    assert_eq!(profile.completed_bounties, 1);
    assert_eq!(profile.total_earnings, tokens(10));
    assert_eq!(state.reputation_score, 10);
}

#[tokio::test]
async fn test_submit_without_approval_pays_immediately() {
    let ledger = InMemoryLedger::default();
    let mut issuer = connected(&ledger).await;
    let mut developer = connected(&ledger).await;
    let id = issuer.create_bounty_with(draft(25)).await.unwrap();

    developer.self_assign_bounty(id).await.unwrap();
    let record = developer.submit_pull_request(id, 3).await.unwrap();

    assert_eq!(record.status, BountyStatus::Completed);
    assert_eq!(developer.connection().balance, "125");
}

// =============================================================================
// Developers
// =============================================================================

#[tokio::test]
async fn test_rating_updates_profile() {
    let ledger = InMemoryLedger::default();
    let mut issuer = connected(&ledger).await;
    let mut developer = connected(&ledger).await;
    let dev = address_of(&developer);
    developer.register_developer::<&str>(&[]).await.unwrap();

    let id = issuer.create_bounty_with(draft(5)).await.unwrap();
    developer.self_assign_bounty(id).await.unwrap();
    developer.submit_pull_request(id, 1).await.unwrap();

    let profile = issuer.submit_rating(&dev, id, scores(4)).await.unwrap();
    assert_eq!(profile.total_ratings, 1);
    assert!((profile.average_rating - 4.0).abs() < f64::EPSILON);
    // 10 for the completion + round(4.0 * 1 * 2)
    assert_eq!(profile.total_score, 18);

    let err = issuer.submit_rating(&dev, id, scores(5)).await.unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyRated(_)));
}

#[tokio::test]
async fn test_endorse_twice_keeps_one_skill() {
    let ledger = InMemoryLedger::default();
    let mut endorser = connected(&ledger).await;
    let mut developer = connected(&ledger).await;
    let dev = address_of(&developer);
    developer.register_developer(&["rust"]).await.unwrap();

    assert!(endorser.endorse_skill(&dev, "Solidity").await.unwrap());
    assert!(!endorser.endorse_skill(&dev, "solidity").await.unwrap());

    let (profile, _) = endorser.developer(&dev).await.unwrap();
    let profile = profile.unwrap();
    assert_eq!(profile.skills.iter().filter(|s| *s == "solidity").count(), 1);
    assert_eq!(profile.endorsements, 1);
}

#[tokio::test]
async fn test_self_endorsement_rejected() {
    let ledger = InMemoryLedger::default();
    let mut developer = connected(&ledger).await;
    let dev = address_of(&developer);
    developer.register_developer(&["rust"]).await.unwrap();

    let err = developer.endorse_skill(&dev, "go").await.unwrap_err();
    assert!(matches!(err, LedgerError::SelfEndorsement));
}

#[tokio::test]
async fn test_register_twice_fails() {
    let ledger = InMemoryLedger::default();
    let mut developer = connected(&ledger).await;
    developer.register_developer(&["rust"]).await.unwrap();

    let err = developer.register_developer(&["go"]).await.unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyRegistered(_)));
}

// =============================================================================
// Refresh
// =============================================================================

#[tokio::test]
async fn test_refresh_twice_is_stable() {
    let ledger = InMemoryLedger::default();
    let mut session = connected(&ledger).await;
    session.create_bounty_with(draft(3)).await.unwrap();
    session.register_developer(&["rust"]).await.unwrap();

    session.refresh_data().await.unwrap();
    let first = session.state();
    session.refresh_data().await.unwrap();
    assert_eq!(session.state(), first);
}

#[tokio::test]
async fn test_refresh_sees_changes_from_other_sessions() {
    let ledger = InMemoryLedger::default();
    let mut issuer = connected(&ledger).await;
    let mut developer = connected(&ledger).await;
    let id = issuer.create_bounty_with(draft(3)).await.unwrap();
    developer.self_assign_bounty(id).await.unwrap();

    assert_eq!(issuer.state().issued_bounties[0].status, BountyStatus::Open);
    issuer.refresh_data().await.unwrap();
    assert_eq!(issuer.state().issued_bounties[0].status, BountyStatus::Assigned);
}

#[tokio::test]
async fn test_failed_refresh_keeps_cached_data() {
    let ledger = InMemoryLedger::default();
    let mut session = connected(&ledger).await;
    session.create_bounty_with(draft(3)).await.unwrap();
    let before = session.state();

    ledger.set_available(false);
    assert!(session.refresh_data().await.is_err());
    assert_eq!(session.state(), before);
}

#[tokio::test]
async fn test_mutation_succeeds_when_follow_up_refresh_fails() {
    let ledger = InMemoryLedger::default();
    let recording = Arc::new(RecordingLedger::new(ledger.clone()));
    let mut session = WalletSession::new(recording.clone());
    session.initialize_wallet().await.unwrap();

    recording.fail_reads(true);
    let id = session.create_bounty_with(draft(4)).await.unwrap();

    // The bounty exists on the ledger even though the cache is stale
    assert_eq!(ledger.snapshot().unwrap().bounty(id).unwrap().id, id);
    assert!(session.state().issued_bounties.is_empty());
    assert!(!session.connection().is_busy());
}

// =============================================================================
// Busy flags and timeouts
// =============================================================================

fn slow_ledger(latency_ms: u64) -> InMemoryLedger {
    InMemoryLedger::with_options(&LedgerOptions {
        latency: Duration::from_millis(latency_ms),
        ..LedgerOptions::default()
    })
}

#[tokio::test(start_paused = true)]
async fn test_loading_flag_raised_while_in_flight() {
    let ledger = slow_ledger(100);
    let mut session = connected(&ledger).await;
    let updates = session.subscribe();

    let (result, during) = tokio::join!(session.refresh_data(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        updates.borrow().connection.is_loading
    });

    result.unwrap();
    assert!(during);
    assert!(!session.connection().is_loading);
}

#[tokio::test(start_paused = true)]
async fn test_slow_ledger_times_out() {
    let ledger = slow_ledger(5_000);
    let mut session = WalletSession::new(Arc::new(ledger.clone()))
        .with_wallet(Address::random())
        .with_timeout(Duration::from_secs(1));
    let before = session.state();

    let err = session.connect().await.unwrap_err();
    assert!(matches!(err, LedgerError::Timeout(_)));
    assert_eq!(session.state(), before);
    assert!(!session.connection().is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_dropped_operation_clears_busy_flag() {
    let ledger = slow_ledger(1_000);
    let mut session = connected(&ledger).await;

    let outcome = tokio::time::timeout(Duration::from_millis(10), session.refresh_data()).await;
    assert!(outcome.is_err());
    assert!(!session.connection().is_busy());
}
