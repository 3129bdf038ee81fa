//! In-memory ledger
//!
//! Keeps a [`LedgerBook`] behind a mutex. Clones share the same book, so
//! several sessions can act on one ledger. Latency and outages can be
//! simulated for exercising a front-end's loading and failure paths.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::core::models::{
    Address, Amount, BountyDraft, BountyId, BountyRecord, DECIMALS, DeveloperProfile,
    RatingScores, WalletInfo,
};
use crate::core::ports::Ledger;
use crate::core::services::LedgerBook;
use crate::core::services::book::{DEFAULT_STARTING_TOKENS, DEFAULT_TOKEN};
use crate::error::{LedgerError, Result};

/// Settings for a fresh in-memory ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerOptions {
    /// Artificial delay before every call
    pub latency: Duration,
    /// Balance credited to new wallets
    pub starting_balance: Amount,
    /// Token denomination
    pub token: String,
}

impl Default for LedgerOptions {
    fn default() -> Self {
        Self {
            latency: Duration::ZERO,
            starting_balance: Amount::from_base_units(
                u128::from(DEFAULT_STARTING_TOKENS) * 10u128.pow(DECIMALS),
            ),
            token: DEFAULT_TOKEN.to_string(),
        }
    }
}

/// Shared in-memory ledger
#[derive(Debug, Clone)]
pub struct InMemoryLedger {
    book: Arc<Mutex<LedgerBook>>,
    available: Arc<AtomicBool>,
    latency: Duration,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(LedgerBook::default())
    }
}

impl InMemoryLedger {
    /// Wrap an existing book
    #[must_use]
    pub fn new(book: LedgerBook) -> Self {
        Self {
            book: Arc::new(Mutex::new(book)),
            available: Arc::new(AtomicBool::new(true)),
            latency: Duration::ZERO,
        }
    }

    /// Fresh ledger built from `options`
    #[must_use]
    pub fn with_options(options: &LedgerOptions) -> Self {
        Self::new(LedgerBook::new(options.token.clone(), options.starting_balance))
            .with_latency(options.latency)
    }

    /// Delay every call by `latency`
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Simulate an outage (`false`) or recovery (`true`)
    ///
    /// Applies to every clone of this ledger.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Copy of the current book
    pub fn snapshot(&self) -> Result<LedgerBook> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, LedgerBook>> {
        self.book
            .lock()
            .map_err(|_| LedgerError::Unavailable("ledger state lock poisoned".to_string()))
    }

    async fn with_book<T>(&self, op: impl FnOnce(&mut LedgerBook) -> Result<T> + Send) -> Result<T> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if !self.available.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable("in-memory ledger is offline".to_string()));
        }
        let mut book = self.lock()?;
        op(&mut book)
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn create_wallet(&self) -> Result<Address> {
        self.with_book(|book| Ok(book.create_wallet())).await
    }

    async fn connect(&self, address: &Address) -> Result<WalletInfo> {
        self.with_book(|book| book.connect(address)).await
    }

    async fn balance(&self, address: &Address) -> Result<Amount> {
        self.with_book(|book| book.balance(address)).await
    }

    async fn create_bounty(&self, issuer: &Address, draft: &BountyDraft) -> Result<BountyId> {
        self.with_book(|book| book.create_bounty(issuer, draft, Utc::now())).await
    }

    async fn assign_bounty(
        &self,
        caller: &Address,
        id: BountyId,
        assignee: &Address,
    ) -> Result<BountyRecord> {
        self.with_book(|book| book.assign_bounty(caller, id, assignee, Utc::now())).await
    }

    async fn submit_pull_request(
        &self,
        caller: &Address,
        id: BountyId,
        pr_number: u64,
    ) -> Result<BountyRecord> {
        self.with_book(|book| book.submit_pull_request(caller, id, pr_number, Utc::now())).await
    }

    async fn approve_bounty(&self, caller: &Address, id: BountyId) -> Result<BountyRecord> {
        self.with_book(|book| book.approve_bounty(caller, id, Utc::now())).await
    }

    async fn register_developer(
        &self,
        address: &Address,
        skills: &[String],
    ) -> Result<DeveloperProfile> {
        self.with_book(|book| book.register_developer(address, skills, Utc::now())).await
    }

    async fn submit_rating(
        &self,
        rater: &Address,
        developer: &Address,
        id: BountyId,
        scores: &RatingScores,
    ) -> Result<DeveloperProfile> {
        self.with_book(|book| book.submit_rating(rater, developer, id, scores.clone(), Utc::now()))
            .await
    }

    async fn endorse_skill(
        &self,
        endorser: &Address,
        developer: &Address,
        skill: &str,
    ) -> Result<bool> {
        self.with_book(|book| book.endorse_skill(endorser, developer, skill)).await
    }

    async fn bounty(&self, id: BountyId) -> Result<BountyRecord> {
        self.with_book(|book| book.bounty(id)).await
    }

    async fn bounties_issued_by(&self, address: &Address) -> Result<Vec<BountyRecord>> {
        self.with_book(|book| Ok(book.bounties_issued_by(address))).await
    }

    async fn bounties_assigned_to(&self, address: &Address) -> Result<Vec<BountyRecord>> {
        self.with_book(|book| Ok(book.bounties_assigned_to(address))).await
    }

    async fn developer_profile(&self, address: &Address) -> Result<Option<DeveloperProfile>> {
        self.with_book(|book| Ok(book.developer_profile(address))).await
    }

    async fn reputation(&self, address: &Address) -> Result<u64> {
        self.with_book(|book| Ok(book.reputation(address))).await
    }
}
