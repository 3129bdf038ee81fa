//! File-backed ledger
//!
//! Persists the whole [`LedgerBook`] as pretty-printed JSON. Every call
//! loads the book, every successful mutation writes it back through a
//! temporary file and a rename, so a crash mid-write leaves the previous
//! state intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::sync::Mutex;

use crate::core::models::{
    Address, Amount, BountyDraft, BountyId, BountyRecord, DeveloperProfile, RatingScores,
    WalletInfo,
};
use crate::core::ports::Ledger;
use crate::core::services::LedgerBook;
use crate::error::Result;

/// Ledger persisted to a JSON file
#[derive(Debug)]
pub struct FileLedger {
    path: PathBuf,
    token: String,
    starting_balance: Amount,
    /// Serializes load-apply-save cycles within this process
    lock: Mutex<()>,
}

impl FileLedger {
    /// Open (or lazily create) the ledger at `path`
    ///
    /// `token` and `starting_balance` only apply when the file does not exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, token: impl Into<String>, starting_balance: Amount) -> Self {
        Self {
            path: path.into(),
            token: token.into(),
            starting_balance,
            lock: Mutex::new(()),
        }
    }

    /// Location of the state file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current book from disk
    pub async fn load(&self) -> Result<LedgerBook> {
        if !fs::try_exists(&self.path).await? {
            return Ok(LedgerBook::new(self.token.clone(), self.starting_balance));
        }
        let content = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn save(&self, book: &LedgerBook) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(book)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.path).await?;
        log::debug!("Saved ledger to {}", self.path.display());
        Ok(())
    }

    async fn read<T>(&self, op: impl FnOnce(&LedgerBook) -> Result<T> + Send) -> Result<T> {
        let _guard = self.lock.lock().await;
        let book = self.load().await?;
        op(&book)
    }

    async fn update<T>(&self, op: impl FnOnce(&mut LedgerBook) -> Result<T> + Send) -> Result<T> {
        let _guard = self.lock.lock().await;
        let mut book = self.load().await?;
        let value = op(&mut book)?;
        self.save(&book).await?;
        Ok(value)
    }
}

#[async_trait]
impl Ledger for FileLedger {
    async fn create_wallet(&self) -> Result<Address> {
        self.update(|book| Ok(book.create_wallet())).await
    }

    async fn connect(&self, address: &Address) -> Result<WalletInfo> {
        self.read(|book| book.connect(address)).await
    }

    async fn balance(&self, address: &Address) -> Result<Amount> {
        self.read(|book| book.balance(address)).await
    }

    async fn create_bounty(&self, issuer: &Address, draft: &BountyDraft) -> Result<BountyId> {
        self.update(|book| book.create_bounty(issuer, draft, Utc::now())).await
    }

    async fn assign_bounty(
        &self,
        caller: &Address,
        id: BountyId,
        assignee: &Address,
    ) -> Result<BountyRecord> {
        self.update(|book| book.assign_bounty(caller, id, assignee, Utc::now())).await
    }

    async fn submit_pull_request(
        &self,
        caller: &Address,
        id: BountyId,
        pr_number: u64,
    ) -> Result<BountyRecord> {
        self.update(|book| book.submit_pull_request(caller, id, pr_number, Utc::now())).await
    }

    async fn approve_bounty(&self, caller: &Address, id: BountyId) -> Result<BountyRecord> {
        self.update(|book| book.approve_bounty(caller, id, Utc::now())).await
    }

    async fn register_developer(
        &self,
        address: &Address,
        skills: &[String],
    ) -> Result<DeveloperProfile> {
        self.update(|book| book.register_developer(address, skills, Utc::now())).await
    }

    async fn submit_rating(
        &self,
        rater: &Address,
        developer: &Address,
        id: BountyId,
        scores: &RatingScores,
    ) -> Result<DeveloperProfile> {
        self.update(|book| book.submit_rating(rater, developer, id, scores.clone(), Utc::now()))
            .await
    }

    async fn endorse_skill(
        &self,
        endorser: &Address,
        developer: &Address,
        skill: &str,
    ) -> Result<bool> {
        self.update(|book| book.endorse_skill(endorser, developer, skill)).await
    }

    async fn bounty(&self, id: BountyId) -> Result<BountyRecord> {
        self.read(|book| book.bounty(id)).await
    }

    async fn bounties_issued_by(&self, address: &Address) -> Result<Vec<BountyRecord>> {
        self.read(|book| Ok(book.bounties_issued_by(address))).await
    }

    async fn bounties_assigned_to(&self, address: &Address) -> Result<Vec<BountyRecord>> {
        self.read(|book| Ok(book.bounties_assigned_to(address))).await
    }

    async fn developer_profile(&self, address: &Address) -> Result<Option<DeveloperProfile>> {
        self.read(|book| Ok(book.developer_profile(address))).await
    }

    async fn reputation(&self, address: &Address) -> Result<u64> {
        self.read(|book| Ok(book.reputation(address))).await
    }
}
