//! Wallet session
//!
//! A `WalletSession` is the session-scoped state a front-end owns: the
//! connection flags, the balance, and the bounty and reputation data last
//! fetched from the ledger. Views read snapshots through [`WalletSession::state`]
//! or follow changes through [`WalletSession::subscribe`].
//!
//! Operations take `&mut self`, so a session runs one at a time. While an
//! operation is in flight `is_initializing` (connect) or `is_loading`
//! (everything else) is set; the flag is cleared on every exit path,
//! including when the operation future is dropped.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use tokio::sync::watch;

use crate::core::models::{
    Address, Amount, BountyDraft, BountyId, BountyRecord, ConnectionState, DeveloperProfile,
    RatingScores, SessionState, WalletInfo,
};
use crate::core::ports::Ledger;
use crate::error::{LedgerError, Result};

/// Ledger call timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Which busy flag an operation raises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Busy {
    Initializing,
    Loading,
}

impl Busy {
    fn set(self, connection: &mut ConnectionState, value: bool) {
        match self {
            Self::Initializing => connection.is_initializing = value,
            Self::Loading => connection.is_loading = value,
        }
    }
}

/// Raises a busy flag for its lifetime
struct BusyGuard {
    state: Arc<watch::Sender<SessionState>>,
    flag: Busy,
}

impl BusyGuard {
    fn raise(state: &Arc<watch::Sender<SessionState>>, flag: Busy) -> Self {
        state.send_modify(|s| flag.set(&mut s.connection, true));
        Self {
            state: Arc::clone(state),
            flag,
        }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        let flag = self.flag;
        self.state.send_modify(|s| flag.set(&mut s.connection, false));
    }
}

/// Session-scoped wallet state and the operations that change it
pub struct WalletSession {
    ledger: Arc<dyn Ledger>,
    wallet: Option<Address>,
    timeout: Duration,
    state: Arc<watch::Sender<SessionState>>,
}

impl fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSession")
            .field("wallet", &self.wallet)
            .field("timeout", &self.timeout)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl WalletSession {
    /// Create a disconnected session with no wallet
    #[must_use]
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            ledger,
            wallet: None,
            timeout: DEFAULT_TIMEOUT,
            state: Arc::new(state),
        }
    }

    /// Use an existing wallet
    #[must_use]
    pub fn with_wallet(mut self, address: Address) -> Self {
        self.wallet = Some(address);
        self
    }

    /// Bound every ledger call by `timeout`
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The session's wallet, connected or not
    #[must_use]
    pub const fn wallet(&self) -> Option<&Address> {
        self.wallet.as_ref()
    }

    /// Snapshot of everything the session holds
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Snapshot of the connection flags, address and balance
    #[must_use]
    pub fn connection(&self) -> ConnectionState {
        self.state.borrow().connection.clone()
    }

    /// Whether a wallet is connected
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state.borrow().connection.is_connected
    }

    /// Follow state changes, busy flags included
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    // === Connection ===

    /// Create a wallet on the ledger and make it the session's wallet
    ///
    /// Does not connect.
    pub async fn create_wallet(&mut self) -> Result<Address> {
        let _busy = BusyGuard::raise(&self.state, Busy::Loading);
        let address = self
            .call(self.ledger.create_wallet())
            .await
            .inspect_err(|e| warn!("Create wallet failed: {e}"))?;
        info!("Created wallet {address}");
        self.wallet = Some(address.clone());
        Ok(address)
    }

    /// Connect the session's wallet
    ///
    /// On success the session is connected with address and balance set,
    /// and the cached data is refreshed. On failure the state is unchanged.
    pub async fn connect(&mut self) -> Result<WalletInfo> {
        let address = self.wallet.clone().ok_or(LedgerError::NoWallet)?;
        let info = {
            let _busy = BusyGuard::raise(&self.state, Busy::Initializing);
            debug!("Connecting wallet {address}");
            self.call(self.ledger.connect(&address))
                .await
                .inspect_err(|e| warn!("Connect failed for {address}: {e}"))?
        };

        let balance = info.balance.to_string();
        let connected = info.address.clone();
        self.state.send_modify(|s| {
            s.connection.is_connected = true;
            s.connection.wallet_address = Some(connected);
            s.connection.balance = balance;
        });
        info!("Connected wallet {} (balance {})", info.address, info.balance);

        self.refresh_after("connect", &info.address).await;
        Ok(info)
    }

    /// Create a wallet if the session has none, then connect
    pub async fn initialize_wallet(&mut self) -> Result<WalletInfo> {
        if self.wallet.is_none() {
            self.create_wallet().await?;
        }
        self.connect().await
    }

    /// Reset the session to disconnected
    ///
    /// Clears address, balance and cached data. The wallet is remembered so
    /// the session can reconnect.
    pub fn disconnect(&mut self) {
        self.state.send_replace(SessionState::default());
        info!("Disconnected");
    }

    // === Bounties ===

    /// Open a bounty that pays out without approval
    pub async fn create_bounty(
        &mut self,
        amount: Amount,
        repository: &str,
        issue_url: &str,
        deadline: DateTime<Utc>,
    ) -> Result<BountyId> {
        self.create_bounty_with(BountyDraft::new(amount, repository, issue_url, deadline)).await
    }

    /// Open a bounty from a full draft
    pub async fn create_bounty_with(&mut self, draft: BountyDraft) -> Result<BountyId> {
        let address = self.require_connected()?;
        let _busy = BusyGuard::raise(&self.state, Busy::Loading);
        let id = self
            .call(self.ledger.create_bounty(&address, &draft))
            .await
            .inspect_err(|e| warn!("Create bounty failed: {e}"))?;
        info!("Created bounty #{id} for {} on {}", draft.amount, draft.repository);
        self.refresh_after("create bounty", &address).await;
        Ok(id)
    }

    /// Assign an open bounty to another wallet (issuer only)
    pub async fn assign_bounty(&mut self, id: BountyId, assignee: &Address) -> Result<BountyRecord> {
        let address = self.require_connected()?;
        let _busy = BusyGuard::raise(&self.state, Busy::Loading);
        let record = self
            .call(self.ledger.assign_bounty(&address, id, assignee))
            .await
            .inspect_err(|e| warn!("Assign bounty #{id} failed: {e}"))?;
        info!("Assigned bounty #{id} to {assignee}");
        self.refresh_after("assign bounty", &address).await;
        Ok(record)
    }

    /// Take an open bounty for the connected wallet
    ///
    /// Rejected without touching the ledger while disconnected.
    pub async fn self_assign_bounty(&mut self, id: BountyId) -> Result<BountyRecord> {
        let address = self.require_connected()?;
        let _busy = BusyGuard::raise(&self.state, Busy::Loading);
        let record = self
            .call(self.ledger.assign_bounty(&address, id, &address))
            .await
            .inspect_err(|e| warn!("Self-assign bounty #{id} failed: {e}"))?;
        info!("Self-assigned bounty #{id}");
        self.refresh_after("self-assign bounty", &address).await;
        Ok(record)
    }

    /// Submit the pull request for an assigned bounty
    pub async fn submit_pull_request(
        &mut self,
        id: BountyId,
        pr_number: u64,
    ) -> Result<BountyRecord> {
        let address = self.require_connected()?;
        let _busy = BusyGuard::raise(&self.state, Busy::Loading);
        let record = self
            .call(self.ledger.submit_pull_request(&address, id, pr_number))
            .await
            .inspect_err(|e| warn!("Submit PR for bounty #{id} failed: {e}"))?;
        info!("Submitted PR #{pr_number} for bounty #{id} ({})", record.status);
        self.refresh_after("submit pull request", &address).await;
        Ok(record)
    }

    /// Approve a bounty in review (issuer only)
    pub async fn approve_bounty(&mut self, id: BountyId) -> Result<BountyRecord> {
        let address = self.require_connected()?;
        let _busy = BusyGuard::raise(&self.state, Busy::Loading);
        let record = self
            .call(self.ledger.approve_bounty(&address, id))
            .await
            .inspect_err(|e| warn!("Approve bounty #{id} failed: {e}"))?;
        info!("Approved bounty #{id}");
        self.refresh_after("approve bounty", &address).await;
        Ok(record)
    }

    // === Developers ===

    /// Register the connected wallet as a developer
    pub async fn register_developer<S: AsRef<str> + Sync>(
        &mut self,
        skills: &[S],
    ) -> Result<DeveloperProfile> {
        let address = self.require_connected()?;
        let skills: Vec<String> = skills.iter().map(|s| s.as_ref().to_string()).collect();
        let _busy = BusyGuard::raise(&self.state, Busy::Loading);
        let profile = self
            .call(self.ledger.register_developer(&address, &skills))
            .await
            .inspect_err(|e| warn!("Register developer failed: {e}"))?;
        info!("Registered developer {address} with {} skill(s)", profile.skills.len());
        self.refresh_after("register developer", &address).await;
        Ok(profile)
    }

    /// Rate the developer who completed one of the connected wallet's bounties
    pub async fn submit_rating(
        &mut self,
        developer: &Address,
        id: BountyId,
        scores: RatingScores,
    ) -> Result<DeveloperProfile> {
        let address = self.require_connected()?;
        let _busy = BusyGuard::raise(&self.state, Busy::Loading);
        let profile = self
            .call(self.ledger.submit_rating(&address, developer, id, &scores))
            .await
            .inspect_err(|e| warn!("Rating for bounty #{id} failed: {e}"))?;
        info!("Rated {developer} for bounty #{id} (average now {:.2})", profile.average_rating);
        self.refresh_after("submit rating", &address).await;
        Ok(profile)
    }

    /// Endorse a skill on another developer's profile
    ///
    /// Returns `true` if the skill was added, `false` if already listed.
    pub async fn endorse_skill(&mut self, developer: &Address, skill: &str) -> Result<bool> {
        let address = self.require_connected()?;
        let _busy = BusyGuard::raise(&self.state, Busy::Loading);
        let added = self
            .call(self.ledger.endorse_skill(&address, developer, skill))
            .await
            .inspect_err(|e| warn!("Endorse {skill} for {developer} failed: {e}"))?;
        if added {
            info!("Endorsed {developer} for {skill}");
        } else {
            debug!("{developer} already lists {skill}");
        }
        self.refresh_after("endorse skill", &address).await;
        Ok(added)
    }

    // === Refresh ===

    /// Re-fetch balance, bounties, profile and reputation
    ///
    /// No-op while disconnected. On failure the cached data is unchanged.
    pub async fn refresh_data(&mut self) -> Result<()> {
        let Ok(address) = self.require_connected() else {
            debug!("Refresh skipped: not connected");
            return Ok(());
        };
        let _busy = BusyGuard::raise(&self.state, Busy::Loading);
        self.reload(&address).await.inspect_err(|e| warn!("Refresh failed: {e}"))
    }

    // === Queries ===
    //
    // Read-only lookups; no connection needed and session state is untouched.

    /// Look up any bounty by id
    pub async fn bounty(&self, id: BountyId) -> Result<BountyRecord> {
        self.call(self.ledger.bounty(id)).await
    }

    /// Profile (if registered) and reputation score of any developer
    pub async fn developer(&self, address: &Address) -> Result<(Option<DeveloperProfile>, u64)> {
        tokio::try_join!(
            self.call(self.ledger.developer_profile(address)),
            self.call(self.ledger.reputation(address)),
        )
    }

    async fn reload(&self, address: &Address) -> Result<()> {
        let (balance, issued, assigned, profile, reputation) = tokio::try_join!(
            self.call(self.ledger.balance(address)),
            self.call(self.ledger.bounties_issued_by(address)),
            self.call(self.ledger.bounties_assigned_to(address)),
            self.call(self.ledger.developer_profile(address)),
            self.call(self.ledger.reputation(address)),
        )?;

        let balance = balance.to_string();
        self.state.send_modify(|s| {
            s.connection.balance = balance;
            s.issued_bounties = issued;
            s.assigned_bounties = assigned;
            s.developer_profile = profile;
            s.reputation_score = reputation;
        });
        debug!("Refreshed session data for {address}");
        Ok(())
    }

    async fn refresh_after(&self, operation: &str, address: &Address) {
        if let Err(e) = self.reload(address).await {
            warn!("Refresh after {operation} failed: {e}");
        }
    }

    fn require_connected(&self) -> Result<Address> {
        let state = self.state.borrow();
        match (&state.connection.wallet_address, state.connection.is_connected) {
            (Some(address), true) => Ok(address.clone()),
            _ => Err(LedgerError::NotConnected),
        }
    }

    async fn call<T>(&self, op: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.timeout, op)
            .await
            .unwrap_or(Err(LedgerError::Timeout(self.timeout)))
    }
}
