//! Command implementations

mod bounty;
mod dev;
mod status;
mod wallet;

pub use bounty::bounty;
pub use dev::dev;
pub use status::status;
pub use wallet::wallet;

use anyhow::Context as _;

use bountyledger::adapters;
use bountyledger::config::Config;
use bountyledger::core::models::Address;
use bountyledger::core::services::WalletSession;
use bountyledger::output::OutputMode;

/// Settings resolved once per invocation
#[derive(Debug)]
pub struct Context {
    /// Loaded configuration
    pub config: Config,
    /// `--wallet`, else the configured default
    pub wallet: Option<Address>,
    /// Output mode
    pub mode: OutputMode,
}

impl Context {
    /// Load config and resolve the wallet to act as
    pub fn load(wallet: Option<Address>, mode: OutputMode) -> anyhow::Result<Self> {
        let config = Config::load()?;
        let wallet = match wallet {
            Some(address) => Some(address),
            None => config
                .wallet_address()
                .with_context(|| format!("Invalid wallet in {}", Config::config_path().display()))?,
        };
        Ok(Self {
            config,
            wallet,
            mode,
        })
    }

    /// Open a disconnected session on the configured ledger
    pub fn session(&self) -> anyhow::Result<WalletSession> {
        let ledger = adapters::open_ledger(&self.config.ledger)?;
        let session = WalletSession::new(ledger).with_timeout(self.config.ledger.timeout());
        Ok(match &self.wallet {
            Some(address) => session.with_wallet(address.clone()),
            None => session,
        })
    }

    /// Open a session and connect the wallet
    pub async fn connect(&self) -> anyhow::Result<WalletSession> {
        if self.wallet.is_none() {
            anyhow::bail!(
                "No wallet configured. Run 'bountyledger wallet create' or pass --wallet <address>"
            );
        }
        let mut session = self.session()?;
        session.connect().await?;
        Ok(session)
    }
}
