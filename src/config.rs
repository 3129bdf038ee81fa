//! Configuration management
//!
//! Stored at `<home>/config.toml` (see [`paths`]). Holds the default wallet
//! and the ledger backend settings. Every field has a default, so a missing
//! or partial file is fine.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::adapters::{LedgerBackend, LedgerOptions};
use crate::core::models::{Address, Amount};
use crate::core::services::book::{DEFAULT_STARTING_TOKENS, DEFAULT_TOKEN};
use crate::error::Result;
use crate::paths;

/// bountyledger configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Wallet used when `--wallet` is not given
    #[serde(default)]
    pub wallet: WalletConfig,
    /// Ledger backend settings
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Default wallet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Address of the default wallet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Ledger backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Which backend to open
    #[serde(default)]
    pub backend: LedgerBackend,
    /// File ledger location (defaults to `<home>/ledger.json`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
    /// Token denomination for a fresh ledger
    #[serde(default = "default_token")]
    pub token: String,
    /// Balance credited to new wallets, in whole or fractional tokens
    #[serde(default = "default_starting_balance")]
    pub starting_balance: String,
    /// Artificial latency per ledger call, in milliseconds
    #[serde(default)]
    pub latency_ms: u64,
    /// Upper bound on a single ledger call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_token() -> String {
    DEFAULT_TOKEN.to_string()
}

fn default_starting_balance() -> String {
    DEFAULT_STARTING_TOKENS.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: LedgerBackend::default(),
            state_file: None,
            token: default_token(),
            starting_balance: default_starting_balance(),
            latency_ms: 0,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LedgerConfig {
    /// Upper bound on a single ledger call
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Artificial latency per ledger call
    #[must_use]
    pub const fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// File ledger location
    #[must_use]
    pub fn state_file(&self) -> PathBuf {
        self.state_file.clone().unwrap_or_else(paths::ledger_file)
    }

    /// Options for a fresh ledger
    pub fn options(&self) -> Result<LedgerOptions> {
        Ok(LedgerOptions {
            latency: self.latency(),
            starting_balance: Amount::parse(&self.starting_balance)?,
            token: self.token.clone(),
        })
    }
}

impl Config {
    /// Get the config file path
    #[must_use]
    pub fn config_path() -> PathBuf {
        paths::config_file()
    }

    /// Load config from the default location
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, or the default if it is missing
    ///
    /// An unreadable or malformed file is an error so that a later save
    /// cannot overwrite the user's settings with defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Save config to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// The configured default wallet, if any
    pub fn wallet_address(&self) -> Result<Option<Address>> {
        self.wallet.address.as_deref().map(Address::parse).transpose()
    }

    /// Make `address` the default wallet
    pub fn set_wallet(&mut self, address: &Address) {
        self.wallet.address = Some(address.to_string());
    }
}
