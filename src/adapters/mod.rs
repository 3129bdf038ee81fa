//! Ledger backends
//!
//! Concrete implementations of the [`Ledger`] port:
//!
//! - `memory/` - Shared in-process ledger with simulated latency and outages
//! - `file/` - JSON file ledger that survives between CLI invocations

pub mod file;
pub mod memory;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use file::FileLedger;
pub use memory::{InMemoryLedger, LedgerOptions};

use crate::config::LedgerConfig;
use crate::core::ports::Ledger;
use crate::error::Result;

/// Which ledger implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackend {
    /// Process-local; state is lost when the process exits
    Memory,
    /// JSON state file (default)
    #[default]
    File,
}

impl FromStr for LedgerBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "file" | "json" => Ok(Self::File),
            _ => Err(format!("Unknown ledger backend: {s}. Use 'memory' or 'file'")),
        }
    }
}

impl fmt::Display for LedgerBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::File => write!(f, "file"),
        }
    }
}

/// Open the ledger described by `config`
pub fn open_ledger(config: &LedgerConfig) -> Result<Arc<dyn Ledger>> {
    let options = config.options()?;
    log::debug!("Opening {} ledger", config.backend);
    let ledger: Arc<dyn Ledger> = match config.backend {
        LedgerBackend::Memory => Arc::new(InMemoryLedger::with_options(&options)),
        LedgerBackend::File => Arc::new(FileLedger::new(
            config.state_file(),
            options.token,
            options.starting_balance,
        )),
    };
    Ok(ledger)
}
