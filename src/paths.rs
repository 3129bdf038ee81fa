//! Centralized path definitions for bountyledger
//!
//! ## Storage Layout
//!
//! ```text
//! ~/.bountyledger/          # or $BOUNTYLEDGER_HOME
//! ├── config.toml           # Default wallet, ledger settings
//! └── ledger.json           # File ledger state
//! ```

use std::path::PathBuf;

/// Environment variable overriding the home directory
pub const HOME_ENV: &str = "BOUNTYLEDGER_HOME";

/// Home directory name under the user's home
const HOME_DIR: &str = ".bountyledger";

/// Configuration filename
const CONFIG_FILE: &str = "config.toml";

/// File ledger state filename
const LEDGER_FILE: &str = "ledger.json";

/// Get the bountyledger home directory.
///
/// `$BOUNTYLEDGER_HOME` when set and non-empty, otherwise `~/.bountyledger`.
#[must_use]
pub fn home_dir() -> PathBuf {
    match std::env::var_os(HOME_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(HOME_DIR),
    }
}

/// Get path to `config.toml`
#[must_use]
pub fn config_file() -> PathBuf {
    home_dir().join(CONFIG_FILE)
}

/// Get the default file ledger location
#[must_use]
pub fn ledger_file() -> PathBuf {
    home_dir().join(LEDGER_FILE)
}
