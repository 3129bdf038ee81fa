//! bountyledger - wallet and ledger layer for a bounty and reputation app
//!
//! Issuers escrow funds against source-code issues, developers claim and
//! complete them, and completed work feeds a reputation score built from
//! ratings and skill endorsements. A [`WalletSession`](core::services::WalletSession)
//! holds the connection state a front-end renders; the authoritative state
//! lives behind the [`Ledger`](core::ports::Ledger) port.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapters;
pub mod config;
pub mod core;
pub mod error;
pub mod output;
pub mod paths;

pub use error::{LedgerError, Result};
