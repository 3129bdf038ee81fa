//! Business logic services
//!
//! - [`book`] - The ledger state machine (balances, bounties, reputation)
//! - [`reputation`] - Rating averages, aggregate score, verification
//! - [`validation`] - Input rules applied before any state changes
//! - [`session`] - Session-scoped wallet state over a [`Ledger`](crate::core::ports::Ledger)
//!
//! `book`, `reputation` and `validation` are pure: no I/O, time passed in.

pub mod book;
pub mod reputation;
pub mod session;
pub mod validation;

pub use book::LedgerBook;
pub use session::WalletSession;
