//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundary between the session logic and the
//! external wallet/ledger service.
//!
//! Implementations live in the `adapters` module.
//!
//! ## Design Principle
//!
//! The session depends only on these traits, never on a concrete backend.
//! Tests swap in mocks; the CLI picks a backend from configuration.

mod ledger;

pub use ledger::Ledger;

#[cfg(test)]
pub use ledger::MockLedger;
