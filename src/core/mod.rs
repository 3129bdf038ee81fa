//! Core domain logic for bountyledger
//!
//! All interaction with the wallet/ledger service goes through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (Address, Amount, BountyRecord, DeveloperProfile)
//! - `services/` - Ledger state machine, reputation rules, wallet session
//! - `ports/` - Trait definitions for external dependencies

pub mod models;
pub mod ports;
pub mod services;
