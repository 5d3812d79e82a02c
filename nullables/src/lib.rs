//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the contract (clock, storage, token ledger,
//! account authority) is abstracted behind a trait. This crate provides
//! in-memory implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests and local replays.

pub mod authority;
pub mod clock;
pub mod ledger;
pub mod store;

pub use authority::NullAuthority;
pub use clock::NullClock;
pub use ledger::NullLedger;
pub use store::NullStore;
