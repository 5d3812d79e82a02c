//! Fundamental types for the auditor election contract.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account names, token symbols and assets, timestamps, and the contract configuration.

pub mod account;
pub mod asset;
pub mod config;
pub mod error;
pub mod time;

pub use account::AccountName;
pub use asset::{Asset, Symbol};
pub use config::AuditorConfig;
pub use error::TypesError;
pub use time::Timestamp;
