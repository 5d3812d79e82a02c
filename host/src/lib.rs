//! Interfaces to the host collaborators the election contract relies on.
//!
//! - [`TokenLedger`]: balances, supply, and outbound transfers of the token
//!   that backs stake, votes, and pay.
//! - [`AuthorityManager`]: capability checks for privileged callers, and the
//!   sink for the authorization policy derived on each tenure.
//!
//! The contract only depends on these traits; the host (or a test double)
//! provides the implementations.

pub mod authority;
pub mod error;
pub mod ledger;

pub use authority::{AuthorityManager, AuthorityPolicy, Capability, PermissionLevelWeight};
pub use error::{AuthorityError, LedgerError};
pub use ledger::{TokenLedger, Transfer};
