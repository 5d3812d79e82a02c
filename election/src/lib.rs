//! Stake-weighted auditor elections.
//!
//! Candidates lock a bond by transferring tokens to the contract account,
//! nominate themselves, and collect weighted votes. A periodic tenure
//! rotation elects the top candidates as auditors, pays them, and derives
//! the authorization policy of the managed account from the new roster.
//!
//! All state changes go through [`AuditorContract::execute`], which plans an
//! operation against a staged view and applies it only once every check has
//! passed.

pub mod candidate;
pub mod contract;
pub mod error;
pub mod operation;
pub mod stake;
pub mod staging;
pub mod tally;
pub mod tenure;
pub mod unstake;

pub use contract::{AuditorContract, Receipt};
pub use error::{AuditorError, ErrorKind};
pub use operation::{ExecutionContext, Operation};
pub use staging::{Plan, Staging};
pub use tenure::{derive_policy, quorum_met, rank, Rotation};
