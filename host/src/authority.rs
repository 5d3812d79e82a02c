//! Account authority collaborator.

use crate::AuthorityError;
use auditor_types::AccountName;
use serde::{Deserialize, Serialize};

/// Capability levels the contract asks the host to verify.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    /// The mid-level permission of the managed account, required for
    /// force-removing candidates and auditors.
    Elevated,
}

/// One weighted signer in a permission.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PermissionLevelWeight {
    pub actor: AccountName,
    pub permission: String,
    pub weight: u16,
}

/// The authorization structure the managed account should carry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityPolicy {
    pub account: AccountName,
    pub permission: String,
    pub parent: String,
    pub threshold: u32,
    /// Signers, sorted by actor.
    pub accounts: Vec<PermissionLevelWeight>,
}

/// The host's permission system.
pub trait AuthorityManager {
    /// Whether `actor` holds `capability`.
    fn has_capability(&self, actor: &AccountName, capability: Capability)
        -> Result<bool, AuthorityError>;

    /// Install `policy` on its managed account.
    fn apply_policy(&self, policy: &AuthorityPolicy) -> Result<(), AuthorityError>;
}
