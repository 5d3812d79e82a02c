//! Nullable authority — a fixed set of privileged actors, policies recorded.

use auditor_host::{AuthorityError, AuthorityManager, AuthorityPolicy, Capability};
use auditor_types::AccountName;
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

/// A test authority that grants [`Capability::Elevated`] to a configured set
/// of actors and records every policy it is asked to apply.
pub struct NullAuthority {
    elevated: RefCell<BTreeSet<AccountName>>,
    applied: RefCell<Vec<AuthorityPolicy>>,
    reject_policies: Cell<bool>,
}

impl NullAuthority {
    pub fn new() -> Self {
        Self {
            elevated: RefCell::new(BTreeSet::new()),
            applied: RefCell::new(Vec::new()),
            reject_policies: Cell::new(false),
        }
    }

    /// Grant the elevated capability to `actor`.
    pub fn grant_elevated(&self, actor: &AccountName) {
        self.elevated.borrow_mut().insert(actor.clone());
    }

    /// Make every subsequent `apply_policy` fail.
    pub fn reject_policies(&self, reject: bool) {
        self.reject_policies.set(reject);
    }

    /// All policies applied so far, oldest first.
    pub fn applied(&self) -> Vec<AuthorityPolicy> {
        self.applied.borrow().clone()
    }

    /// The most recently applied policy.
    pub fn last_policy(&self) -> Option<AuthorityPolicy> {
        self.applied.borrow().last().cloned()
    }
}

impl Default for NullAuthority {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorityManager for NullAuthority {
    fn has_capability(
        &self,
        actor: &AccountName,
        capability: Capability,
    ) -> Result<bool, AuthorityError> {
        match capability {
            Capability::Elevated => Ok(self.elevated.borrow().contains(actor)),
        }
    }

    fn apply_policy(&self, policy: &AuthorityPolicy) -> Result<(), AuthorityError> {
        if self.reject_policies.get() {
            return Err(AuthorityError::Rejected(format!(
                "{}@{}",
                policy.account, policy.permission
            )));
        }
        self.applied.borrow_mut().push(policy.clone());
        Ok(())
    }
}
