//! Candidate records and their storage trait.

use crate::StoreError;
use auditor_types::{AccountName, Asset, Timestamp};
use serde::{Deserialize, Serialize};

/// Why a candidate's stake is currently time-locked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockKind {
    /// Set when a credit arrives; cleared again by a voluntary withdrawal.
    Deposit,
    /// Set when the candidate leaves (or is removed from) office; only time clears it.
    Tenure,
}

/// A registered candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub candidate_name: AccountName,
    /// Total stake custodied for this candidate.
    pub locked_tokens: Asset,
    /// Sum of the effective weights of every vote naming this candidate.
    pub total_votes: u128,
    /// Whether the candidate is currently standing for election.
    pub is_active: bool,
    /// Stake cannot be released before this time.
    pub unstaking_end_time: Timestamp,
    pub lock_kind: LockKind,
}

impl Candidate {
    /// A fresh, inactive candidate created by its first credit.
    pub fn from_deposit(name: AccountName, quantity: Asset, unlock_at: Timestamp) -> Self {
        Self {
            candidate_name: name,
            locked_tokens: quantity,
            total_votes: 0,
            is_active: false,
            unstaking_end_time: unlock_at,
            lock_kind: LockKind::Deposit,
        }
    }

    /// Whether the stake is still time-locked at `now`.
    pub fn is_locked(&self, now: Timestamp) -> bool {
        now < self.unstaking_end_time
    }

    /// Apply a tenure lock expiring at `until`, never shortening a later lock.
    pub fn lock_for_tenure(&mut self, until: Timestamp) {
        self.unstaking_end_time = self.unstaking_end_time.max(until);
        self.lock_kind = LockKind::Tenure;
    }
}

/// Trait for candidate storage reads.
pub trait CandidateStore {
    fn get_candidate(&self, name: &AccountName) -> Result<Option<Candidate>, StoreError>;

    /// All candidates, in ascending name order.
    fn iter_candidates(&self) -> Result<Vec<Candidate>, StoreError>;

    /// Candidates currently standing for election.
    fn iter_active_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        self.iter_candidates()
            .map(|all| all.into_iter().filter(|c| c.is_active).collect())
    }
}
