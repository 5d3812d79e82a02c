//! Vote records and their storage trait.

use crate::StoreError;
use auditor_types::AccountName;
use serde::{Deserialize, Serialize};

/// One voter's current ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter: AccountName,
    /// Reserved; recorded but never resolved.
    pub proxy: Option<AccountName>,
    /// Effective weight the ballot carries for each listed candidate.
    pub weight: u128,
    /// Candidates voted for, in submission order.
    pub candidates: Vec<AccountName>,
}

/// Trait for vote storage reads.
pub trait VoteStore {
    fn get_vote(&self, voter: &AccountName) -> Result<Option<Vote>, StoreError>;

    /// All votes, in ascending voter order.
    fn iter_votes(&self) -> Result<Vec<Vote>, StoreError>;
}
