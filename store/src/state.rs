//! Contract-wide election state singleton.

use crate::StoreError;
use auditor_types::Timestamp;
use serde::{Deserialize, Serialize};

/// Bookkeeping shared by every operation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionState {
    /// When the last successful tenure rotation ran, if ever.
    pub last_tenure: Option<Timestamp>,
    /// Set once the initial participation quorum has been reached.
    pub met_initial_votes_threshold: bool,
    /// Sum of the effective weights of every recorded vote.
    pub total_weight_of_votes: u128,
    pub number_active_candidates: u32,
}

/// Trait for reading the election state singleton.
pub trait StateStore {
    /// The current state; a store that has never been written returns the default.
    fn election_state(&self) -> Result<ElectionState, StoreError>;
}
