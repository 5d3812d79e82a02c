//! Abstract storage traits for the auditor election contract.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. Reads go through the per-collection traits; writes are staged in a
//! [`WriteSet`] and applied atomically by [`ElectionStore::commit`], so no
//! operation can leave the collections half-updated.

pub mod auditor;
pub mod bio;
pub mod candidate;
pub mod error;
pub mod state;
pub mod vote;
pub mod write_set;

pub use auditor::AuditorStore;
pub use bio::BioStore;
pub use candidate::{Candidate, CandidateStore, LockKind};
pub use error::StoreError;
pub use state::{ElectionState, StateStore};
pub use vote::{Vote, VoteStore};
pub use write_set::WriteSet;

/// A backend holding every collection the contract owns.
pub trait ElectionStore: CandidateStore + VoteStore + AuditorStore + BioStore + StateStore {
    /// Apply all staged writes as one atomic unit.
    ///
    /// Either every write in `writes` becomes visible or none does.
    fn commit(&self, writes: WriteSet) -> Result<(), StoreError>;
}
