//! Nullable store — thread-safe in-memory storage.

use auditor_store::{
    AuditorStore, BioStore, Candidate, CandidateStore, ElectionState, ElectionStore,
    StateStore, StoreError, Vote, VoteStore, WriteSet,
};
use auditor_types::AccountName;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Tables {
    candidates: BTreeMap<AccountName, Candidate>,
    votes: BTreeMap<AccountName, Vote>,
    bios: BTreeMap<AccountName, String>,
    auditors: Vec<AccountName>,
    state: ElectionState,
}

/// An in-memory implementation of every election collection.
/// Thread-safe; a commit holds the single lock for its whole duration.
pub struct NullStore {
    tables: Mutex<Tables>,
    fail_commits: AtomicBool,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            fail_commits: AtomicBool::new(false),
        }
    }

    /// Make every following commit fail without writing, like a full disk.
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
    }

    /// Number of candidate rows, active or not.
    pub fn candidate_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.candidates.len())
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateStore for NullStore {
    fn get_candidate(&self, name: &AccountName) -> Result<Option<Candidate>, StoreError> {
        Ok(self.lock()?.candidates.get(name).cloned())
    }

    fn iter_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        Ok(self.lock()?.candidates.values().cloned().collect())
    }
}

impl VoteStore for NullStore {
    fn get_vote(&self, voter: &AccountName) -> Result<Option<Vote>, StoreError> {
        Ok(self.lock()?.votes.get(voter).cloned())
    }

    fn iter_votes(&self) -> Result<Vec<Vote>, StoreError> {
        Ok(self.lock()?.votes.values().cloned().collect())
    }
}

impl AuditorStore for NullStore {
    fn auditors(&self) -> Result<Vec<AccountName>, StoreError> {
        Ok(self.lock()?.auditors.clone())
    }
}

impl BioStore for NullStore {
    fn get_bio(&self, candidate: &AccountName) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.bios.get(candidate).cloned())
    }
}

impl StateStore for NullStore {
    fn election_state(&self) -> Result<ElectionState, StoreError> {
        Ok(self.lock()?.state.clone())
    }
}

impl ElectionStore for NullStore {
    fn commit(&self, writes: WriteSet) -> Result<(), StoreError> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("commits are switched off".to_string()));
        }
        let mut tables = self.lock()?;
        for candidate in writes.candidates() {
            tables
                .candidates
                .insert(candidate.candidate_name.clone(), candidate.clone());
        }
        for (voter, vote) in writes.votes() {
            match vote {
                Some(vote) => {
                    tables.votes.insert(voter.clone(), vote.clone());
                }
                None => {
                    tables.votes.remove(voter);
                }
            }
        }
        for (candidate, bio) in writes.bios() {
            tables.bios.insert(candidate.clone(), bio.to_string());
        }
        if let Some(roster) = writes.staged_auditors() {
            tables.auditors = roster.to_vec();
        }
        if let Some(state) = writes.staged_state() {
            tables.state = state.clone();
        }
        Ok(())
    }
}
