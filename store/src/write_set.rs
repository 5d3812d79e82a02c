//! Every mutation an operation wants to make, collected
//! before anything touches the store.
//!
//! # Usage
//!
//! ```ignore
//! let mut writes = WriteSet::new();
//! writes.put_candidate(candidate);
//! writes.delete_vote(&voter);
//! writes.replace_auditors(new_roster);
//! store.commit(writes)?;
//! ```
//!
//! A `WriteSet` that is dropped without being committed has no effect.

use crate::{Candidate, ElectionState, ElectionStore, StoreError, Vote};
use auditor_types::AccountName;
use std::collections::BTreeMap;

/// Writes staged for one atomic commit.
///
/// Later writes to the same key replace earlier ones.
#[derive(Clone, Debug, Default)]
pub struct WriteSet {
    candidates: BTreeMap<AccountName, Candidate>,
    /// `None` marks a deletion.
    votes: BTreeMap<AccountName, Option<Vote>>,
    bios: BTreeMap<AccountName, String>,
    auditors: Option<Vec<AccountName>>,
    state: Option<ElectionState>,
}

impl WriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
            && self.votes.is_empty()
            && self.bios.is_empty()
            && self.auditors.is_none()
            && self.state.is_none()
    }

    // ── Staging ─────────────────────────────────────────────────────────

    pub fn put_candidate(&mut self, candidate: Candidate) {
        self.candidates
            .insert(candidate.candidate_name.clone(), candidate);
    }

    pub fn put_vote(&mut self, vote: Vote) {
        self.votes.insert(vote.voter.clone(), Some(vote));
    }

    pub fn delete_vote(&mut self, voter: &AccountName) {
        self.votes.insert(voter.clone(), None);
    }

    pub fn put_bio(&mut self, candidate: &AccountName, bio: String) {
        self.bios.insert(candidate.clone(), bio);
    }

    /// Replace the whole roster. The stored roster is kept sorted.
    pub fn replace_auditors(&mut self, mut roster: Vec<AccountName>) {
        roster.sort();
        roster.dedup();
        self.auditors = Some(roster);
    }

    pub fn put_state(&mut self, state: ElectionState) {
        self.state = Some(state);
    }

    // ── Read-through lookups ────────────────────────────────────────────

    pub fn staged_candidate(&self, name: &AccountName) -> Option<&Candidate> {
        self.candidates.get(name)
    }

    /// `Some(None)` means the vote is staged for deletion.
    pub fn staged_vote(&self, voter: &AccountName) -> Option<Option<&Vote>> {
        self.votes.get(voter).map(Option::as_ref)
    }

    pub fn staged_auditors(&self) -> Option<&[AccountName]> {
        self.auditors.as_deref()
    }

    pub fn staged_state(&self) -> Option<&ElectionState> {
        self.state.as_ref()
    }

    /// The writes that put every key touched by `self` back to its current
    /// value in `store`. Commit them to undo a committed `self`.
    ///
    /// There are no candidate or bio deletes, so rows that `self` creates
    /// survive the undo.
    pub fn before_image<S: ElectionStore + ?Sized>(&self, store: &S) -> Result<WriteSet, StoreError> {
        let mut undo = WriteSet::new();
        for name in self.candidates.keys() {
            if let Some(previous) = store.get_candidate(name)? {
                undo.put_candidate(previous);
            }
        }
        for voter in self.votes.keys() {
            match store.get_vote(voter)? {
                Some(previous) => undo.put_vote(previous),
                None => undo.delete_vote(voter),
            }
        }
        for candidate in self.bios.keys() {
            if let Some(previous) = store.get_bio(candidate)? {
                undo.put_bio(candidate, previous);
            }
        }
        if self.auditors.is_some() {
            undo.replace_auditors(store.auditors()?);
        }
        if self.state.is_some() {
            undo.put_state(store.election_state()?);
        }
        Ok(undo)
    }

    // ── Draining (for backends) ─────────────────────────────────────────

    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.values()
    }

    pub fn votes(&self) -> impl Iterator<Item = (&AccountName, Option<&Vote>)> {
        self.votes.iter().map(|(k, v)| (k, v.as_ref()))
    }

    pub fn bios(&self) -> impl Iterator<Item = (&AccountName, &str)> {
        self.bios.iter().map(|(k, v)| (k, v.as_str()))
    }
}
