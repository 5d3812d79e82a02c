//! Read-through staging area for one operation.
//!
//! Operations never write to the store directly. They read through
//! [`Staging`], which overlays the writes staged so far on top of the store,
//! and stage their own writes, outbound transfers, and authority policy.
//! Nothing is applied until the contract commits the finished staging area.

use crate::error::AuditorError;
use auditor_host::{AuthorityPolicy, Transfer};
use auditor_store::{Candidate, ElectionState, ElectionStore, Vote, WriteSet};
use auditor_types::AccountName;
use std::collections::BTreeMap;

/// Everything an operation wants to do, once it has been fully validated.
#[derive(Debug, Default)]
pub struct Plan {
    pub writes: WriteSet,
    pub transfers: Vec<Transfer>,
    pub policy: Option<AuthorityPolicy>,
}

pub struct Staging<'a, S: ElectionStore + ?Sized> {
    store: &'a S,
    plan: Plan,
}

impl<'a, S: ElectionStore + ?Sized> Staging<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            plan: Plan::default(),
        }
    }

    pub fn into_plan(self) -> Plan {
        self.plan
    }

    // ── Candidates ──────────────────────────────────────────────────────

    pub fn candidate(&self, name: &AccountName) -> Result<Option<Candidate>, AuditorError> {
        if let Some(c) = self.plan.writes.staged_candidate(name) {
            return Ok(Some(c.clone()));
        }
        Ok(self.store.get_candidate(name)?)
    }

    /// Like [`Self::candidate`], but a missing record is an error.
    pub fn require_candidate(&self, name: &AccountName) -> Result<Candidate, AuditorError> {
        self.candidate(name)?
            .ok_or_else(|| AuditorError::CandidateNotFound(name.clone()))
    }

    /// All candidates with staged writes applied, in ascending name order.
    pub fn candidates(&self) -> Result<Vec<Candidate>, AuditorError> {
        let mut merged: BTreeMap<AccountName, Candidate> = self
            .store
            .iter_candidates()?
            .into_iter()
            .map(|c| (c.candidate_name.clone(), c))
            .collect();
        for c in self.plan.writes.candidates() {
            merged.insert(c.candidate_name.clone(), c.clone());
        }
        Ok(merged.into_values().collect())
    }

    pub fn put_candidate(&mut self, candidate: Candidate) {
        self.plan.writes.put_candidate(candidate);
    }

    // ── Votes ───────────────────────────────────────────────────────────

    pub fn vote(&self, voter: &AccountName) -> Result<Option<Vote>, AuditorError> {
        if let Some(staged) = self.plan.writes.staged_vote(voter) {
            return Ok(staged.cloned());
        }
        Ok(self.store.get_vote(voter)?)
    }

    pub fn put_vote(&mut self, vote: Vote) {
        self.plan.writes.put_vote(vote);
    }

    pub fn delete_vote(&mut self, voter: &AccountName) {
        self.plan.writes.delete_vote(voter);
    }

    // ── Roster ──────────────────────────────────────────────────────────

    pub fn auditors(&self) -> Result<Vec<AccountName>, AuditorError> {
        if let Some(roster) = self.plan.writes.staged_auditors() {
            return Ok(roster.to_vec());
        }
        Ok(self.store.auditors()?)
    }

    pub fn replace_auditors(&mut self, roster: Vec<AccountName>) {
        self.plan.writes.replace_auditors(roster);
    }

    // ── Bios ────────────────────────────────────────────────────────────

    pub fn put_bio(&mut self, candidate: &AccountName, bio: String) {
        self.plan.writes.put_bio(candidate, bio);
    }

    // ── State ───────────────────────────────────────────────────────────

    pub fn state(&self) -> Result<ElectionState, AuditorError> {
        if let Some(state) = self.plan.writes.staged_state() {
            return Ok(state.clone());
        }
        Ok(self.store.election_state()?)
    }

    pub fn put_state(&mut self, state: ElectionState) {
        self.plan.writes.put_state(state);
    }

    // ── Collaborator effects ────────────────────────────────────────────

    pub fn push_transfer(&mut self, transfer: Transfer) {
        self.plan.transfers.push(transfer);
    }

    pub fn set_policy(&mut self, policy: AuthorityPolicy) {
        self.plan.policy = Some(policy);
    }
}
