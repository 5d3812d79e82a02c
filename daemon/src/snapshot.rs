//! Point-in-time dump of every collection, for printing.

use std::collections::BTreeMap;

use auditor_store::{Candidate, ElectionState, ElectionStore, StoreError, Vote};
use auditor_types::AccountName;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub candidates: Vec<Candidate>,
    pub bios: BTreeMap<AccountName, String>,
    pub votes: Vec<Vote>,
    pub auditors: Vec<AccountName>,
    pub state: ElectionState,
}

impl Snapshot {
    pub fn capture<S: ElectionStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        let candidates = store.iter_candidates()?;
        let mut bios = BTreeMap::new();
        for c in &candidates {
            if let Some(bio) = store.get_bio(&c.candidate_name)? {
                bios.insert(c.candidate_name.clone(), bio);
            }
        }
        Ok(Self {
            candidates,
            bios,
            votes: store.iter_votes()?,
            auditors: store.auditors()?,
            state: store.election_state()?,
        })
    }
}
