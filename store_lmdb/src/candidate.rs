//! LMDB implementation of CandidateStore.

use auditor_store::{Candidate, CandidateStore, StoreError};
use auditor_types::AccountName;

use crate::environment::{read_all, read_one, LmdbEnvironment};

impl CandidateStore for LmdbEnvironment {
    fn get_candidate(&self, name: &AccountName) -> Result<Option<Candidate>, StoreError> {
        Ok(read_one(self.env(), &self.candidates_db, name.as_str().as_bytes())?)
    }

    fn iter_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        Ok(read_all(self.env(), &self.candidates_db)?)
    }
}
