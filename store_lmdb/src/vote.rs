//! LMDB implementation of VoteStore.

use auditor_store::{StoreError, Vote, VoteStore};
use auditor_types::AccountName;

use crate::environment::{read_all, read_one, LmdbEnvironment};

impl VoteStore for LmdbEnvironment {
    fn get_vote(&self, voter: &AccountName) -> Result<Option<Vote>, StoreError> {
        Ok(read_one(self.env(), &self.votes_db, voter.as_str().as_bytes())?)
    }

    fn iter_votes(&self) -> Result<Vec<Vote>, StoreError> {
        Ok(read_all(self.env(), &self.votes_db)?)
    }
}
