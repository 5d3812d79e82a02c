//! Write batching — applies a whole [`WriteSet`] inside a single LMDB write
//! transaction.
//!
//! # Usage
//!
//! ```ignore
//! let mut writes = WriteSet::new();
//! writes.put_candidate(candidate);
//! writes.replace_auditors(roster);
//! env.commit(writes)?;
//! ```
//!
//! If any put fails the transaction is dropped without committing and LMDB
//! aborts it, so either every write lands or none does.

use heed::RwTxn;

use auditor_store::{ElectionStore, StoreError, WriteSet};

use crate::environment::{encode, LmdbEnvironment};
use crate::meta::ELECTION_STATE_KEY;
use crate::LmdbError;

struct WriteBatch<'a> {
    txn: RwTxn<'a>,
    env: &'a LmdbEnvironment,
}

impl<'a> WriteBatch<'a> {
    fn new(env: &'a LmdbEnvironment) -> Result<Self, LmdbError> {
        let txn = env.env().write_txn()?;
        Ok(Self { txn, env })
    }

    fn apply(&mut self, writes: &WriteSet) -> Result<(), LmdbError> {
        for candidate in writes.candidates() {
            let bytes = encode(candidate)?;
            self.env.candidates_db.put(
                &mut self.txn,
                candidate.candidate_name.as_str().as_bytes(),
                &bytes,
            )?;
        }

        for (voter, vote) in writes.votes() {
            let key = voter.as_str().as_bytes();
            match vote {
                Some(vote) => {
                    let bytes = encode(vote)?;
                    self.env.votes_db.put(&mut self.txn, key, &bytes)?;
                }
                None => {
                    self.env.votes_db.delete(&mut self.txn, key)?;
                }
            }
        }

        for (candidate, bio) in writes.bios() {
            self.env
                .bios_db
                .put(&mut self.txn, candidate.as_str().as_bytes(), bio.as_bytes())?;
        }

        if let Some(roster) = writes.staged_auditors() {
            self.env.auditors_db.clear(&mut self.txn)?;
            for auditor in roster {
                self.env
                    .auditors_db
                    .put(&mut self.txn, auditor.as_str().as_bytes(), &[])?;
            }
        }

        if let Some(state) = writes.staged_state() {
            let bytes = encode(state)?;
            self.env
                .meta_db
                .put(&mut self.txn, ELECTION_STATE_KEY, &bytes)?;
        }
        Ok(())
    }

    fn commit(self) -> Result<(), LmdbError> {
        self.txn.commit()?;
        Ok(())
    }
}

impl ElectionStore for LmdbEnvironment {
    fn commit(&self, writes: WriteSet) -> Result<(), StoreError> {
        if writes.is_empty() {
            return Ok(());
        }
        let mut batch = WriteBatch::new(self)?;
        batch.apply(&writes)?;
        batch.commit()?;
        Ok(())
    }
}
