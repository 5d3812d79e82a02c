//! LMDB implementation of StateStore, plus the schema version marker.

use auditor_store::{ElectionState, StateStore, StoreError};

use crate::environment::{decode, LmdbEnvironment};
use crate::LmdbError;

pub(crate) const ELECTION_STATE_KEY: &[u8] = b"election_state";
const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

/// Bumped whenever a stored record layout changes.
pub const SCHEMA_VERSION: u32 = 1;

impl LmdbEnvironment {
    /// Stamp a fresh environment with [`SCHEMA_VERSION`], or refuse one
    /// written by an incompatible version.
    pub(crate) fn ensure_schema(&self) -> Result<(), LmdbError> {
        match self.schema_version()? {
            0 => {
                let mut wtxn = self.env().write_txn()?;
                self.meta_db
                    .put(&mut wtxn, SCHEMA_VERSION_KEY, &SCHEMA_VERSION.to_le_bytes())?;
                wtxn.commit()?;
                Ok(())
            }
            SCHEMA_VERSION => Ok(()),
            other => Err(LmdbError::Serialization(format!(
                "schema version {other} is not supported (expected {SCHEMA_VERSION})"
            ))),
        }
    }

    /// Stored schema version, or 0 for an unstamped environment.
    pub fn schema_version(&self) -> Result<u32, LmdbError> {
        let rtxn = self.env().read_txn()?;
        match self.meta_db.get(&rtxn, SCHEMA_VERSION_KEY)? {
            Some(bytes) => {
                let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                    LmdbError::Serialization(
                        "schema_version has unexpected byte length".to_string(),
                    )
                })?;
                Ok(u32::from_le_bytes(arr))
            }
            None => Ok(0),
        }
    }
}

impl StateStore for LmdbEnvironment {
    fn election_state(&self) -> Result<ElectionState, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        match self
            .meta_db
            .get(&rtxn, ELECTION_STATE_KEY)
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(decode(bytes)?),
            None => Ok(ElectionState::default()),
        }
    }
}
