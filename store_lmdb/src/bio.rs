//! LMDB implementation of BioStore. Bios are stored as raw UTF-8.

use auditor_store::{BioStore, StoreError};
use auditor_types::AccountName;

use crate::environment::LmdbEnvironment;
use crate::LmdbError;

impl BioStore for LmdbEnvironment {
    fn get_bio(&self, candidate: &AccountName) -> Result<Option<String>, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let Some(bytes) = self
            .bios_db
            .get(&rtxn, candidate.as_str().as_bytes())
            .map_err(LmdbError::from)?
        else {
            return Ok(None);
        };
        let bio = std::str::from_utf8(bytes)
            .map_err(|e| LmdbError::Serialization(format!("bio of {candidate}: {e}")))?;
        Ok(Some(bio.to_owned()))
    }
}
