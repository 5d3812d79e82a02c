//! LMDB implementation of AuditorStore.
//!
//! Membership is the key; values are empty.

use auditor_store::{AuditorStore, StoreError};
use auditor_types::AccountName;

use crate::environment::LmdbEnvironment;
use crate::LmdbError;

impl AuditorStore for LmdbEnvironment {
    fn auditors(&self) -> Result<Vec<AccountName>, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let mut roster = Vec::new();
        for entry in self.auditors_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (key, _) = entry.map_err(LmdbError::from)?;
            let name = std::str::from_utf8(key)
                .map_err(|e| LmdbError::Serialization(e.to_string()))?;
            let name = AccountName::new(name)
                .map_err(|e| StoreError::Corruption(format!("auditor key: {e}")))?;
            roster.push(name);
        }
        Ok(roster)
    }

    fn is_auditor(&self, name: &AccountName) -> Result<bool, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let found = self
            .auditors_db
            .get(&rtxn, name.as_str().as_bytes())
            .map_err(LmdbError::from)?;
        Ok(found.is_some())
    }
}
