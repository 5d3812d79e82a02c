//! Candidate bio storage trait.

use crate::StoreError;
use auditor_types::AccountName;

/// Trait for reading candidate bios. Bios are opaque text.
pub trait BioStore {
    fn get_bio(&self, candidate: &AccountName) -> Result<Option<String>, StoreError>;
}
