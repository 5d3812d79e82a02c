//! Auditor roster storage trait.

use crate::StoreError;
use auditor_types::AccountName;

/// Trait for reading the elected roster. The roster is only ever replaced
/// wholesale through a [`crate::WriteSet`].
pub trait AuditorStore {
    /// Current auditors, in ascending name order.
    fn auditors(&self) -> Result<Vec<AccountName>, StoreError>;

    fn is_auditor(&self, name: &AccountName) -> Result<bool, StoreError> {
        self.auditors().map(|roster| roster.contains(name))
    }
}
