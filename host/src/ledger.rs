//! Token ledger collaborator.

use crate::LedgerError;
use auditor_types::{AccountName, Asset, Symbol};
use serde::{Deserialize, Serialize};

/// A token movement, either observed (inbound credit) or requested (payout).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: AccountName,
    pub to: AccountName,
    pub quantity: Asset,
    #[serde(default)]
    pub memo: String,
}

/// The external token ledger.
pub trait TokenLedger {
    /// Liquid balance of `account` in `symbol`.
    fn balance(&self, account: &AccountName, symbol: &Symbol) -> Result<Asset, LedgerError>;

    /// Maximum supply of `symbol`. Denominator of the vote quorum.
    fn max_supply(&self, symbol: &Symbol) -> Result<Asset, LedgerError>;

    /// Execute every transfer, or none of them.
    fn transfer_batch(&self, transfers: &[Transfer]) -> Result<(), LedgerError>;
}
