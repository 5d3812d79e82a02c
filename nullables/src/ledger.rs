//! Nullable token ledger — balances held in memory, transfers recorded.

use auditor_host::{LedgerError, TokenLedger, Transfer};
use auditor_types::{AccountName, Asset, Symbol};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// A simulated token ledger.
///
/// Transfer batches are validated against a scratch copy of the balances and
/// only applied when every leg succeeds.
pub struct NullLedger {
    balances: RefCell<HashMap<(AccountName, Symbol), u128>>,
    max_supply: RefCell<HashMap<Symbol, u128>>,
    /// Every transfer that went through, in order.
    history: RefCell<Vec<Transfer>>,
    reject_transfers: Cell<bool>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self {
            balances: RefCell::new(HashMap::new()),
            max_supply: RefCell::new(HashMap::new()),
            history: RefCell::new(Vec::new()),
            reject_transfers: Cell::new(false),
        }
    }

    /// Refuse every following batch, whatever the balances say.
    pub fn reject_transfers(&self, reject: bool) {
        self.reject_transfers.set(reject);
    }

    /// Overwrite an account's balance.
    pub fn set_balance(&self, account: &AccountName, quantity: &Asset) {
        self.balances.borrow_mut().insert(
            (account.clone(), quantity.symbol().clone()),
            quantity.amount(),
        );
    }

    /// Declare the maximum supply of a symbol.
    pub fn set_max_supply(&self, quantity: &Asset) {
        self.max_supply
            .borrow_mut()
            .insert(quantity.symbol().clone(), quantity.amount());
    }

    /// Raw balance lookup (zero when the account was never funded).
    pub fn raw_balance(&self, account: &AccountName, symbol: &Symbol) -> u128 {
        self.balances
            .borrow()
            .get(&(account.clone(), symbol.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Get all executed transfers (for assertions).
    pub fn history(&self) -> Vec<Transfer> {
        self.history.borrow().clone()
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenLedger for NullLedger {
    fn balance(&self, account: &AccountName, symbol: &Symbol) -> Result<Asset, LedgerError> {
        Ok(Asset::new(self.raw_balance(account, symbol), symbol.clone()))
    }

    fn max_supply(&self, symbol: &Symbol) -> Result<Asset, LedgerError> {
        self.max_supply
            .borrow()
            .get(symbol)
            .map(|raw| Asset::new(*raw, symbol.clone()))
            .ok_or_else(|| LedgerError::UnknownSymbol(symbol.to_string()))
    }

    fn transfer_batch(&self, transfers: &[Transfer]) -> Result<(), LedgerError> {
        if self.reject_transfers.get() {
            return Err(LedgerError::Rejected("ledger is refusing transfers".to_string()));
        }
        let mut scratch = self.balances.borrow().clone();
        for t in transfers {
            if t.from == t.to {
                return Err(LedgerError::Rejected(format!("{} cannot transfer to self", t.from)));
            }
            let symbol = t.quantity.symbol().clone();
            let from_key = (t.from.clone(), symbol.clone());
            let available = scratch.get(&from_key).copied().unwrap_or(0);
            let remaining = available.checked_sub(t.quantity.amount()).ok_or_else(|| {
                LedgerError::InsufficientFunds {
                    account: t.from.to_string(),
                    needed: t.quantity.clone(),
                    available: Asset::new(available, symbol.clone()),
                }
            })?;
            scratch.insert(from_key, remaining);
            let to_entry = scratch.entry((t.to.clone(), symbol)).or_insert(0);
            *to_entry = to_entry
                .checked_add(t.quantity.amount())
                .ok_or_else(|| LedgerError::Rejected("balance overflow".to_string()))?;
        }
        *self.balances.borrow_mut() = scratch;
        self.history.borrow_mut().extend_from_slice(transfers);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> AccountName {
        AccountName::new(s).unwrap()
    }

    fn bos(s: &str) -> Asset {
        format!("{s} BOS").parse().unwrap()
    }

    fn transfer(from: &str, to: &str, qty: &str) -> Transfer {
        Transfer {
            from: name(from),
            to: name(to),
            quantity: bos(qty),
            memo: String::new(),
        }
    }

    #[test]
    fn batch_moves_funds() {
        let ledger = NullLedger::new();
        ledger.set_balance(&name("alice"), &bos("10.0000"));
        ledger
            .transfer_batch(&[transfer("alice", "bob", "4.0000")])
            .unwrap();
        let symbol = bos("0.0000").symbol().clone();
        assert_eq!(ledger.raw_balance(&name("alice"), &symbol), 60_000);
        assert_eq!(ledger.raw_balance(&name("bob"), &symbol), 40_000);
        assert_eq!(ledger.history().len(), 1);
    }

    #[test]
    fn failing_leg_rolls_back_whole_batch() {
        let ledger = NullLedger::new();
        ledger.set_balance(&name("alice"), &bos("10.0000"));
        let err = ledger
            .transfer_batch(&[
                transfer("alice", "bob", "4.0000"),
                transfer("alice", "carol", "7.0000"),
            ])
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        let symbol = bos("0.0000").symbol().clone();
        assert_eq!(ledger.raw_balance(&name("alice"), &symbol), 100_000);
        assert_eq!(ledger.raw_balance(&name("bob"), &symbol), 0);
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn unknown_supply_is_an_error() {
        let ledger = NullLedger::new();
        let symbol = bos("0.0000").symbol().clone();
        assert!(matches!(
            ledger.max_supply(&symbol),
            Err(LedgerError::UnknownSymbol(_))
        ));
        ledger.set_max_supply(&bos("1000.0000"));
        assert_eq!(ledger.max_supply(&symbol).unwrap().amount(), 10_000_000);
    }
}
