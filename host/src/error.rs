use auditor_types::Asset;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient funds on {account}: need {needed}, have {available}")]
    InsufficientFunds {
        account: String,
        needed: Asset,
        available: Asset,
    },

    #[error("unknown token symbol {0}")]
    UnknownSymbol(String),

    #[error("transfer rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthorityError {
    #[error("authorization policy rejected: {0}")]
    Rejected(String),

    #[error("authority service unavailable: {0}")]
    Unavailable(String),
}
