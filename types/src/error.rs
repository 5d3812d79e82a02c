//! Errors raised while constructing or validating fundamental types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid account name {0:?}: expected 1-12 chars of a-z, 1-5 and '.'")]
    InvalidAccountName(String),

    #[error("invalid symbol {0:?}: expected 1-7 uppercase letters")]
    InvalidSymbol(String),

    #[error("symbol precision {0} exceeds the maximum of 18")]
    InvalidPrecision(u8),

    #[error("invalid asset {0:?}: expected \"<amount> <SYMBOL>\"")]
    InvalidAsset(String),

    #[error("symbol mismatch: expected {expected}, got {actual}")]
    SymbolMismatch { expected: String, actual: String },

    #[error("arithmetic overflow on asset amount")]
    Overflow,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
