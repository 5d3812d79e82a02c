//! Token symbols and asset amounts.
//!
//! Amounts are represented as fixed-point integers (u128) to avoid floating-point errors.
//! The smallest unit is 1 raw; a symbol's precision says how many of the raw
//! digits sit after the decimal point (`10_000_000` raw at precision 4 is `1000.0000`).

use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A token symbol: an uppercase code plus decimal precision.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol {
    code: String,
    precision: u8,
}

impl Symbol {
    pub const MAX_CODE_LEN: usize = 7;
    pub const MAX_PRECISION: u8 = 18;

    pub fn new(code: impl Into<String>, precision: u8) -> Result<Self, TypesError> {
        let code = code.into();
        if code.is_empty()
            || code.len() > Self::MAX_CODE_LEN
            || !code.bytes().all(|b| b.is_ascii_uppercase())
        {
            return Err(TypesError::InvalidSymbol(code));
        }
        if precision > Self::MAX_PRECISION {
            return Err(TypesError::InvalidPrecision(precision));
        }
        Ok(Self { code, precision })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision, self.code)
    }
}

/// A quantity of a specific token.
///
/// Serialised in its human form, e.g. `"1000.0000 BOS"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Asset {
    amount: u128,
    symbol: Symbol,
}

impl Asset {
    pub fn new(amount: u128, symbol: Symbol) -> Self {
        Self { amount, symbol }
    }

    pub fn zero(symbol: Symbol) -> Self {
        Self { amount: 0, symbol }
    }

    /// Raw amount in the smallest unit.
    pub fn amount(&self) -> u128 {
        self.amount
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Fails unless `other` is denominated in the same symbol.
    pub fn ensure_same_symbol(&self, other: &Asset) -> Result<(), TypesError> {
        if self.symbol == other.symbol {
            Ok(())
        } else {
            Err(TypesError::SymbolMismatch {
                expected: self.symbol.to_string(),
                actual: other.symbol.to_string(),
            })
        }
    }

    pub fn checked_add(&self, other: &Asset) -> Result<Asset, TypesError> {
        self.ensure_same_symbol(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(TypesError::Overflow)?;
        Ok(Asset::new(amount, self.symbol.clone()))
    }

    pub fn checked_sub(&self, other: &Asset) -> Result<Asset, TypesError> {
        self.ensure_same_symbol(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or(TypesError::Overflow)?;
        Ok(Asset::new(amount, self.symbol.clone()))
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = self.symbol.precision as u32;
        if precision == 0 {
            return write!(f, "{} {}", self.amount, self.symbol.code);
        }
        let scale = 10u128.pow(precision);
        write!(
            f,
            "{}.{:0width$} {}",
            self.amount / scale,
            self.amount % scale,
            self.symbol.code,
            width = precision as usize
        )
    }
}

impl FromStr for Asset {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypesError::InvalidAsset(s.to_string());
        let (quantity, code) = s.trim().split_once(' ').ok_or_else(invalid)?;
        let (whole, fraction) = match quantity.split_once('.') {
            Some((w, f)) => (w, f),
            None => (quantity, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if quantity.contains('.') && fraction.is_empty() {
            return Err(invalid());
        }
        let precision = u8::try_from(fraction.len()).map_err(|_| invalid())?;
        let symbol = Symbol::new(code.trim(), precision)?;
        let digits = format!("{whole}{fraction}");
        let amount = digits.parse::<u128>().map_err(|_| TypesError::Overflow)?;
        Ok(Asset::new(amount, symbol))
    }
}

impl TryFrom<String> for Asset {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Asset> for String {
    fn from(asset: Asset) -> Self {
        asset.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bos() -> Symbol {
        Symbol::new("BOS", 4).unwrap()
    }

    #[test]
    fn parses_and_displays_fixed_point() {
        let asset: Asset = "1000.0000 BOS".parse().unwrap();
        assert_eq!(asset.amount(), 10_000_000);
        assert_eq!(asset.symbol(), &bos());
        assert_eq!(asset.to_string(), "1000.0000 BOS");

        let small = Asset::new(5, bos());
        assert_eq!(small.to_string(), "0.0005 BOS");
    }

    #[test]
    fn parses_zero_precision() {
        let asset: Asset = "42 EOS".parse().unwrap();
        assert_eq!(asset.amount(), 42);
        assert_eq!(asset.symbol().precision(), 0);
        assert_eq!(asset.to_string(), "42 EOS");
    }

    #[test]
    fn rejects_malformed_assets() {
        for s in ["", "1000", "1000.0000", "abc BOS", "1. BOS", "1.0 bos", "1.0 TOOLONGSYM"] {
            assert!(s.parse::<Asset>().is_err(), "{s:?} should be rejected");
        }
    }

    #[test]
    fn arithmetic_requires_matching_symbol() {
        let a = Asset::new(100, bos());
        let b = Asset::new(50, Symbol::new("BOS", 2).unwrap());
        assert!(matches!(
            a.checked_add(&b),
            Err(TypesError::SymbolMismatch { .. })
        ));
        assert_eq!(a.checked_sub(&Asset::new(40, bos())).unwrap().amount(), 60);
        assert!(matches!(
            a.checked_sub(&Asset::new(101, bos())),
            Err(TypesError::Overflow)
        ));
    }
}
