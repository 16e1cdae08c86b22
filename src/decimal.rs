//! Fixed-precision decimal arithmetic for prices and amounts.
//!
//! Wraps [`rust_decimal::Decimal`] rather than re-implementing fixed-point
//! math: `Decimal` already gives exact base-10 arithmetic, a 96-bit mantissa,
//! and `Display`/`FromStr` that round-trip without drift. This module adds
//! only the domain-specific bits the engine needs at its boundary: a parse
//! error that doesn't leak `rust_decimal`'s own error type, zero-normalizing
//! formatting, and checked volume/fee helpers that turn overflow into `None`
//! instead of a panic.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecimalError {
    #[error("invalid decimal string: {0:?}")]
    InvalidDecimal(String),
    #[error("decimal value out of supported range: {0:?}")]
    OutOfRange(String),
}

/// Parses a decimal string at the system boundary.
pub fn parse(s: &str) -> Result<Decimal, DecimalError> {
    Decimal::from_str(s).map_err(|_| DecimalError::InvalidDecimal(s.to_string()))
}

/// Formats a decimal for the boundary: strips trailing fractional zeros,
/// normalizes `-0` to `"0"`.
pub fn format(d: Decimal) -> String {
    let normalized = d.normalize();
    if normalized.is_zero() {
        "0".to_string()
    } else {
        normalized.to_string()
    }
}

/// `price * amount`, returning `None` on overflow rather than panicking.
pub fn volume(price: Decimal, amount: Decimal) -> Option<Decimal> {
    price.checked_mul(amount)
}

/// `volume * rate`, returning `None` on overflow rather than panicking.
pub fn fee(volume: Decimal, rate: Decimal) -> Option<Decimal> {
    volume.checked_mul(rate)
}
