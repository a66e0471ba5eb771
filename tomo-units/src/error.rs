//! Error sub-module for amount conversions.

use thiserror::Error;

/// Reasons a decimal amount could not be turned into base units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Nothing but whitespace, a sign or a lone decimal point was given
    #[error("amount is empty")]
    Empty,
    /// Amounts are never negative
    #[error("amount must not be negative")]
    Negative,
    /// Something other than a digit or a single decimal point
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter {
        /// the offending character
        character: char,
        /// byte offset into the trimmed input
        position: usize,
    },
    /// Significant digits past the precision of the asset
    #[error("amount has more than {decimals} significant decimal places")]
    ExcessPrecision {
        /// decimal places supported by the asset
        decimals: u32,
    },
    /// Transfers of nothing are refused
    #[error("amount must be greater than zero")]
    Zero,
    /// Does not fit into 256 bits once scaled
    #[error("amount does not fit into 256 bits")]
    Overflow,
}
