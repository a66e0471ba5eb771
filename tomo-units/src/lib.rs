#![forbid(unsafe_code)]
#![warn(missing_docs)]
//! Exact conversions between human readable decimal amounts and integer base units.
//!
//! No binary floating point is involved anywhere: decimal strings are parsed digit by digit
//! into a [`U256`] and rendered back with plain string manipulation.

pub mod conversion;
pub mod error;
pub mod serde_decimal;

pub use conversion::{from_base_units, to_base_units};
pub use error::AmountError;
pub use primitive_types::U256;

/// Decimal places of the privacy asset
pub const PRIVACY_DECIMALS: u32 = 9;
