//! `#[serde(with = "tomo_units::serde_decimal")]` support for [`U256`] as a base-10 string.
//!
//! The default serde representation of [`U256`] is hex, which makes persisted balances hard to
//! read and diff.

use primitive_types::U256;
use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

/// Writes the value as a base-10 string
pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Reads a base-10 string
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
    let digits = String::deserialize(deserializer)?;
    U256::from_dec_str(&digits)
        .map_err(|e| D::Error::custom(format!("invalid base-10 amount {digits:?}: {e:?}")))
}
