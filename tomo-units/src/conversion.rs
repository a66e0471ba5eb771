//! Decimal string <-> base unit conversion

use primitive_types::U256;

use crate::error::AmountError;

/// Converts a decimal amount such as `"1.5"` into base units, scaling by `10^decimals`.
///
/// Fraction digits beyond `decimals` are only accepted when they are zero. The amount is never
/// rounded.
pub fn to_base_units(amount: &str, decimals: u32) -> Result<U256, AmountError> {
    let amount = amount.trim();
    let (unsigned, offset) = match amount.as_bytes().first() {
        Some(b'-') => return Err(AmountError::Negative),
        Some(b'+') => (&amount[1..], 1),
        _ => (amount, 0),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(AmountError::Empty);
    }
    check_digits(whole, offset)?;
    check_digits(fraction, offset + whole.len() + 1)?;

    let fraction = match usize::try_from(decimals) {
        Ok(places) if fraction.len() > places => {
            let (kept, dropped) = fraction.split_at(places);
            if dropped.bytes().any(|digit| digit != b'0') {
                return Err(AmountError::ExcessPrecision { decimals });
            }
            kept
        }
        _ => fraction,
    };

    let ten = U256::from(10u8);
    let mut value = U256::zero();
    for digit in whole.bytes().chain(fraction.bytes()) {
        value = value
            .checked_mul(ten)
            .and_then(|scaled| scaled.checked_add(U256::from(digit - b'0')))
            .ok_or(AmountError::Overflow)?;
    }
    if value.is_zero() {
        return Ok(value);
    }
    // fraction.len() <= decimals here
    for _ in fraction.len() as u64..u64::from(decimals) {
        value = value.checked_mul(ten).ok_or(AmountError::Overflow)?;
    }

    Ok(value)
}

fn check_digits(digits: &str, offset: usize) -> Result<(), AmountError> {
    match digits.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        Some((position, character)) => Err(AmountError::InvalidCharacter {
            character,
            position: offset + position,
        }),
        None => Ok(()),
    }
}

/// Renders base units as a canonical decimal string: no leading zeros, no trailing fraction
/// zeros and no decimal point for whole amounts.
pub fn from_base_units(amount: U256, decimals: u32) -> String {
    let digits = amount.to_string();
    if decimals == 0 || amount.is_zero() {
        return digits;
    }

    let places = decimals as usize;
    let padded = if digits.len() <= places {
        format!("{}{}", "0".repeat(places + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (whole, fraction) = padded.split_at(padded.len() - places);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}
