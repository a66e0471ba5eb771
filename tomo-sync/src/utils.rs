//! Payload decoding helpers

use thiserror::Error;

#[allow(missing_docs)] // error types document themselves
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PayloadError {
    #[error("payload byte {position} ({byte:?}) is not a 0x-prefixed hex byte")]
    InvalidByte { position: usize, byte: String },
    #[error("{0}")]
    Decode(#[from] hex::FromHexError),
}

/// Decodes a payload given as a sequence of `0x`-prefixed hex bytes, e.g. `["0x1f", "0xa"]`.
///
/// Single digit bytes are left padded.
pub fn decode_payload(payload_hex: &[String]) -> Result<Vec<u8>, PayloadError> {
    let mut digits = String::with_capacity(payload_hex.len() * 2);
    for (position, byte) in payload_hex.iter().enumerate() {
        let trimmed = byte.trim();
        let stripped = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        match stripped.len() {
            1 => digits.push('0'),
            2 => {}
            _ => {
                return Err(PayloadError::InvalidByte {
                    position,
                    byte: byte.clone(),
                })
            }
        }
        digits.push_str(stripped);
    }

    Ok(hex::decode(digits)?)
}

/// Renders bytes in the format accepted by [`decode_payload`]
pub fn encode_payload(payload: &[u8]) -> Vec<String> {
    payload.iter().map(|byte| format!("0x{byte:02x}")).collect()
}
