//! # Base58
//!
//! Bytes to text and back over the Bitcoin base58 alphabet: digits and
//! letters minus the visually ambiguous `0`, `O`, `I`, and `l`. We wrap the
//! `bs58` crate rather than reimplementing the radix conversion; the wrapper
//! exists to pin the alphabet in one place and to turn decode failures into
//! this crate's error type with the offending text attached.
//!
//! Leading zero bytes matter: each one maps to a leading `1` character and
//! comes back as a zero byte, so `decode(encode(b)) == b` for every byte
//! sequence, including ones that start with zeros.

use super::codec::CodecError;

/// Encode bytes as base58 text. Total and deterministic; the empty slice
/// encodes to the empty string.
pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

/// Decode base58 text back to bytes.
///
/// Fails with [`CodecError::MalformedText`] if the input contains any
/// character outside the alphabet. The empty string decodes to an empty
/// byte vector.
pub fn decode(text: &str) -> Result<Vec<u8>, CodecError> {
    bs58::decode(text)
        .into_vec()
        .map_err(|e| CodecError::MalformedText {
            text: text.to_string(),
            reason: e.to_string(),
        })
}
