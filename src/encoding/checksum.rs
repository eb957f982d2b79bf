//! # Transcription Checksums
//!
//! The 4-byte digest appended to every payload before base58 encoding.
//! It catches typos, truncation, and copy-paste damage before any curve
//! arithmetic sees the bytes. It is not an authenticator; anyone can
//! recompute it.
//!
//! Modern (tagged) text binds the algorithm tag into the digest, so a
//! payload checksummed as `K1` can never be relabeled `R1` and still pass.
//! Legacy untagged text predates tag binding and digests the payload alone.

use crate::config::CHECKSUM_LENGTH;
use crate::hash::ripemd160;

/// Checksum for the modern text form: `RIPEMD-160(payload ‖ tag)` truncated.
pub fn tagged(payload: &[u8], tag: &str) -> [u8; CHECKSUM_LENGTH] {
    let mut input = Vec::with_capacity(payload.len() + tag.len());
    input.extend_from_slice(payload);
    input.extend_from_slice(tag.as_bytes());
    truncate(ripemd160(&input))
}

/// Checksum for the legacy untagged text form: `RIPEMD-160(payload)` truncated.
pub fn untagged(payload: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    truncate(ripemd160(payload))
}

fn truncate(digest: [u8; 20]) -> [u8; CHECKSUM_LENGTH] {
    let mut out = [0u8; CHECKSUM_LENGTH];
    out.copy_from_slice(&digest[..CHECKSUM_LENGTH]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(tagged(b"payload", "K1"), tagged(b"payload", "K1"));
        assert_eq!(untagged(b"payload"), untagged(b"payload"));
    }

    #[test]
    fn tag_binding_changes_the_digest() {
        // The whole point: the same bytes under a different family tag must
        // not checksum identically, or relabeling attacks get a free pass.
        assert_ne!(tagged(b"payload", "K1"), tagged(b"payload", "R1"));
        assert_ne!(tagged(b"payload", "K1"), untagged(b"payload"));
    }

    #[test]
    fn payload_sensitivity() {
        assert_ne!(tagged(b"payload", "K1"), tagged(b"payloae", "K1"));
    }
}
