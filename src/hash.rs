//! # Hashing Utilities
//!
//! The three hash functions this crate needs, and no more:
//!
//! - **SHA-256** for WebAuthn client-data digests and as the expander inside
//!   BLS hash-to-curve. Chosen by the standards we interoperate with, not
//!   by us.
//! - **RIPEMD-160** for the text-format checksum. A 4-byte truncation of it
//!   detects transcription errors; it carries no security weight.
//! - **BLAKE3** for key fingerprints, because it's the fastest thing with a
//!   real security margin and fingerprints get computed on every debug log.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input and return a fixed-size array.
///
/// # Example
///
/// ```
/// use mira_crypto::hash::sha256;
///
/// let digest = sha256(b"mira ledger");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Compute the RIPEMD-160 hash of the input.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    let mut output = [0u8; 20];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Short hex fingerprint of arbitrary bytes: the first 8 bytes of the
/// BLAKE3 digest.
///
/// This is what shows up in `Debug` output and log lines instead of key
/// material. Collisions are possible at 64 bits but irrelevant; this is an
/// identifier for humans reading logs, not a commitment.
pub fn fingerprint(data: &[u8]) -> String {
    hex::encode(&blake3::hash(data).as_bytes()[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        // FIPS 180-2 test vector for "abc".
        let digest = sha256(b"abc");
        assert_eq!(
            hex::encode(digest),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn ripemd160_known_vector() {
        // From the original RIPEMD-160 paper's appendix.
        let digest = ripemd160(b"abc");
        assert_eq!(
            hex::encode(digest),
            "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"
        );
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        let fp1 = fingerprint(b"some key bytes");
        let fp2 = fingerprint(b"some key bytes");
        assert_eq!(fp1, fp2);
        assert_eq!(fp1.len(), 16); // 8 bytes, hex encoded
        assert_ne!(fp1, fingerprint(b"other key bytes"));
    }
}
