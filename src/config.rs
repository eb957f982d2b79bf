//! # Encoding Constants
//!
//! Every fixed fact about the MIRA key text format lives here. If you're
//! hardcoding a prefix string or a payload length somewhere else, you're
//! doing it wrong and you owe the team coffee.
//!
//! These values are load-bearing: they define the on-disk and on-the-wire
//! shape of every key, signature, and finality certificate the ledger has
//! ever issued. Changing them after launch invalidates deployed key text,
//! so choose wisely during devnet.

// ---------------------------------------------------------------------------
// Text Format
// ---------------------------------------------------------------------------

/// Role prefix for public keys. `PUB_K1_...`, `PUB_BLS_...`, and so on.
pub const PUBLIC_KEY_PREFIX: &str = "PUB";

/// Role prefix for private keys. Text that starts with this belongs in a
/// wallet file, not a log line.
pub const PRIVATE_KEY_PREFIX: &str = "PVT";

/// Role prefix for signatures.
pub const SIGNATURE_PREFIX: &str = "SIG";

/// Segment delimiter in the modern text form. Chosen because it is not in
/// the base58 alphabet, so the data segment can never contain it.
pub const PREFIX_DELIMITER: char = '_';

/// Length in bytes of the transcription checksum appended to every payload
/// before base58 encoding. Four bytes gives a 1-in-4-billion chance of an
/// undetected typo, which is plenty for a corruption detector. It is not,
/// and does not need to be, forgery protection.
pub const CHECKSUM_LENGTH: usize = 4;

// ---------------------------------------------------------------------------
// Payload Lengths (fixed-size families)
// ---------------------------------------------------------------------------

/// Ed25519 public key: a compressed Edwards point.
pub const ED_PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 private key: the 32-byte seed.
pub const ED_PRIVATE_KEY_LENGTH: usize = 32;

/// Ed25519 signature: R (32) followed by s (32).
pub const ED_SIGNATURE_LENGTH: usize = 64;

/// SEC1 compressed point for the short Weierstrass families (secp256k1 and
/// NIST P-256): a parity byte followed by the x coordinate.
pub const ECDSA_PUBLIC_KEY_LENGTH: usize = 33;

/// ECDSA private key: a big-endian scalar.
pub const ECDSA_PRIVATE_KEY_LENGTH: usize = 32;

/// ECDSA signature: r followed by s, both 32 bytes, no recovery byte.
pub const ECDSA_SIGNATURE_LENGTH: usize = 64;

/// BLS12-381 public key: a compressed G1 element (the MinPk convention,
/// which keeps the keys small and pushes the size into signatures).
pub const BLS_PUBLIC_KEY_LENGTH: usize = 48;

/// BLS12-381 private key: a big-endian scalar, strictly below the group
/// order and never zero.
pub const BLS_PRIVATE_KEY_LENGTH: usize = 32;

/// BLS12-381 signature: a compressed G2 element.
pub const BLS_SIGNATURE_LENGTH: usize = 96;

// ---------------------------------------------------------------------------
// Payload Bounds (variable-size families)
// ---------------------------------------------------------------------------

/// Maximum length of a WebAuthn relying-party identifier. 253 octets is the
/// DNS name ceiling, and an rp_id is a DNS name.
pub const MAX_RP_ID_LENGTH: usize = 253;

/// Minimum length of WebAuthn authenticator data: a 32-byte rp_id hash,
/// one flags byte, and a 4-byte signature counter.
pub const MIN_AUTH_DATA_LENGTH: usize = 37;

/// Upper bound on WebAuthn authenticator data we are willing to decode.
/// Authenticators that attach more than a kilobyte of extensions can take
/// their business elsewhere; this bound is what lets the decoder reject
/// oversized text before allocating for it.
pub const MAX_AUTH_DATA_LENGTH: usize = 1024;

// ---------------------------------------------------------------------------
// BLS Ciphersuite
// ---------------------------------------------------------------------------

/// Domain separation tag for BLS signatures: the standard MinPk
/// proof-of-possession ciphersuite over SHA-256.
pub const BLS_SIGNATURE_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// Domain separation tag for BLS proofs of possession. Distinct from the
/// signing tag so a proof of possession can never be replayed as a message
/// signature, or vice versa.
pub const BLS_POP_DST: &[u8] = b"BLS_POP_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";
