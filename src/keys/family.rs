//! # Algorithm Family Registry
//!
//! The closed set of key algorithm families the ledger understands, and the
//! fixed facts the codec needs about each one. Everything here is data;
//! the codec never matches on a specific family, it only asks the registry.
//! Adding a family means adding an enum case and its facts below, plus
//! validate arms on the three value types. The text format itself does not
//! change.
//!
//! | family  | tag | public | private | signature |
//! |---------|-----|--------|---------|-----------|
//! | Ed25519 | ED  | 32     | 32      | 64        |
//! | secp256k1 | K1 | 33    | 32      | 64        |
//! | P-256   | R1  | 33     | 32      | 64        |
//! | WebAuthn | WA | 35..287 | none   | 101..1088 |
//! | BLS12-381 | BLS | 48   | 32      | 96        |
//!
//! Tags are published constants: once a tag has shipped in anyone's config
//! file it is never reused for a different family, even if the family is
//! retired. WebAuthn credentials live inside an authenticator, so the `WA`
//! tag exists only in the public-key and signature registries; there is no
//! such thing as `PVT_WA_` text.

use std::fmt;

use crate::config::{
    BLS_PRIVATE_KEY_LENGTH, BLS_PUBLIC_KEY_LENGTH, BLS_SIGNATURE_LENGTH, ECDSA_PRIVATE_KEY_LENGTH,
    ECDSA_PUBLIC_KEY_LENGTH, ECDSA_SIGNATURE_LENGTH, ED_PRIVATE_KEY_LENGTH, ED_PUBLIC_KEY_LENGTH,
    ED_SIGNATURE_LENGTH, MAX_AUTH_DATA_LENGTH, MAX_RP_ID_LENGTH, MIN_AUTH_DATA_LENGTH,
};
use crate::encoding::codec::Role;

/// One key algorithm family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyFamily {
    /// Ed25519, the ledger's original scheme and the only family legacy
    /// untagged text can contain.
    Ed25519,
    /// ECDSA over secp256k1, for keys migrated from other chains.
    Secp256k1,
    /// ECDSA over NIST P-256, for keys held in HSMs and secure enclaves,
    /// which overwhelmingly speak P-256.
    NistP256,
    /// WebAuthn hardware credentials (P-256 under the hood, wrapped in
    /// authenticator metadata with variable-length payloads).
    WebAuthn,
    /// BLS12-381 with G1 public keys, used for finality certificates
    /// because its signatures aggregate.
    Bls12381,
}

/// Declared payload size for one family and role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadShape {
    /// Every payload is exactly this many bytes.
    Fixed(usize),
    /// Payloads are self-describing within hard bounds. The upper bound is
    /// what lets the decoder reject oversized text before allocating.
    Variable {
        /// Smallest structurally possible payload.
        min: usize,
        /// Largest payload the decoder will touch.
        max: usize,
    },
}

impl PayloadShape {
    /// Smallest admissible payload length.
    pub const fn min(self) -> usize {
        match self {
            PayloadShape::Fixed(len) => len,
            PayloadShape::Variable { min, .. } => min,
        }
    }

    /// Largest admissible payload length.
    pub const fn max(self) -> usize {
        match self {
            PayloadShape::Fixed(len) => len,
            PayloadShape::Variable { max, .. } => max,
        }
    }
}

impl KeyFamily {
    /// Every registered family, in tag order.
    pub const ALL: [KeyFamily; 5] = [
        KeyFamily::Ed25519,
        KeyFamily::Secp256k1,
        KeyFamily::NistP256,
        KeyFamily::WebAuthn,
        KeyFamily::Bls12381,
    ];

    /// The single family legacy untagged text decodes against.
    pub const LEGACY: KeyFamily = KeyFamily::Ed25519;

    /// The stable ASCII tag that appears in modern text.
    pub const fn tag(self) -> &'static str {
        match self {
            KeyFamily::Ed25519 => "ED",
            KeyFamily::Secp256k1 => "K1",
            KeyFamily::NistP256 => "R1",
            KeyFamily::WebAuthn => "WA",
            KeyFamily::Bls12381 => "BLS",
        }
    }

    /// Human name for error messages and logs.
    pub const fn name(self) -> &'static str {
        match self {
            KeyFamily::Ed25519 => "Ed25519",
            KeyFamily::Secp256k1 => "secp256k1",
            KeyFamily::NistP256 => "P-256",
            KeyFamily::WebAuthn => "WebAuthn",
            KeyFamily::Bls12381 => "BLS12-381",
        }
    }

    /// Look a family up by its text tag. `None` means the tag belongs to a
    /// family this build does not know, which callers must treat as a hard
    /// error and never as "probably fine".
    pub fn from_tag(tag: &str) -> Option<KeyFamily> {
        KeyFamily::ALL.into_iter().find(|f| f.tag() == tag)
    }

    /// The single-byte discriminant used in binary serialization.
    pub const fn index(self) -> u8 {
        match self {
            KeyFamily::Ed25519 => 0,
            KeyFamily::Secp256k1 => 1,
            KeyFamily::NistP256 => 2,
            KeyFamily::WebAuthn => 3,
            KeyFamily::Bls12381 => 4,
        }
    }

    /// Reverse of [`index`](Self::index).
    pub fn from_index(index: u8) -> Option<KeyFamily> {
        KeyFamily::ALL.into_iter().find(|f| f.index() == index)
    }

    /// The payload shape for this family in the given role, or `None` when
    /// the family has no encoding for that role at all.
    pub const fn payload_shape(self, role: Role) -> Option<PayloadShape> {
        match (self, role) {
            (KeyFamily::Ed25519, Role::Public) => Some(PayloadShape::Fixed(ED_PUBLIC_KEY_LENGTH)),
            (KeyFamily::Ed25519, Role::Private) => Some(PayloadShape::Fixed(ED_PRIVATE_KEY_LENGTH)),
            (KeyFamily::Ed25519, Role::Signature) => Some(PayloadShape::Fixed(ED_SIGNATURE_LENGTH)),

            (KeyFamily::Secp256k1 | KeyFamily::NistP256, Role::Public) => {
                Some(PayloadShape::Fixed(ECDSA_PUBLIC_KEY_LENGTH))
            }
            (KeyFamily::Secp256k1 | KeyFamily::NistP256, Role::Private) => {
                Some(PayloadShape::Fixed(ECDSA_PRIVATE_KEY_LENGTH))
            }
            (KeyFamily::Secp256k1 | KeyFamily::NistP256, Role::Signature) => {
                Some(PayloadShape::Fixed(ECDSA_SIGNATURE_LENGTH))
            }

            // Point, presence byte, then one to MAX_RP_ID_LENGTH bytes of
            // relying-party identifier.
            (KeyFamily::WebAuthn, Role::Public) => Some(PayloadShape::Variable {
                min: ECDSA_PUBLIC_KEY_LENGTH + 2,
                max: ECDSA_PUBLIC_KEY_LENGTH + 1 + MAX_RP_ID_LENGTH,
            }),
            (KeyFamily::WebAuthn, Role::Private) => None,
            // Raw ECDSA signature followed by bounded authenticator data.
            (KeyFamily::WebAuthn, Role::Signature) => Some(PayloadShape::Variable {
                min: ECDSA_SIGNATURE_LENGTH + MIN_AUTH_DATA_LENGTH,
                max: ECDSA_SIGNATURE_LENGTH + MAX_AUTH_DATA_LENGTH,
            }),

            (KeyFamily::Bls12381, Role::Public) => Some(PayloadShape::Fixed(BLS_PUBLIC_KEY_LENGTH)),
            (KeyFamily::Bls12381, Role::Private) => {
                Some(PayloadShape::Fixed(BLS_PRIVATE_KEY_LENGTH))
            }
            (KeyFamily::Bls12381, Role::Signature) => {
                Some(PayloadShape::Fixed(BLS_SIGNATURE_LENGTH))
            }
        }
    }

    /// Whether this family has a textual encoding for the given role.
    pub const fn supports(self, role: Role) -> bool {
        self.payload_shape(role).is_some()
    }
}

impl fmt::Display for KeyFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
