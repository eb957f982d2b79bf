//! # Signatures
//!
//! Signature values across every family, plus the free-function helpers
//! that most call sites actually use. The text form (`SIG_..._...`) goes
//! through the same codec as keys: checksummed, tagged, and validated
//! before a value exists.
//!
//! Validation depth at decode time is a per-family decision. ECDSA scalars
//! are range-checked and BLS points subgroup-checked on the way in, because
//! a malformed value there can poison batch operations. Ed25519 accepts
//! any 64 bytes as a signature value; the curve checks happen inside
//! strict verification, where they belong.

use std::fmt;
use std::str::FromStr;

use bls12_381_plus::G2Affine;
use ed25519_dalek::Signature as EdSignature;
use k256::ecdsa::Signature as K1Signature;
use p256::ecdsa::Signature as R1Signature;
use serde::{Deserialize, Serialize};

use crate::config::ECDSA_SIGNATURE_LENGTH;
use crate::encoding::codec::{self, CodecError, Role};
use crate::keys::family::KeyFamily;
use crate::keys::private::MiraPrivateKey;
use crate::keys::public::MiraPublicKey;
use crate::keys::webauthn::WebAuthnSignature;

/// A structurally valid signature of any registered family.
#[derive(Clone, PartialEq, Eq)]
pub enum MiraSignature {
    /// Ed25519 signature.
    Ed25519(EdSignature),
    /// secp256k1 ECDSA signature.
    Secp256k1(K1Signature),
    /// NIST P-256 ECDSA signature.
    NistP256(R1Signature),
    /// WebAuthn assertion.
    WebAuthn(WebAuthnSignature),
    /// BLS12-381 G2 signature.
    Bls12381(G2Affine),
}

impl MiraSignature {
    /// The algorithm family this signature belongs to.
    pub fn family(&self) -> KeyFamily {
        match self {
            MiraSignature::Ed25519(_) => KeyFamily::Ed25519,
            MiraSignature::Secp256k1(_) => KeyFamily::Secp256k1,
            MiraSignature::NistP256(_) => KeyFamily::NistP256,
            MiraSignature::WebAuthn(_) => KeyFamily::WebAuthn,
            MiraSignature::Bls12381(_) => KeyFamily::Bls12381,
        }
    }

    /// Canonical payload bytes.
    pub fn to_payload(&self) -> Vec<u8> {
        match self {
            MiraSignature::Ed25519(sig) => sig.to_bytes().to_vec(),
            MiraSignature::Secp256k1(sig) => sig.to_bytes().to_vec(),
            MiraSignature::NistP256(sig) => sig.to_bytes().to_vec(),
            MiraSignature::WebAuthn(sig) => sig.to_payload(),
            MiraSignature::Bls12381(sig) => sig.to_compressed().to_vec(),
        }
    }

    /// Validate payload bytes as a signature of the given family.
    pub fn from_payload(family: KeyFamily, payload: &[u8]) -> Result<Self, CodecError> {
        match family {
            KeyFamily::Ed25519 => {
                let bytes: &[u8; 64] = payload
                    .try_into()
                    .map_err(|_| invalid(family, "wrong payload length"))?;
                Ok(MiraSignature::Ed25519(EdSignature::from_bytes(bytes)))
            }
            KeyFamily::Secp256k1 => {
                if payload.len() != ECDSA_SIGNATURE_LENGTH {
                    return Err(invalid(family, "wrong payload length"));
                }
                let sig = K1Signature::from_slice(payload)
                    .map_err(|_| invalid(family, "signature scalars out of range"))?;
                Ok(MiraSignature::Secp256k1(sig))
            }
            KeyFamily::NistP256 => {
                if payload.len() != ECDSA_SIGNATURE_LENGTH {
                    return Err(invalid(family, "wrong payload length"));
                }
                let sig = R1Signature::from_slice(payload)
                    .map_err(|_| invalid(family, "signature scalars out of range"))?;
                Ok(MiraSignature::NistP256(sig))
            }
            KeyFamily::WebAuthn => {
                WebAuthnSignature::from_payload(payload).map(MiraSignature::WebAuthn)
            }
            KeyFamily::Bls12381 => {
                let bytes: &[u8; 96] = payload
                    .try_into()
                    .map_err(|_| invalid(family, "wrong payload length"))?;
                let point = Option::<G2Affine>::from(G2Affine::from_compressed(bytes))
                    .ok_or_else(|| invalid(family, "not a point in the G2 subgroup"))?;
                if bool::from(point.is_identity()) {
                    return Err(invalid(family, "the group identity is not a signature"));
                }
                Ok(MiraSignature::Bls12381(point))
            }
        }
    }

    /// Render the modern text form, e.g. `SIG_BLS_...`.
    pub fn to_text(&self) -> String {
        codec::encode(Role::Signature, self.family(), &self.to_payload())
    }

    /// Parse signature text in either the modern or the legacy form.
    pub fn from_text(text: &str) -> Result<Self, CodecError> {
        codec::decode(text, Role::Signature, Self::from_payload)
    }
}

fn invalid(family: KeyFamily, reason: &'static str) -> CodecError {
    CodecError::InvalidKeyMaterial {
        family: family.name(),
        reason,
    }
}

impl fmt::Display for MiraSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for MiraSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MiraSignature({})", self.to_text())
    }
}

impl FromStr for MiraSignature {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl Serialize for MiraSignature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_text())
        } else {
            let payload = self.to_payload();
            let mut bytes = Vec::with_capacity(1 + payload.len());
            bytes.push(self.family().index());
            bytes.extend_from_slice(&payload);
            serializer.serialize_bytes(&bytes)
        }
    }
}

impl<'de> Deserialize<'de> for MiraSignature {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            text.parse().map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            let (&index, payload) = bytes
                .split_first()
                .ok_or_else(|| serde::de::Error::custom("empty signature bytes"))?;
            let family = KeyFamily::from_index(index).ok_or_else(|| {
                serde::de::Error::custom(format!("unknown key family index {index}"))
            })?;
            MiraSignature::from_payload(family, payload).map_err(serde::de::Error::custom)
        }
    }
}

// ---------------------------------------------------------------------------
// Free helpers
// ---------------------------------------------------------------------------

/// Sign a message. Equivalent to [`MiraPrivateKey::sign`]; exists so call
/// sites read as `sign(&key, msg)` next to `verify(&pk, msg, &sig)`.
pub fn sign(key: &MiraPrivateKey, message: &[u8]) -> MiraSignature {
    key.sign(message)
}

/// Verify a signature against a public key and message. `true` means valid;
/// everything else, including a family mismatch, is just `false`. We don't
/// hand attackers an oracle describing which check failed.
pub fn verify(key: &MiraPublicKey, message: &[u8], signature: &MiraSignature) -> bool {
    key.verify(message, signature)
}

/// Verify a batch of (key, message, signature) triples. All must pass; we
/// don't say which one failed. If you need to know, verify individually.
pub fn batch_verify(items: &[(MiraPublicKey, Vec<u8>, MiraSignature)]) -> bool {
    items.iter().all(|(key, message, sig)| key.verify(message, sig))
}
