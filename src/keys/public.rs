//! # Public Keys
//!
//! The public half of a MIRA identity, across every algorithm family the
//! ledger accepts. A value of [`MiraPublicKey`] is always algebraically
//! valid: on the curve, in the right subgroup, and (for BLS) not the group
//! identity. There is no "unchecked" constructor; text, bytes, and serde
//! all funnel through the same validation.
//!
//! The text form is what operators see and paste:
//!
//! ```text
//! PUB_ED_...   Ed25519 account key
//! PUB_BLS_...  BLS12-381 finality key
//! ```
//!
//! Legacy untagged base58 from the chain's Ed25519-only era still parses;
//! it is re-emitted in the modern form the first time it is printed.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use bls12_381_plus::elliptic_curve::hash2curve::ExpandMsgXmd;
use bls12_381_plus::{pairing, G1Affine, G1Projective, G2Affine, G2Projective};
use ed25519_dalek::VerifyingKey as EdVerifyingKey;
use k256::ecdsa::signature::Verifier;
use k256::ecdsa::VerifyingKey as K1VerifyingKey;
use p256::ecdsa::VerifyingKey as R1VerifyingKey;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::config::{BLS_POP_DST, BLS_SIGNATURE_DST, ECDSA_PUBLIC_KEY_LENGTH};
use crate::encoding::codec::{self, CodecError, Role};
use crate::hash;
use crate::keys::family::KeyFamily;
use crate::keys::signature::MiraSignature;
use crate::keys::webauthn::WebAuthnPublicKey;

/// A validated public key of any registered family.
#[derive(Clone, PartialEq, Eq)]
pub enum MiraPublicKey {
    /// Ed25519 account key.
    Ed25519(EdVerifyingKey),
    /// secp256k1 ECDSA key.
    Secp256k1(K1VerifyingKey),
    /// NIST P-256 ECDSA key.
    NistP256(R1VerifyingKey),
    /// WebAuthn hardware credential.
    WebAuthn(WebAuthnPublicKey),
    /// BLS12-381 G1 finality key.
    Bls12381(G1Affine),
}

impl MiraPublicKey {
    /// The algorithm family this key belongs to.
    pub fn family(&self) -> KeyFamily {
        match self {
            MiraPublicKey::Ed25519(_) => KeyFamily::Ed25519,
            MiraPublicKey::Secp256k1(_) => KeyFamily::Secp256k1,
            MiraPublicKey::NistP256(_) => KeyFamily::NistP256,
            MiraPublicKey::WebAuthn(_) => KeyFamily::WebAuthn,
            MiraPublicKey::Bls12381(_) => KeyFamily::Bls12381,
        }
    }

    /// Canonical payload bytes: the family's one and only byte encoding of
    /// this key (compressed points throughout).
    pub fn to_payload(&self) -> Vec<u8> {
        match self {
            MiraPublicKey::Ed25519(key) => key.to_bytes().to_vec(),
            MiraPublicKey::Secp256k1(key) => key.to_encoded_point(true).as_bytes().to_vec(),
            MiraPublicKey::NistP256(key) => key.to_encoded_point(true).as_bytes().to_vec(),
            MiraPublicKey::WebAuthn(key) => key.to_payload(),
            MiraPublicKey::Bls12381(key) => key.to_compressed().to_vec(),
        }
    }

    /// Validate payload bytes as a public key of the given family.
    ///
    /// This is the family's decode/validate operation: it fails with
    /// [`CodecError::InvalidKeyMaterial`] unless the bytes are the canonical
    /// encoding of a usable key. Notably, the BLS identity element is
    /// rejected here; an identity public key would verify any aggregate it
    /// was folded into.
    pub fn from_payload(family: KeyFamily, payload: &[u8]) -> Result<Self, CodecError> {
        match family {
            KeyFamily::Ed25519 => {
                let bytes: &[u8; 32] = payload
                    .try_into()
                    .map_err(|_| invalid(family, "wrong payload length"))?;
                let key = EdVerifyingKey::from_bytes(bytes)
                    .map_err(|_| invalid(family, "not a valid Edwards point"))?;
                Ok(MiraPublicKey::Ed25519(key))
            }
            KeyFamily::Secp256k1 => {
                if payload.len() != ECDSA_PUBLIC_KEY_LENGTH {
                    return Err(invalid(family, "wrong payload length"));
                }
                let key = K1VerifyingKey::from_sec1_bytes(payload)
                    .map_err(|_| invalid(family, "not a point on the secp256k1 curve"))?;
                Ok(MiraPublicKey::Secp256k1(key))
            }
            KeyFamily::NistP256 => {
                if payload.len() != ECDSA_PUBLIC_KEY_LENGTH {
                    return Err(invalid(family, "wrong payload length"));
                }
                let key = R1VerifyingKey::from_sec1_bytes(payload)
                    .map_err(|_| invalid(family, "not a point on the P-256 curve"))?;
                Ok(MiraPublicKey::NistP256(key))
            }
            KeyFamily::WebAuthn => {
                WebAuthnPublicKey::from_payload(payload).map(MiraPublicKey::WebAuthn)
            }
            KeyFamily::Bls12381 => {
                let bytes: &[u8; 48] = payload
                    .try_into()
                    .map_err(|_| invalid(family, "wrong payload length"))?;
                let point = Option::<G1Affine>::from(G1Affine::from_compressed(bytes))
                    .ok_or_else(|| invalid(family, "not a point in the G1 subgroup"))?;
                if bool::from(point.is_identity()) {
                    return Err(invalid(family, "the group identity is not a usable key"));
                }
                Ok(MiraPublicKey::Bls12381(point))
            }
        }
    }

    /// Render the modern text form, e.g. `PUB_BLS_...`.
    pub fn to_text(&self) -> String {
        codec::encode(Role::Public, self.family(), &self.to_payload())
    }

    /// Parse public-key text in either the modern or the legacy form.
    pub fn from_text(text: &str) -> Result<Self, CodecError> {
        codec::decode(text, Role::Public, Self::from_payload)
    }

    /// Verify `signature` over `message`.
    ///
    /// A signature from a different family than the key is simply invalid;
    /// it gets `false`, not a panic and not an error variant, because
    /// callers at verification sites want exactly one bit of information.
    pub fn verify(&self, message: &[u8], signature: &MiraSignature) -> bool {
        match (self, signature) {
            (MiraPublicKey::Ed25519(key), MiraSignature::Ed25519(sig)) => {
                // Strict verification: reject the cofactored edge cases
                // lenient verifiers wave through.
                key.verify_strict(message, sig).is_ok()
            }
            (MiraPublicKey::Secp256k1(key), MiraSignature::Secp256k1(sig)) => {
                key.verify(message, sig).is_ok()
            }
            (MiraPublicKey::NistP256(key), MiraSignature::NistP256(sig)) => {
                key.verify(message, sig).is_ok()
            }
            (MiraPublicKey::WebAuthn(key), MiraSignature::WebAuthn(sig)) => {
                key.verify(message, sig)
            }
            (MiraPublicKey::Bls12381(key), MiraSignature::Bls12381(sig)) => {
                bls_verify(key, message, sig, BLS_SIGNATURE_DST)
            }
            _ => false,
        }
    }

    /// Verify a BLS proof of possession for this key.
    ///
    /// Finality keys must prove knowledge of their secret before entering
    /// the validator set, or aggregate signatures are forgeable via rogue
    /// public keys. Only meaningful for the BLS family; anything else is
    /// `false`.
    pub fn verify_pop(&self, proof: &MiraSignature) -> bool {
        match (self, proof) {
            (MiraPublicKey::Bls12381(key), MiraSignature::Bls12381(sig)) => {
                bls_verify(key, &key.to_compressed(), sig, BLS_POP_DST)
            }
            _ => false,
        }
    }

    /// Short stable fingerprint for logs and debug output.
    pub fn fingerprint(&self) -> String {
        hash::fingerprint(&self.to_payload())
    }
}

fn invalid(family: KeyFamily, reason: &'static str) -> CodecError {
    CodecError::InvalidKeyMaterial {
        family: family.name(),
        reason,
    }
}

/// Core BLS pairing check, shared by message signatures and possession
/// proofs: e(pk, H(m)) == e(g1, sig).
fn bls_verify(key: &G1Affine, message: &[u8], signature: &G2Affine, dst: &[u8]) -> bool {
    let hm = G2Affine::from(G2Projective::hash::<ExpandMsgXmd<Sha256>>(message, dst));
    pairing(key, &hm) == pairing(&G1Affine::from(G1Projective::GENERATOR), signature)
}

impl fmt::Display for MiraPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for MiraPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MiraPublicKey({})", self.to_text())
    }
}

impl FromStr for MiraPublicKey {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl Hash for MiraPublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Must agree with PartialEq, which compares the decoded values;
        // equal values have equal canonical payloads, so hashing those is
        // consistent across families.
        self.family().index().hash(state);
        self.to_payload().hash(state);
    }
}

impl Serialize for MiraPublicKey {
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

impl<'de> Deserialize<'de> for MiraPublicKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            text.parse().map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            let (&index, payload) = bytes
                .split_first()
                .ok_or_else(|| serde::de::Error::custom("empty public key bytes"))?;
            let family = KeyFamily::from_index(index).ok_or_else(|| {
                serde::de::Error::custom(format!("unknown key family index {index}"))
            })?;
            MiraPublicKey::from_payload(family, payload).map_err(serde::de::Error::custom)
        }
    }
}
