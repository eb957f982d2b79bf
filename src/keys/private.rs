//! # Private Keys
//!
//! The signing half. Everything here handles bytes that can spend money
//! and vote on finality, so the rules are strict:
//!
//! - Private keys are never logged. `Debug` prints a fingerprint of the
//!   *public* key, nothing else. If you add logging to this module, you
//!   will be asked to leave.
//! - Rendering a private key as text (`to_text`, serde) is for wallet
//!   files and operator tooling. It is deliberately explicit; there is no
//!   `Display` impl, so a private key can't wander into a format string.
//!
//! WebAuthn has no case in this enum on purpose: those secrets live inside
//! an authenticator and there is nothing to hold.

use std::fmt;
use std::str::FromStr;

use bls12_381_plus::elliptic_curve::hash2curve::ExpandMsgXmd;
use bls12_381_plus::{G1Affine, G1Projective, G2Affine, G2Projective, Scalar};
use ed25519_dalek::{Signer, SigningKey as EdSigningKey};
use k256::ecdsa::SigningKey as K1SigningKey;
use p256::ecdsa::SigningKey as R1SigningKey;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::config::{BLS_POP_DST, BLS_SIGNATURE_DST, ECDSA_PRIVATE_KEY_LENGTH};
use crate::encoding::codec::{self, CodecError, Role};
use crate::keys::family::KeyFamily;
use crate::keys::public::MiraPublicKey;
use crate::keys::signature::MiraSignature;

/// A validated private key of any signing-capable family.
#[derive(Clone)]
pub enum MiraPrivateKey {
    /// Ed25519 seed.
    Ed25519(EdSigningKey),
    /// secp256k1 scalar.
    Secp256k1(K1SigningKey),
    /// NIST P-256 scalar.
    NistP256(R1SigningKey),
    /// BLS12-381 scalar.
    Bls12381(Scalar),
}

impl MiraPrivateKey {
    /// Generate a fresh key of the given family from the OS RNG.
    ///
    /// Returns `None` for [`KeyFamily::WebAuthn`]: those keys are minted
    /// inside an authenticator, not by this library.
    pub fn generate(family: KeyFamily) -> Option<MiraPrivateKey> {
        match family {
            KeyFamily::Ed25519 => Some(MiraPrivateKey::Ed25519(EdSigningKey::generate(
                &mut OsRng,
            ))),
            KeyFamily::Secp256k1 => {
                Some(MiraPrivateKey::Secp256k1(K1SigningKey::random(&mut OsRng)))
            }
            KeyFamily::NistP256 => Some(MiraPrivateKey::NistP256(R1SigningKey::random(&mut OsRng))),
            KeyFamily::WebAuthn => None,
            KeyFamily::Bls12381 => {
                // Rejection-sample a uniform scalar below the group order.
                // Each draw lands in range with probability ~0.45, so the
                // loop is short; zero is excluded like any other invalid
                // draw.
                loop {
                    let mut bytes = [0u8; 32];
                    OsRng.fill_bytes(&mut bytes);
                    if bytes == [0u8; 32] {
                        continue;
                    }
                    if let Some(scalar) = Option::<Scalar>::from(Scalar::from_be_bytes(&bytes)) {
                        return Some(MiraPrivateKey::Bls12381(scalar));
                    }
                }
            }
        }
    }

    /// The algorithm family this key belongs to.
    pub fn family(&self) -> KeyFamily {
        match self {
            MiraPrivateKey::Ed25519(_) => KeyFamily::Ed25519,
            MiraPrivateKey::Secp256k1(_) => KeyFamily::Secp256k1,
            MiraPrivateKey::NistP256(_) => KeyFamily::NistP256,
            MiraPrivateKey::Bls12381(_) => KeyFamily::Bls12381,
        }
    }

    /// Canonical payload bytes. Handle with the care the module docs ask for.
    pub fn to_payload(&self) -> Vec<u8> {
        match self {
            MiraPrivateKey::Ed25519(key) => key.to_bytes().to_vec(),
            MiraPrivateKey::Secp256k1(key) => key.to_bytes().to_vec(),
            MiraPrivateKey::NistP256(key) => key.to_bytes().to_vec(),
            MiraPrivateKey::Bls12381(scalar) => scalar.to_be_bytes().to_vec(),
        }
    }

    /// Validate payload bytes as a private key of the given family.
    pub fn from_payload(family: KeyFamily, payload: &[u8]) -> Result<Self, CodecError> {
        match family {
            KeyFamily::Ed25519 => {
                let bytes: &[u8; 32] = payload
                    .try_into()
                    .map_err(|_| invalid(family, "wrong payload length"))?;
                Ok(MiraPrivateKey::Ed25519(EdSigningKey::from_bytes(bytes)))
            }
            KeyFamily::Secp256k1 => {
                if payload.len() != ECDSA_PRIVATE_KEY_LENGTH {
                    return Err(invalid(family, "wrong payload length"));
                }
                let key = K1SigningKey::from_slice(payload)
                    .map_err(|_| invalid(family, "scalar is zero or not below the curve order"))?;
                Ok(MiraPrivateKey::Secp256k1(key))
            }
            KeyFamily::NistP256 => {
                if payload.len() != ECDSA_PRIVATE_KEY_LENGTH {
                    return Err(invalid(family, "wrong payload length"));
                }
                let key = R1SigningKey::from_slice(payload)
                    .map_err(|_| invalid(family, "scalar is zero or not below the curve order"))?;
                Ok(MiraPrivateKey::NistP256(key))
            }
            KeyFamily::WebAuthn => Err(invalid(
                family,
                "WebAuthn private keys never leave the authenticator",
            )),
            KeyFamily::Bls12381 => {
                let bytes: &[u8; 32] = payload
                    .try_into()
                    .map_err(|_| invalid(family, "wrong payload length"))?;
                if bytes == &[0u8; 32] {
                    return Err(invalid(family, "the zero scalar is not a usable key"));
                }
                let scalar = Option::<Scalar>::from(Scalar::from_be_bytes(bytes))
                    .ok_or_else(|| invalid(family, "scalar not below the group order"))?;
                Ok(MiraPrivateKey::Bls12381(scalar))
            }
        }
    }

    /// Derive the matching public key.
    pub fn public_key(&self) -> MiraPublicKey {
        match self {
            MiraPrivateKey::Ed25519(key) => MiraPublicKey::Ed25519(key.verifying_key()),
            MiraPrivateKey::Secp256k1(key) => {
                MiraPublicKey::Secp256k1(key.verifying_key().to_owned())
            }
            MiraPrivateKey::NistP256(key) => MiraPublicKey::NistP256(key.verifying_key().to_owned()),
            MiraPrivateKey::Bls12381(scalar) => {
                MiraPublicKey::Bls12381(G1Affine::from(G1Projective::GENERATOR * scalar))
            }
        }
    }

    /// Sign a message.
    ///
    /// Ed25519 and the ECDSA families are deterministic (RFC 8032 and
    /// RFC 6979 respectively), as is BLS; signing the same message twice
    /// gives identical bytes, and no RNG failure at signing time can leak
    /// the key.
    pub fn sign(&self, message: &[u8]) -> MiraSignature {
        match self {
            MiraPrivateKey::Ed25519(key) => MiraSignature::Ed25519(key.sign(message)),
            MiraPrivateKey::Secp256k1(key) => {
                let signature: k256::ecdsa::Signature = key.sign(message);
                MiraSignature::Secp256k1(signature)
            }
            MiraPrivateKey::NistP256(key) => {
                let signature: p256::ecdsa::Signature = key.sign(message);
                MiraSignature::NistP256(signature)
            }
            MiraPrivateKey::Bls12381(scalar) => {
                let hm = G2Projective::hash::<ExpandMsgXmd<Sha256>>(message, BLS_SIGNATURE_DST);
                MiraSignature::Bls12381(G2Affine::from(hm * scalar))
            }
        }
    }

    /// Produce a BLS proof of possession: a signature over this key's own
    /// compressed public bytes under the possession-proof domain tag.
    /// `None` for every other family; only aggregating schemes need one.
    pub fn sign_pop(&self) -> Option<MiraSignature> {
        match self {
            MiraPrivateKey::Bls12381(scalar) => {
                let public = G1Affine::from(G1Projective::GENERATOR * scalar);
                let hm =
                    G2Projective::hash::<ExpandMsgXmd<Sha256>>(&public.to_compressed(), BLS_POP_DST);
                Some(MiraSignature::Bls12381(G2Affine::from(hm * scalar)))
            }
            _ => None,
        }
    }

    /// Render the modern text form, e.g. `PVT_K1_...`. Wallet files only.
    pub fn to_text(&self) -> String {
        codec::encode(Role::Private, self.family(), &self.to_payload())
    }

    /// Parse private-key text in either the modern or the legacy form.
    pub fn from_text(text: &str) -> Result<Self, CodecError> {
        codec::decode(text, Role::Private, Self::from_payload)
    }
}

fn invalid(family: KeyFamily, reason: &'static str) -> CodecError {
    CodecError::InvalidKeyMaterial {
        family: family.name(),
        reason,
    }
}

impl FromStr for MiraPrivateKey {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl fmt::Debug for MiraPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material, not even "partially". A partial leak is
        // still a leak, and grepping logs for base58 is trivial.
        write!(
            f,
            "MiraPrivateKey({}, fingerprint={})",
            self.family(),
            self.public_key().fingerprint()
        )
    }
}

impl PartialEq for MiraPrivateKey {
    /// Equality by derived public key: avoids comparing secret bytes in
    /// non-constant time, and for identity purposes the public key is what
    /// matters anyway.
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for MiraPrivateKey {}

impl Serialize for MiraPrivateKey {
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

impl<'de> Deserialize<'de> for MiraPrivateKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            text.parse().map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            let (&index, payload) = bytes
                .split_first()
                .ok_or_else(|| serde::de::Error::custom("empty private key bytes"))?;
            let family = KeyFamily::from_index(index).ok_or_else(|| {
                serde::de::Error::custom(format!("unknown key family index {index}"))
            })?;
            MiraPrivateKey::from_payload(family, payload).map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{base58, checksum};

    const SIGNING_FAMILIES: [KeyFamily; 4] = [
        KeyFamily::Ed25519,
        KeyFamily::Secp256k1,
        KeyFamily::NistP256,
        KeyFamily::Bls12381,
    ];

    #[test]
    fn generate_covers_every_signing_family() {
        for family in SIGNING_FAMILIES {
            let key = MiraPrivateKey::generate(family).unwrap();
            assert_eq!(key.family(), family);
            assert_eq!(key.public_key().family(), family);
        }
        assert!(MiraPrivateKey::generate(KeyFamily::WebAuthn).is_none());
    }

    #[test]
    fn text_roundtrip_every_signing_family() {
        for family in SIGNING_FAMILIES {
            let key = MiraPrivateKey::generate(family).unwrap();
            let text = key.to_text();
            assert!(
                text.starts_with(&format!("PVT_{}_", family.tag())),
                "text was: {}",
                text
            );
            let parsed = MiraPrivateKey::from_text(&text).unwrap();
            assert_eq!(parsed, key);
            // Same secret, not just same public half.
            assert_eq!(parsed.to_payload(), key.to_payload());
        }
    }

    #[test]
    fn legacy_private_text_decodes() {
        let key = MiraPrivateKey::generate(KeyFamily::Ed25519).unwrap();
        let payload = key.to_payload();
        let mut data = payload.clone();
        data.extend_from_slice(&checksum::untagged(&payload));
        let legacy = base58::encode(&data);
        let parsed = MiraPrivateKey::from_text(&legacy).unwrap();
        assert_eq!(parsed.to_payload(), payload);
    }

    #[test]
    fn public_key_derivation_is_deterministic() {
        for family in SIGNING_FAMILIES {
            let key = MiraPrivateKey::generate(family).unwrap();
            assert_eq!(key.public_key(), key.public_key());
        }
    }

    #[test]
    fn bls_zero_scalar_rejected() {
        let err = MiraPrivateKey::from_payload(KeyFamily::Bls12381, &[0u8; 32]).unwrap_err();
        assert!(matches!(err, CodecError::InvalidKeyMaterial { .. }));
    }

    #[test]
    fn bls_oversized_scalar_rejected() {
        // All ones is far above the BLS12-381 group order.
        let err = MiraPrivateKey::from_payload(KeyFamily::Bls12381, &[0xFF; 32]).unwrap_err();
        assert!(matches!(err, CodecError::InvalidKeyMaterial { .. }));
    }

    #[test]
    fn ecdsa_zero_scalar_rejected() {
        for family in [KeyFamily::Secp256k1, KeyFamily::NistP256] {
            let err = MiraPrivateKey::from_payload(family, &[0u8; 32]).unwrap_err();
            assert!(matches!(err, CodecError::InvalidKeyMaterial { .. }));
        }
    }

    #[test]
    fn webauthn_payload_always_rejected() {
        let err = MiraPrivateKey::from_payload(KeyFamily::WebAuthn, &[1u8; 32]).unwrap_err();
        assert!(matches!(err, CodecError::InvalidKeyMaterial { .. }));
    }

    #[test]
    fn debug_does_not_leak_key_material() {
        let key = MiraPrivateKey::generate(KeyFamily::Secp256k1).unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.starts_with("MiraPrivateKey(secp256k1"), "was: {}", debug);
        // Neither the text form nor the hex of the payload may appear.
        assert!(!debug.contains(&key.to_text()));
        assert!(!debug.contains(&hex::encode(key.to_payload())));
    }

    #[test]
    fn serde_json_roundtrip() {
        for family in SIGNING_FAMILIES {
            let key = MiraPrivateKey::generate(family).unwrap();
            let json = serde_json::to_string(&key).unwrap();
            let parsed: MiraPrivateKey = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed.to_payload(), key.to_payload());
        }
    }

    #[test]
    fn serde_binary_roundtrip() {
        for family in SIGNING_FAMILIES {
            let key = MiraPrivateKey::generate(family).unwrap();
            let bytes = bincode::serialize(&key).unwrap();
            let parsed: MiraPrivateKey = bincode::deserialize(&bytes).unwrap();
            assert_eq!(parsed.to_payload(), key.to_payload());
        }
    }
}
