//! # WebAuthn Credentials
//!
//! Hardware-authenticator credentials as a key family. The private key
//! never leaves the authenticator; what the ledger sees is a P-256 public
//! key wrapped in credential metadata, and assertions consisting of a P-256
//! signature plus the authenticator data it covers.
//!
//! Payloads in this family are variable length, which makes it the reason
//! the registry distinguishes fixed from bounded-variable shapes:
//!
//! ```text
//! public key: sec1_point(33) ‖ presence(1) ‖ rp_id(1..=253)
//! signature:  ecdsa_sig(64) ‖ auth_data(37..=1024)
//! ```

use p256::ecdsa::signature::Verifier;
use p256::ecdsa::{Signature as P256Signature, VerifyingKey as P256VerifyingKey};

use crate::config::{
    ECDSA_PUBLIC_KEY_LENGTH, ECDSA_SIGNATURE_LENGTH, MAX_AUTH_DATA_LENGTH, MAX_RP_ID_LENGTH,
    MIN_AUTH_DATA_LENGTH,
};
use crate::encoding::codec::CodecError;
use crate::hash::sha256;
use crate::keys::family::KeyFamily;

const FAMILY: &str = KeyFamily::WebAuthn.name();

/// How much user interaction the authenticator attested to when the
/// credential was registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UserPresence {
    /// No presence check.
    None,
    /// A human touched the authenticator.
    Present,
    /// A human touched it and passed user verification (PIN, biometric).
    Verified,
}

impl UserPresence {
    pub(crate) const fn to_byte(self) -> u8 {
        match self {
            UserPresence::None => 0,
            UserPresence::Present => 1,
            UserPresence::Verified => 2,
        }
    }

    pub(crate) const fn from_byte(byte: u8) -> Option<UserPresence> {
        match byte {
            0 => Some(UserPresence::None),
            1 => Some(UserPresence::Present),
            2 => Some(UserPresence::Verified),
            _ => None,
        }
    }
}

/// A registered WebAuthn credential: the attested P-256 key, the presence
/// level, and the relying-party identifier it is scoped to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebAuthnPublicKey {
    key: P256VerifyingKey,
    presence: UserPresence,
    rp_id: String,
}

impl WebAuthnPublicKey {
    /// Build a credential from its parts, enforcing the rp_id bounds.
    pub fn new(
        key: P256VerifyingKey,
        presence: UserPresence,
        rp_id: impl Into<String>,
    ) -> Result<Self, CodecError> {
        let rp_id = rp_id.into();
        if rp_id.is_empty() {
            return Err(CodecError::InvalidKeyMaterial {
                family: FAMILY,
                reason: "rp_id must not be empty",
            });
        }
        if rp_id.len() > MAX_RP_ID_LENGTH {
            return Err(CodecError::InvalidKeyMaterial {
                family: FAMILY,
                reason: "rp_id exceeds the DNS name length ceiling",
            });
        }
        Ok(Self {
            key,
            presence,
            rp_id,
        })
    }

    /// Parse and validate the credential payload.
    pub(crate) fn from_payload(payload: &[u8]) -> Result<Self, CodecError> {
        if payload.len() < ECDSA_PUBLIC_KEY_LENGTH + 2 {
            return Err(CodecError::InvalidKeyMaterial {
                family: FAMILY,
                reason: "credential payload too short",
            });
        }
        let (point, rest) = payload.split_at(ECDSA_PUBLIC_KEY_LENGTH);
        let key =
            P256VerifyingKey::from_sec1_bytes(point).map_err(|_| CodecError::InvalidKeyMaterial {
                family: FAMILY,
                reason: "credential point is not on the P-256 curve",
            })?;
        let presence =
            UserPresence::from_byte(rest[0]).ok_or(CodecError::InvalidKeyMaterial {
                family: FAMILY,
                reason: "unknown user-presence marker",
            })?;
        let rp_id = std::str::from_utf8(&rest[1..]).map_err(|_| CodecError::InvalidKeyMaterial {
            family: FAMILY,
            reason: "rp_id is not valid UTF-8",
        })?;
        Self::new(key, presence, rp_id)
    }

    /// Canonical payload bytes.
    pub(crate) fn to_payload(&self) -> Vec<u8> {
        let point = self.key.to_encoded_point(true);
        let mut payload = Vec::with_capacity(point.as_bytes().len() + 1 + self.rp_id.len());
        payload.extend_from_slice(point.as_bytes());
        payload.push(self.presence.to_byte());
        payload.extend_from_slice(self.rp_id.as_bytes());
        payload
    }

    /// The attested P-256 verifying key.
    pub fn key(&self) -> &P256VerifyingKey {
        &self.key
    }

    /// Presence level attested at registration.
    pub fn presence(&self) -> UserPresence {
        self.presence
    }

    /// The relying-party identifier this credential is scoped to.
    pub fn rp_id(&self) -> &str {
        &self.rp_id
    }

    /// Verify an assertion over `message`.
    ///
    /// Checks that the authenticator data is anchored to this credential's
    /// rp_id (its first 32 bytes are the rp_id hash) and that the signature
    /// covers `auth_data ‖ SHA-256(message)`, which is the byte string an
    /// authenticator actually signs. Returns a plain boolean; callers never
    /// need to know which of the two checks failed, and attackers
    /// definitely don't.
    pub fn verify(&self, message: &[u8], signature: &WebAuthnSignature) -> bool {
        if signature.auth_data[..32] != sha256(self.rp_id.as_bytes()) {
            return false;
        }
        let mut signed = Vec::with_capacity(signature.auth_data.len() + 32);
        signed.extend_from_slice(&signature.auth_data);
        signed.extend_from_slice(&sha256(message));
        self.key.verify(&signed, &signature.signature).is_ok()
    }
}

/// A WebAuthn assertion: the raw ECDSA signature and the authenticator
/// data it covers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebAuthnSignature {
    signature: P256Signature,
    auth_data: Vec<u8>,
}

impl WebAuthnSignature {
    /// Build an assertion from its parts, enforcing the authenticator data
    /// bounds.
    pub fn new(signature: P256Signature, auth_data: Vec<u8>) -> Result<Self, CodecError> {
        if auth_data.len() < MIN_AUTH_DATA_LENGTH {
            return Err(CodecError::InvalidKeyMaterial {
                family: FAMILY,
                reason: "authenticator data shorter than the mandatory header",
            });
        }
        if auth_data.len() > MAX_AUTH_DATA_LENGTH {
            return Err(CodecError::InvalidKeyMaterial {
                family: FAMILY,
                reason: "authenticator data exceeds the decoder bound",
            });
        }
        Ok(Self {
            signature,
            auth_data,
        })
    }

    /// Parse and validate the assertion payload.
    pub(crate) fn from_payload(payload: &[u8]) -> Result<Self, CodecError> {
        if payload.len() < ECDSA_SIGNATURE_LENGTH + MIN_AUTH_DATA_LENGTH {
            return Err(CodecError::InvalidKeyMaterial {
                family: FAMILY,
                reason: "assertion payload too short",
            });
        }
        let (sig, auth_data) = payload.split_at(ECDSA_SIGNATURE_LENGTH);
        let signature =
            P256Signature::from_slice(sig).map_err(|_| CodecError::InvalidKeyMaterial {
                family: FAMILY,
                reason: "assertion signature scalars out of range",
            })?;
        Self::new(signature, auth_data.to_vec())
    }

    /// Canonical payload bytes.
    pub(crate) fn to_payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(ECDSA_SIGNATURE_LENGTH + self.auth_data.len());
        payload.extend_from_slice(&self.signature.to_bytes());
        payload.extend_from_slice(&self.auth_data);
        payload
    }

    /// The authenticator data covered by the signature.
    pub fn auth_data(&self) -> &[u8] {
        &self.auth_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use p256::ecdsa::signature::Signer;
    use p256::ecdsa::SigningKey as P256SigningKey;
    use rand::rngs::OsRng;

    /// Minimal plausible authenticator data: rp_id hash, flags, counter.
    fn auth_data_for(rp_id: &str) -> Vec<u8> {
        let mut data = sha256(rp_id.as_bytes()).to_vec();
        data.push(0x05); // UP | UV
        data.extend_from_slice(&7u32.to_be_bytes());
        data
    }

    fn test_credential() -> (P256SigningKey, WebAuthnPublicKey) {
        let sk = P256SigningKey::random(&mut OsRng);
        let pk = WebAuthnPublicKey::new(
            *sk.verifying_key(),
            UserPresence::Verified,
            "wallet.example.org",
        )
        .unwrap();
        (sk, pk)
    }

    fn assert_over(sk: &P256SigningKey, rp_id: &str, message: &[u8]) -> WebAuthnSignature {
        let auth_data = auth_data_for(rp_id);
        let mut signed = auth_data.clone();
        signed.extend_from_slice(&sha256(message));
        let signature: P256Signature = sk.sign(&signed);
        WebAuthnSignature::new(signature, auth_data).unwrap()
    }

    #[test]
    fn assertion_verifies() {
        let (sk, pk) = test_credential();
        let assertion = assert_over(&sk, "wallet.example.org", b"approve tx 42");
        assert!(pk.verify(b"approve tx 42", &assertion));
    }

    #[test]
    fn wrong_message_fails() {
        let (sk, pk) = test_credential();
        let assertion = assert_over(&sk, "wallet.example.org", b"approve tx 42");
        assert!(!pk.verify(b"approve tx 43", &assertion));
    }

    #[test]
    fn wrong_rp_id_fails() {
        // An assertion minted for another relying party must not verify,
        // even under the same underlying key.
        let (sk, pk) = test_credential();
        let assertion = assert_over(&sk, "evil.example.org", b"approve tx 42");
        assert!(!pk.verify(b"approve tx 42", &assertion));
    }

    #[test]
    fn credential_payload_roundtrip() {
        let (_, pk) = test_credential();
        let payload = pk.to_payload();
        let parsed = WebAuthnPublicKey::from_payload(&payload).unwrap();
        assert_eq!(parsed, pk);
    }

    #[test]
    fn assertion_payload_roundtrip() {
        let (sk, _) = test_credential();
        let assertion = assert_over(&sk, "wallet.example.org", b"msg");
        let parsed = WebAuthnSignature::from_payload(&assertion.to_payload()).unwrap();
        assert_eq!(parsed, assertion);
    }

    #[test]
    fn bad_presence_byte_rejected() {
        let (_, pk) = test_credential();
        let mut payload = pk.to_payload();
        payload[ECDSA_PUBLIC_KEY_LENGTH] = 9;
        assert!(matches!(
            WebAuthnPublicKey::from_payload(&payload),
            Err(CodecError::InvalidKeyMaterial { .. })
        ));
    }

    #[test]
    fn invalid_utf8_rp_id_rejected() {
        let (_, pk) = test_credential();
        let mut payload = pk.to_payload();
        let last = payload.len() - 1;
        payload[last] = 0xFF;
        assert!(matches!(
            WebAuthnPublicKey::from_payload(&payload),
            Err(CodecError::InvalidKeyMaterial { .. })
        ));
    }

    #[test]
    fn empty_rp_id_rejected() {
        let sk = P256SigningKey::random(&mut OsRng);
        assert!(WebAuthnPublicKey::new(*sk.verifying_key(), UserPresence::Present, "").is_err());
    }

    #[test]
    fn oversized_auth_data_rejected() {
        let (sk, _) = test_credential();
        let assertion = assert_over(&sk, "wallet.example.org", b"msg");
        let mut payload = assertion.to_payload();
        payload.extend_from_slice(&vec![0u8; MAX_AUTH_DATA_LENGTH]);
        assert!(matches!(
            WebAuthnSignature::from_payload(&payload),
            Err(CodecError::InvalidKeyMaterial { .. })
        ));
    }

    #[test]
    fn off_curve_credential_point_rejected() {
        let (_, pk) = test_credential();
        let mut payload = pk.to_payload();
        // An x coordinate of all-ones with an 0x02 parity byte is not a
        // valid P-256 point encoding.
        payload[..ECDSA_PUBLIC_KEY_LENGTH].copy_from_slice(&[0xFF; ECDSA_PUBLIC_KEY_LENGTH]);
        payload[0] = 0x02;
        assert!(matches!(
            WebAuthnPublicKey::from_payload(&payload),
            Err(CodecError::InvalidKeyMaterial { .. })
        ));
    }
}
