//! # Keys and Signatures
//!
//! The value types of the crate: public keys, private keys, and signatures
//! across every algorithm family the ledger accepts, plus the registry
//! that describes the families themselves.
//!
//! A value of any of these types is valid by construction. Text, serde,
//! and raw payload bytes all pass through the same family validation
//! before a value exists, so downstream code never has to ask "but is
//! this actually a point".

pub mod family;
pub mod private;
pub mod public;
pub mod signature;
pub mod webauthn;

// Re-export the things people actually need so they don't have to memorize
// our module hierarchy.
pub use family::{KeyFamily, PayloadShape};
pub use private::MiraPrivateKey;
pub use public::MiraPublicKey;
pub use signature::{batch_verify, sign, verify, MiraSignature};
pub use webauthn::{UserPresence, WebAuthnPublicKey, WebAuthnSignature};
