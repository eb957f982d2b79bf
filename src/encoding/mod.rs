//! # Text Encoding
//!
//! The base58 text format for keys and signatures: alphabet handling,
//! transcription checksums, and the codec that ties them to the algorithm
//! registry. This is the trust boundary of the whole crate. Config files,
//! RPC requests, genesis data, and peer messages all enter through
//! [`codec`], and nothing cryptographic runs until the cheap structural
//! checks in there have passed.

pub mod base58;
pub mod checksum;
pub mod codec;

pub use codec::{CodecError, Role};
