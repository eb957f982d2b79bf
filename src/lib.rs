// Copyright (c) 2026 Mira Labs. MIT License.
// See LICENSE for details.

//! # MIRA Crypto: Key & Signature Primitives
//!
//! Every account key, consensus signature, and finality certificate on the
//! MIRA ledger passes through this crate, usually as text: config files,
//! RPC requests, genesis data, peer messages. The crate's job is to make
//! that boundary boring. Text either decodes to an algebraically valid
//! value of a known algorithm family, or it fails with an error that says
//! exactly which check rejected it.
//!
//! ## The text format
//!
//! ```text
//! PUB_BLS_S8cpZc4XpfBF8xV7A2jTcUL8aM3D...    modern, self-describing
//! 5VYMoT2xtTFSeGqCRoBrbQ9rAdHu9PTV...        legacy, Ed25519 only, read-only
//! ```
//!
//! Modern text names its role (`PUB`/`PVT`/`SIG`) and algorithm family
//! (`ED`, `K1`, `R1`, `WA`, `BLS`) up front, carries a checksum bound to
//! the family tag, and is the only form ever written. New families slot in
//! as new tags without disturbing parsers of existing text; a tag we don't
//! recognize is a loud error, never a guess.
//!
//! ## Architecture
//!
//! - **config**: every format constant in one place.
//! - **hash**: the three digests we need (SHA-256, RIPEMD-160, BLAKE3).
//! - **encoding**: base58, checksums, and the codec pipeline. The trust
//!   boundary; cheap checks run before curve arithmetic, always.
//! - **keys**: the validated value types, the family registry, signing
//!   and verification.
//!
//! ## Design Philosophy
//!
//! 1. Invalid values don't exist. Validation happens at construction.
//! 2. Every parse failure is a typed, recoverable error. Nothing here is
//!    allowed to take the process down over a bad string.
//! 3. No shared state, no I/O, no async. Everything is a pure function of
//!    its inputs and safe to call from any thread.
//! 4. Curve math comes from audited crates. We orchestrate; we don't
//!    reimplement.

pub mod config;
pub mod encoding;
pub mod hash;
pub mod keys;

pub use encoding::codec::{CodecError, Role};
pub use keys::{
    batch_verify, sign, verify, KeyFamily, MiraPrivateKey, MiraPublicKey, MiraSignature,
    PayloadShape, UserPresence, WebAuthnPublicKey, WebAuthnSignature,
};
