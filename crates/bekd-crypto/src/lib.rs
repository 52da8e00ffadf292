//! secp256k1 field/curve primitives, domain-separated hashes, Shamir secret
//! sharing and ECDSA for the BEKD protocol.
//!
//! This crate is deliberately free of protocol-level knowledge: it provides
//! the algebra the higher-level `bekd-ca` and `bekd-wallet` crates compose
//! into enrollment, retrieval and authentication.

pub mod ecdsa;
pub mod error;
pub mod hash;
pub mod point;
pub mod scalar;
pub mod shamir;

pub use error::CryptoError;
pub use k256::{ecdsa::VerifyingKey, Scalar};
