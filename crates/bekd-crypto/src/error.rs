//! Crypto-primitive error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("scalar is not canonical (>= curve order)")]
    InvalidScalar,

    #[error("point is not on the secp256k1 curve")]
    InvalidPoint,

    #[error("expected {expected} bytes, got {got}")]
    BadLength { expected: usize, got: usize },

    #[error("signature does not verify")]
    BadSignature,

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("public key recovery failed: {0}")]
    RecoveryFailed(String),
}
