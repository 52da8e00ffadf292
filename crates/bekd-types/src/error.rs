//! Errors for malformed protocol parameters and wire data.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid protocol parameters: {0}")]
    InvalidParams(&'static str),

    #[error("field length mismatch: expected {expected}, got {got}")]
    BadLength { expected: usize, got: usize },

    #[error(transparent)]
    Crypto(#[from] bekd_crypto::CryptoError),
}
