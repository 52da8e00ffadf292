//! Wallet error types: the §7 taxonomy plus the ambient storage/config
//! errors around it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("signature does not verify under the CA public key")]
    BadSignature,

    #[error("token id already redeemed")]
    Replay,

    #[error("fewer than {needed} valid CA partials (got {got})")]
    Quorum { needed: usize, got: usize },

    #[error("fewer than {needed} matching biometric tags (got {got})")]
    InsufficientMatches { needed: usize, got: usize },

    #[error("interpolated key failed the recovery check")]
    RecoveryCheck,

    #[error("malformed protocol input: {0}")]
    Protocol(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Crypto(#[from] bekd_crypto::CryptoError),

    #[error(transparent)]
    Types(#[from] bekd_types::TypesError),

    #[error(transparent)]
    Ca(#[from] bekd_ca::CaError),
}
