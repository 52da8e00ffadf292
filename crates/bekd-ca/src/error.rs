//! CA-side error taxonomy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaError {
    #[error("fewer than {needed} valid CA partials (got {got})")]
    Quorum { needed: usize, got: usize },

    #[error("token already redeemed at this CA node")]
    Replay,

    #[error(transparent)]
    Crypto(#[from] bekd_crypto::CryptoError),

    #[error(transparent)]
    Types(#[from] bekd_types::TypesError),
}
