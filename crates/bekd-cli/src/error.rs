//! CLI-local error type: wraps the protocol error taxonomy plus the
//! filesystem and encoding failures that only arise at this boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("io error: {0}")]
    Io(std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("hex decode error: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("malformed input: {0}")]
    Malformed(String),

    #[error(transparent)]
    Crypto(#[from] bekd_crypto::CryptoError),

    #[error(transparent)]
    Types(#[from] bekd_types::TypesError),

    #[error(transparent)]
    Wallet(#[from] bekd_wallet::WalletError),
}
