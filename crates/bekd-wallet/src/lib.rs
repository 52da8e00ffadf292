//! Wallet-side engines for the BEKD protocol: biometric simulation,
//! envelope construction, enrollment, retrieval, authentication, and
//! token persistence.

pub mod auth;
pub mod biometric;
pub mod envelope;
pub mod enroll;
pub mod error;
pub mod retrieve;
pub mod spent_set;
pub mod token_storage;
pub mod wallet;

pub use error::WalletError;
pub use wallet::BekdWallet;
