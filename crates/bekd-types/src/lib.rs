//! Wire types, protocol parameters, and the spent-set contract shared by
//! `bekd-ca` and `bekd-wallet`.

pub mod error;
pub mod params;
pub mod spent_set;
pub mod token;

pub use error::TypesError;
pub use params::ProtocolParams;
pub use spent_set::SpentSet;
pub use token::{Token, TokenCa, TokenUser};
