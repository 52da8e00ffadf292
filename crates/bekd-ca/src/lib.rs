//! The CA consortium: simulated DKG, per-node shares, the threshold
//! helper combiner, and the in-process node facade that serves them.

pub mod combiner;
pub mod dkg;
pub mod error;
pub mod node;
pub mod share;

pub use combiner::{combine_helpers, dedupe_partials, PartialHelper};
pub use dkg::{run_simulated_dkg, DkgOutput};
pub use error::CaError;
pub use node::{CaNode, LocalCaNode};
pub use share::CaShare;
