//! CA node facade (§6): each node guards its own replay set and answers
//! `/retrieve`-shaped helper requests. `LocalCaNode` is the in-process
//! reference implementation; a real deployment would put an HTTP
//! transport in front of the same logic, which is why the request is
//! modeled as a plain function call rather than this trait owning any
//! networking.

use std::collections::HashSet;
use std::sync::Mutex;

use bekd_crypto::point::point_mul;
use k256::ProjectivePoint;

use crate::combiner::PartialHelper;
use crate::error::CaError;
use crate::share::CaShare;

/// A CA node the wallet can request a retrieval helper from.
pub trait CaNode: Send + Sync {
    fn index(&self) -> u32;

    /// Computes `H_i = share_i · R0` for token id `rho`, after checking
    /// (and updating) this node's own replay guard.
    fn helper(&self, rho: [u8; 32], r0: &ProjectivePoint) -> Result<PartialHelper, CaError>;
}

/// In-process CA node: holds one share of the consortium key directly,
/// with its `local_used` set protected by a mutex per the concurrency
/// model (exclusive check-then-insert).
pub struct LocalCaNode {
    share: CaShare,
    local_used: Mutex<HashSet<[u8; 32]>>,
}

impl LocalCaNode {
    pub fn new(share: CaShare) -> Self {
        Self { share, local_used: Mutex::new(HashSet::new()) }
    }

    /// Exposes this node's raw share value, for export/backup tooling.
    pub fn share_value(&self) -> k256::Scalar {
        self.share.value()
    }
}

impl CaNode for LocalCaNode {
    fn index(&self) -> u32 {
        self.share.index
    }

    fn helper(&self, rho: [u8; 32], r0: &ProjectivePoint) -> Result<PartialHelper, CaError> {
        let mut used = self.local_used.lock().expect("local_used mutex poisoned");
        if !used.insert(rho) {
            log::warn!("node {}: rejecting replayed helper request", self.share.index);
            return Err(CaError::Replay);
        }
        log::debug!("node {}: issuing helper for token {}", self.share.index, hex::encode(rho));
        Ok(PartialHelper { index: self.share.index, helper: point_mul(r0, &self.share.value()) })
    }
}
