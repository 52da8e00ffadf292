//! A single CA node's share of the consortium's master key.

use bekd_crypto::scalar::SecretScalar;
use k256::Scalar;

/// `(index, share)` where `share = P(index)` for the DKG polynomial `P`
/// with `P(0) = sk_CA`. The index is 1-based and never reused across nodes.
#[derive(Clone)]
pub struct CaShare {
    pub index: u32,
    share: SecretScalar,
}

impl CaShare {
    pub fn new(index: u32, share: Scalar) -> Self {
        Self { index, share: SecretScalar::new(&share) }
    }

    pub fn value(&self) -> Scalar {
        self.share.expose()
    }
}

impl std::fmt::Debug for CaShare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaShare").field("index", &self.index).finish_non_exhaustive()
    }
}
