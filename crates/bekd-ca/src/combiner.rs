//! Threshold helper combiner (C7): turns a quorum of per-node partial
//! helpers into `M = sk_CA · R0` without ever reconstructing `sk_CA`.

use bekd_crypto::point::{point_add, point_identity, point_mul};
use bekd_crypto::shamir::lagrange_coefficient_at_zero;
use k256::ProjectivePoint;

use crate::error::CaError;

/// One node's contribution to a retrieval: `H_i = share_i · R0`.
#[derive(Clone, Copy)]
pub struct PartialHelper {
    pub index: u32,
    pub helper: ProjectivePoint,
}

/// Combines at least `quorum` partial helpers into `M`. Drops nothing
/// itself — callers filter malformed or duplicate-index partials before
/// calling this, per the partial-failure policy in the module docs.
pub fn combine_helpers(partials: &[PartialHelper], quorum: usize) -> Result<ProjectivePoint, CaError> {
    if partials.len() < quorum {
        log::warn!("combine_helpers: quorum not met ({} of {})", partials.len(), quorum);
        return Err(CaError::Quorum { needed: quorum, got: partials.len() });
    }
    let indices: Vec<u32> = partials.iter().map(|p| p.index).collect();
    let mut acc = point_identity();
    for p in partials {
        let lambda = lagrange_coefficient_at_zero(p.index, &indices);
        acc = point_add(&acc, &point_mul(&p.helper, &lambda));
    }
    Ok(acc)
}

/// Filters out duplicate-index or otherwise malformed partials, keeping
/// the first occurrence of each index. This is where the "drop any node
/// that returns a malformed point or wrong index" policy is enforced
/// before the quorum check in [`combine_helpers`].
pub fn dedupe_partials(partials: Vec<PartialHelper>) -> Vec<PartialHelper> {
    let mut seen = std::collections::HashSet::new();
    let before = partials.len();
    let deduped: Vec<PartialHelper> =
        partials.into_iter().filter(|p| p.index >= 1 && seen.insert(p.index)).collect();
    if deduped.len() != before {
        log::debug!("dedupe_partials: dropped {} malformed or duplicate partials", before - deduped.len());
    }
    deduped
}
