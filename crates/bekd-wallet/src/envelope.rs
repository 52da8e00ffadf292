//! Envelope builder (C5).

use bekd_crypto::hash::token_id;
use bekd_crypto::point::{point_add, point_mul, point_mul_base};
use k256::{ProjectivePoint, Scalar};

/// `(R0, R1, M, rho)` with `R0 = r·G`, `M = r·pk_CA`, `R1 = M + k·G`,
/// `rho = keccak256(ser(R0))`. `M = sk_CA · R0` always holds, which is
/// what lets the retrieval quorum reproduce `M` without ever touching
/// `sk_CA` directly.
pub struct Envelope {
    pub r0: ProjectivePoint,
    pub r1: ProjectivePoint,
    pub m: ProjectivePoint,
    pub rho: [u8; 32],
}

pub fn build_envelope(pk_ca: &ProjectivePoint, k: &Scalar, r: &Scalar) -> Envelope {
    let r0 = point_mul_base(r);
    let m = point_mul(pk_ca, r);
    let r1 = point_add(&m, &point_mul_base(k));
    let rho = token_id(&r0);
    Envelope { r0, r1, m, rho }
}
