//! Simulated trusted-dealer DKG (C4).
//!
//! A real distributed key generation protocol never has a party that
//! learns `sk_CA`; this stands in for one, matching the reference
//! implementation's test harness rather than a production key ceremony.

use bekd_crypto::point::point_mul_base;
use bekd_crypto::scalar::{scalar_random, SecretScalar};
use bekd_crypto::shamir::{random_polynomial, poly_eval};
use k256::ProjectivePoint;

use crate::share::CaShare;

/// Output of the simulated dealer: the consortium public key, the
/// per-node shares, and (test-harness only) the master secret itself —
/// a real deployment discards `master_secret` the instant it is split.
pub struct DkgOutput {
    pub master_secret: SecretScalar,
    pub public_key: ProjectivePoint,
    pub shares: Vec<CaShare>,
}

/// Runs the dealer for `n` nodes with CA threshold `t` (quorum `t + 1`).
pub fn run_simulated_dkg(n: usize, t: usize) -> DkgOutput {
    let secret = scalar_random();
    let coeffs = random_polynomial(&secret, t + 1);
    let shares = (1..=n as u32)
        .map(|i| {
            let index_scalar = bekd_crypto::scalar::scalar_from_bytes_reduced(&index_to_bytes(i));
            CaShare::new(i, poly_eval(&coeffs, &index_scalar))
        })
        .collect();
    DkgOutput {
        master_secret: SecretScalar::new(&secret),
        public_key: point_mul_base(&secret),
        shares,
    }
}

fn index_to_bytes(i: u32) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[28..].copy_from_slice(&i.to_be_bytes());
    out
}
