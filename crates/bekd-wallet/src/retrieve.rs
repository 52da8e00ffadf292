//! Retrieval engine (C8).

use bekd_ca::{combine_helpers, dedupe_partials, CaNode, PartialHelper};
use bekd_crypto::ecdsa::{verify_prehash, RecoverableSignature};
use bekd_crypto::hash::{h0, h1, h2, htag};
use bekd_crypto::point::{point_eq, point_mul, point_mul_base, point_sub};
use bekd_crypto::scalar::scalar_sub;
use bekd_crypto::shamir::interpolate_zero;
use bekd_types::{ProtocolParams, SpentSet, Token};
use k256::ecdsa::VerifyingKey;
use k256::{ProjectivePoint, Scalar};

use crate::error::WalletError;

/// Runs the nine-step retrieval protocol. `local_used` is this wallet
/// instance's own anti-double-decapsulation guard (distinct from the
/// protocol-level `SpentSet` consumed at authentication time).
pub fn retrieve(
    token: &Token,
    biometric_guess: &[f64],
    pk_ca: &ProjectivePoint,
    ca_nodes: &[&dyn CaNode],
    local_used: &dyn SpentSet,
    params: &ProtocolParams,
) -> Result<Scalar, WalletError> {
    let r0 = token.tca.r0_point()?;
    let r1 = token.tca.r1_point()?;
    let h_a = token.tca.h_a_scalar();

    // 1. Verify the CA's signature over m = H2(R0, R1, hA).
    let m_digest = h2(&r0, &r1, &h_a);
    let m_digest_bytes = bekd_crypto::scalar::scalar_to_bytes(&m_digest);
    let sig = parse_sigma(&token.tca.sigma)?;
    let verifying_key = VerifyingKey::from_affine(pk_ca.to_affine())
        .map_err(|e| WalletError::Protocol(format!("invalid CA public key: {e}")))?;
    if let Err(e) = verify_prehash(&verifying_key, &m_digest_bytes, &sig) {
        log::warn!("retrieve: CA signature check failed: {e}");
        return Err(WalletError::BadSignature);
    }

    // 2. Replay check against this wallet instance, inserted *before* the
    // recovery check succeeds or fails (see module docs / design notes).
    if !local_used.try_mark(&token.tu.rho) {
        log::warn!("retrieve: token id already used against this wallet instance");
        return Err(WalletError::Replay);
    }

    // 3. Gather CA partials and combine into M.
    let quorum = params.ca_quorum();
    let partials: Vec<PartialHelper> = ca_nodes
        .iter()
        .filter_map(|node| node.helper(token.tu.rho, &r0).ok())
        .collect();
    let partials = dedupe_partials(partials);
    log::debug!("retrieve: collected {} of {} required CA partials", partials.len(), quorum);
    if partials.len() < quorum {
        return Err(WalletError::Quorum { needed: quorum, got: partials.len() });
    }
    let m = combine_helpers(&partials, quorum)?;

    // 4. Recoverable sanity point.
    let k_dec = point_sub(&r1, &m);

    // 5. Recompute candidate matches against the presented biometric.
    let a_scalars = token.tca.a_scalars();
    if a_scalars.len() != params.d || token.tca.tags.len() != params.d || biometric_guess.len() != params.d {
        return Err(WalletError::Protocol("sketch/biometric length mismatch".into()));
    }

    let mut matches: Vec<(u32, Scalar)> = Vec::new();
    for idx in 1..=params.d as u32 {
        let i = (idx - 1) as usize;
        let w_prime = h0(biometric_guess[i], &token.tu.c);
        let m_wprime = point_mul(&m, &w_prime);
        let z_prime = h1(&m, &m_wprime);
        let candidate_tag = htag(idx, &token.tu.rho, &z_prime, params.lambda_bytes);
        if candidate_tag == token.tca.tags[i] {
            matches.push((idx, z_prime));
        }
    }

    // 6. Require at least tbio matches.
    log::debug!("retrieve: {} of {} required tag matches", matches.len(), params.tbio);
    if matches.len() < params.tbio {
        return Err(WalletError::InsufficientMatches { needed: params.tbio, got: matches.len() });
    }

    // 7. Take the first tbio matches in ascending index order (normative
    // tie-break) and interpolate.
    let quorum_matches = &matches[..params.tbio];
    let points: Vec<(u32, Scalar)> = quorum_matches
        .iter()
        .map(|(idx, z_i)| {
            let a_i = a_scalars[(*idx - 1) as usize];
            (*idx, scalar_sub(&a_i, z_i))
        })
        .collect();
    let k_hat = interpolate_zero(&points)?;

    // 8. Recovery check.
    if !point_eq(&point_mul_base(&k_hat), &k_dec) {
        log::warn!("retrieve: interpolated key failed the recovery check");
        return Err(WalletError::RecoveryCheck);
    }

    // 9.
    log::info!("retrieve: recovered key for token {}", hex::encode(token.tu.rho));
    Ok(k_hat)
}

fn parse_sigma(sigma: &[u8]) -> Result<RecoverableSignature, WalletError> {
    if sigma.len() != 65 {
        return Err(WalletError::Protocol(format!("expected 65-byte signature, got {}", sigma.len())));
    }
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&sigma[..32]);
    s.copy_from_slice(&sigma[32..64]);
    Ok(RecoverableSignature { r, s, recovery_id: sigma[64] })
}
