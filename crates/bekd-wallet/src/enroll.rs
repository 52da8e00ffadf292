//! Enrollment engine (C6).

use bekd_crypto::ecdsa::{sign_prehash_recoverable, verify_prehash};
use bekd_crypto::hash::{h0, h1, h2, h3, htag};
use bekd_crypto::point::point_mul;
use bekd_crypto::scalar::{scalar_add, scalar_random, scalar_to_bytes};
use bekd_crypto::shamir::{poly_eval, random_polynomial};
use bekd_types::token::{point_to_biguint_pair, scalar_to_biguint};
use bekd_types::{ProtocolParams, Token, TokenCa, TokenUser};
use k256::ecdsa::{SigningKey, VerifyingKey};
use k256::ProjectivePoint;

use crate::envelope::build_envelope;
use crate::error::WalletError;

/// Runs the six-step enrollment protocol against a fresh biometric `w`,
/// producing a token signed by the CA. `sk_ca` is only needed because
/// this crate plays both wallet and CA roles in tests and the CLI; a
/// production wallet would call out to the CA consortium instead of
/// holding this key.
pub fn enroll(
    sk_ca: &k256::Scalar,
    pk_ca: &ProjectivePoint,
    params: &ProtocolParams,
    biometric: &[f64],
) -> Result<Token, WalletError> {
    if biometric.len() != params.d {
        return Err(WalletError::Protocol(format!(
            "expected {} biometric features, got {}",
            params.d,
            biometric.len()
        )));
    }

    // 1. Draw k, r, c; build envelope.
    let k = scalar_random();
    let r = scalar_random();
    let mut c = [0u8; 32];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut c);
    let env = build_envelope(pk_ca, &k, &r);

    // 2. Per-feature salted hash.
    let w: Vec<k256::Scalar> = biometric.iter().map(|&feature| h0(feature, &c)).collect();

    // 3. Shamir polynomial of degree tbio - 1 with P(0) = k.
    let poly = random_polynomial(&k, params.tbio);

    // 4. Sketch entries, tags.
    let mut a = Vec::with_capacity(params.d);
    let mut tags = Vec::with_capacity(params.d);
    for i in 1..=params.d as u32 {
        let w_i = w[(i - 1) as usize];
        let m_wi = point_mul(&env.m, &w_i);
        let z_i = h1(&env.m, &m_wi);
        let p_i = poly_eval(&poly, &index_scalar(i));
        let a_i = scalar_add(&p_i, &z_i);
        let tag_i = htag(i, &env.rho, &z_i, params.lambda_bytes);
        a.push(a_i);
        tags.push(tag_i);
    }

    // 5. Bind the sketch, sign.
    let h_a = h3(&sketch_blob(&a, &tags));
    let m_digest = h2(&env.r0, &env.r1, &h_a);
    let m_digest_bytes = scalar_to_bytes(&m_digest);

    let signing_key = SigningKey::from_bytes(&scalar_to_bytes(sk_ca).into())
        .map_err(|e| WalletError::Protocol(format!("invalid CA signing key: {e}")))?;
    let sig = sign_prehash_recoverable(&signing_key, &m_digest_bytes)?;

    // Post-condition: the signature we just produced must verify, or the
    // token would be silently unusable.
    let verifying_key = VerifyingKey::from(&signing_key);
    verify_prehash(&verifying_key, &m_digest_bytes, &sig)
        .map_err(|_| WalletError::Protocol("self-signature verification failed".into()))?;

    let mut sigma = Vec::with_capacity(65);
    sigma.extend_from_slice(&sig.r);
    sigma.extend_from_slice(&sig.s);
    sigma.push(sig.recovery_id);

    log::info!("enroll: issued token {} over {} biometric features", hex::encode(env.rho), params.d);

    Ok(Token {
        tu: TokenUser { c, rho: env.rho },
        tca: TokenCa {
            r0: point_to_biguint_pair(&env.r0),
            r1: point_to_biguint_pair(&env.r1),
            h_a: scalar_to_biguint(&h_a),
            sigma,
            a: a.iter().map(scalar_to_biguint).collect(),
            tags,
        },
        biometric: None,
    })
}

pub(crate) fn index_scalar(i: u32) -> k256::Scalar {
    let mut bytes = [0u8; 32];
    bytes[28..].copy_from_slice(&i.to_be_bytes());
    bekd_crypto::scalar::scalar_from_bytes_reduced(&bytes)
}

/// `concat(ser32(A_i)) ‖ concat(tag_i)`, ascending index order.
pub(crate) fn sketch_blob(a: &[k256::Scalar], tags: &[Vec<u8>]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(a.len() * 32 + tags.iter().map(Vec::len).sum::<usize>());
    for a_i in a {
        blob.extend_from_slice(&scalar_to_bytes(a_i));
    }
    for tag in tags {
        blob.extend_from_slice(tag);
    }
    blob
}

#[cfg(test)]
mod tests {
    use super::*;
    use bekd_crypto::point::point_mul_base;
    use crate::biometric::generate_biometric;

    #[test]
    fn enroll_produces_self_verifying_token() {
        let sk_ca = bekd_crypto::scalar::scalar_random();
        let pk_ca = point_mul_base(&sk_ca);
        let params = ProtocolParams::new(16, 4, 1, 3, 32).unwrap();
        let biometric = generate_biometric(16, Some(1));

        let token = enroll(&sk_ca, &pk_ca, &params, &biometric).unwrap();
        assert_eq!(token.tca.a.len(), 16);
        assert_eq!(token.tca.tags.len(), 16);
        assert!(token.biometric.is_none());
    }

    #[test]
    fn wrong_feature_count_is_rejected() {
        let sk_ca = bekd_crypto::scalar::scalar_random();
        let pk_ca = point_mul_base(&sk_ca);
        let params = ProtocolParams::new(16, 4, 1, 3, 32).unwrap();
        let biometric = generate_biometric(8, Some(1));
        assert!(enroll(&sk_ca, &pk_ca, &params, &biometric).is_err());
    }

    #[test]
    fn two_enrollments_of_same_biometric_produce_different_tokens() {
        let sk_ca = bekd_crypto::scalar::scalar_random();
        let pk_ca = point_mul_base(&sk_ca);
        let params = ProtocolParams::new(16, 4, 1, 3, 32).unwrap();
        let biometric = generate_biometric(16, Some(2));

        let t1 = enroll(&sk_ca, &pk_ca, &params, &biometric).unwrap();
        let t2 = enroll(&sk_ca, &pk_ca, &params, &biometric).unwrap();
        assert_ne!(t1.tu.rho, t2.tu.rho);
    }
}
