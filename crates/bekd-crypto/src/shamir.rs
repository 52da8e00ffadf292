//! Shamir secret sharing over the secp256k1 scalar field.
//!
//! Polynomials are represented low-degree-coefficient-first:
//! `coeffs[0]` is the secret, `coeffs[d]` is the degree-`d` term.

use k256::Scalar;

use crate::error::CryptoError;
use crate::scalar::{scalar_add, scalar_from_bytes_reduced, scalar_inv, scalar_mul, scalar_random, scalar_sub};

/// Builds a degree-`threshold - 1` polynomial with the given secret as the
/// constant term and uniformly random higher coefficients.
pub fn random_polynomial(secret: &Scalar, threshold: usize) -> Vec<Scalar> {
    let mut coeffs = Vec::with_capacity(threshold);
    coeffs.push(*secret);
    for _ in 1..threshold {
        coeffs.push(scalar_random());
    }
    coeffs
}

/// Evaluates a polynomial at `x` via Horner's method.
pub fn poly_eval(coeffs: &[Scalar], x: &Scalar) -> Scalar {
    let mut acc = Scalar::ZERO;
    for c in coeffs.iter().rev() {
        acc = scalar_add(&scalar_mul(&acc, x), c);
    }
    acc
}

/// Splits `secret` into `n` shares `(i, f(i))` for `i = 1..=n`, recoverable
/// by any `threshold` of them.
pub fn split_secret(secret: &Scalar, threshold: usize, n: usize) -> Vec<(u32, Scalar)> {
    let coeffs = random_polynomial(secret, threshold);
    (1..=n as u32)
        .map(|i| (i, poly_eval(&coeffs, &index_to_scalar(i))))
        .collect()
}

/// Lagrange coefficient for index `xi` at `x = 0`, given the full set of
/// participating indices.
pub fn lagrange_coefficient_at_zero(xi: u32, indices: &[u32]) -> Scalar {
    let xi_s = index_to_scalar(xi);
    let mut num = Scalar::ONE;
    let mut den = Scalar::ONE;
    for &xj in indices {
        if xj == xi {
            continue;
        }
        let xj_s = index_to_scalar(xj);
        num = scalar_mul(&num, &xj_s);
        den = scalar_mul(&den, &scalar_sub(&xj_s, &xi_s));
    }
    scalar_mul(&num, &scalar_inv(&den))
}

/// Reconstructs `f(0)` from at least `threshold` shares via Lagrange
/// interpolation. Uses exactly the shares given — callers are responsible
/// for selecting a quorum of size >= threshold.
pub fn interpolate_zero(shares: &[(u32, Scalar)]) -> Result<Scalar, CryptoError> {
    if shares.is_empty() {
        return Err(CryptoError::BadLength { expected: 1, got: 0 });
    }
    let indices: Vec<u32> = shares.iter().map(|(i, _)| *i).collect();
    let mut acc = Scalar::ZERO;
    for (xi, yi) in shares {
        let li = lagrange_coefficient_at_zero(*xi, &indices);
        acc = scalar_add(&acc, &scalar_mul(yi, &li));
    }
    Ok(acc)
}

fn index_to_scalar(i: u32) -> Scalar {
    let mut bytes = [0u8; 32];
    bytes[28..].copy_from_slice(&i.to_be_bytes());
    scalar_from_bytes_reduced(&bytes)
}
