//! Domain-separated hashes H0..H3, Htag, all keccak-256 based.
//!
//! Every hash prepends a single domain-tag byte to its preimage before
//! hashing, so that a digest computed for one purpose can never be replayed
//! as the output of another. Scalar-valued outputs reduce the 32-byte
//! digest mod the curve order (biased reduction, see [`scalar`]).

use k256::{ProjectivePoint, Scalar};
use tiny_keccak::{Hasher, Keccak};

use crate::point::serialize_point;
use crate::scalar::{scalar_from_bytes_reduced, scalar_to_bytes};

const DOMAIN_H0: u8 = 0x00;
const DOMAIN_H1: u8 = 0x01;
const DOMAIN_H2: u8 = 0x02;
const DOMAIN_H3: u8 = 0x03;
const DOMAIN_HTAG: u8 = 0x04;

/// Raw keccak-256 (the true Keccak padding, not NIST SHA3).
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut out = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut out);
    out
}

/// Canonical textual encoding of one biometric feature value.
///
/// Uses Rust's round-trip-exact `Debug` formatting for `f64`, which (like
/// the reference implementation's `repr(float(x))`) always includes a
/// decimal point and reproduces the value bit-for-bit on reparse. This
/// encoding is brittle by design — see the crate-level notes — and any
/// interoperating implementation must reproduce it exactly.
pub fn encode_feature(w: f64) -> String {
    format!("{:?}", w)
}

/// H0(W_i, c) — per-feature salted hash, domain 0x00.
pub fn h0(feature: f64, salt: &[u8; 32]) -> Scalar {
    let mut preimage = Vec::with_capacity(1 + 24 + 32);
    preimage.push(DOMAIN_H0);
    preimage.extend_from_slice(encode_feature(feature).as_bytes());
    preimage.extend_from_slice(salt);
    scalar_from_bytes_reduced(&keccak256(&preimage))
}

/// H1(M, M·w_i) — binds the sketch mask to the envelope's shared point,
/// domain 0x01.
pub fn h1(m: &ProjectivePoint, m_wi: &ProjectivePoint) -> Scalar {
    let mut preimage = Vec::with_capacity(1 + 64 + 64);
    preimage.push(DOMAIN_H1);
    preimage.extend_from_slice(&serialize_point(m));
    preimage.extend_from_slice(&serialize_point(m_wi));
    scalar_from_bytes_reduced(&keccak256(&preimage))
}

/// H2(R0, R1, hA) — the digest the CA's token signature covers, domain 0x02.
pub fn h2(r0: &ProjectivePoint, r1: &ProjectivePoint, h_a: &Scalar) -> Scalar {
    let mut preimage = Vec::with_capacity(1 + 64 + 64 + 32);
    preimage.push(DOMAIN_H2);
    preimage.extend_from_slice(&serialize_point(r0));
    preimage.extend_from_slice(&serialize_point(r1));
    preimage.extend_from_slice(&scalar_to_bytes(h_a));
    scalar_from_bytes_reduced(&keccak256(&preimage))
}

/// H3(blob) — binds the whole sketch (A, tags) into one scalar, domain 0x03.
pub fn h3(blob: &[u8]) -> Scalar {
    let mut preimage = Vec::with_capacity(1 + blob.len());
    preimage.push(DOMAIN_H3);
    preimage.extend_from_slice(blob);
    scalar_from_bytes_reduced(&keccak256(&preimage))
}

/// Htag(i, rho, Z_i) truncated to `lambda_bytes`, domain 0x04.
pub fn htag(index: u32, rho: &[u8; 32], z_i: &Scalar, lambda_bytes: usize) -> Vec<u8> {
    let mut preimage = Vec::with_capacity(1 + 32 + 32 + 32);
    preimage.push(DOMAIN_HTAG);
    preimage.extend_from_slice(&index_to_scalar_bytes(index));
    preimage.extend_from_slice(rho);
    preimage.extend_from_slice(&scalar_to_bytes(z_i));
    let digest = keccak256(&preimage);
    digest[..lambda_bytes.min(32)].to_vec()
}

fn index_to_scalar_bytes(index: u32) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[28..].copy_from_slice(&index.to_be_bytes());
    out
}

/// rho = keccak256(ser(R0)) — the envelope's unique, deterministic token id.
pub fn token_id(r0: &ProjectivePoint) -> [u8; 32] {
    keccak256(&serialize_point(r0))
}
