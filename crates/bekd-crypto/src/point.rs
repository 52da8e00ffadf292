//! Point arithmetic on secp256k1 and the 64-byte wire encoding.
//!
//! Wire format is fixed: 32-byte big-endian X ‖ 32-byte big-endian Y, no
//! compression tag. The identity (point at infinity) is 64 zero bytes —
//! never valid coordinates for an on-curve point, so it round-trips
//! unambiguously.

use k256::elliptic_curve::group::prime::PrimeCurveAffine;
use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar};

use crate::error::CryptoError;

pub const POINT_LEN: usize = 64;

pub fn point_generator() -> ProjectivePoint {
    ProjectivePoint::GENERATOR
}

pub fn point_identity() -> ProjectivePoint {
    ProjectivePoint::IDENTITY
}

pub fn point_add(a: &ProjectivePoint, b: &ProjectivePoint) -> ProjectivePoint {
    a + b
}

pub fn point_neg(a: &ProjectivePoint) -> ProjectivePoint {
    -a
}

pub fn point_sub(a: &ProjectivePoint, b: &ProjectivePoint) -> ProjectivePoint {
    a - b
}

pub fn point_mul(p: &ProjectivePoint, s: &Scalar) -> ProjectivePoint {
    p * s
}

pub fn point_mul_base(s: &Scalar) -> ProjectivePoint {
    ProjectivePoint::GENERATOR * s
}

pub fn point_eq(a: &ProjectivePoint, b: &ProjectivePoint) -> bool {
    a.to_affine() == b.to_affine()
}

/// Serializes a point as 64 bytes (X ‖ Y), or 64 zero bytes for the identity.
pub fn serialize_point(p: &ProjectivePoint) -> [u8; POINT_LEN] {
    let affine = p.to_affine();
    let mut out = [0u8; POINT_LEN];
    if bool::from(affine.is_identity()) {
        return out;
    }
    let encoded = affine.to_encoded_point(false);
    out[..32].copy_from_slice(encoded.x().expect("non-identity point has x"));
    out[32..].copy_from_slice(encoded.y().expect("non-identity point has y"));
    out
}

/// Parses a 64-byte point encoding. All-zero decodes to the identity.
pub fn deserialize_point(bytes: &[u8; POINT_LEN]) -> Result<ProjectivePoint, CryptoError> {
    if bytes.iter().all(|b| *b == 0) {
        return Ok(ProjectivePoint::IDENTITY);
    }
    let x = FieldBytes::clone_from_slice(&bytes[..32]);
    let y = FieldBytes::clone_from_slice(&bytes[32..]);
    let encoded = EncodedPoint::from_affine_coordinates(&x, &y, false);
    let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
        .ok_or(CryptoError::InvalidPoint)?;
    Ok(ProjectivePoint::from(affine))
}
