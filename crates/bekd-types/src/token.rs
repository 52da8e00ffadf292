//! Token wire format (§6): the serialized artifact handed between wallet
//! and CA, and persisted to disk between runs.
//!
//! Numeric fields (`R0`, `R1`, `hA`, `A`) are arbitrary-precision decimal
//! integers, not `u64` — truncating them would silently corrupt curve
//! coordinates and hash outputs above 2^64.

use bekd_crypto::point::{deserialize_point, serialize_point, POINT_LEN};
use bekd_crypto::scalar::{scalar_from_bytes_reduced, scalar_to_bytes};
use bekd_crypto::Scalar;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// The user-held half of a token: the enrollment salt and the envelope's
/// token id. Small and cheap to keep around; never touches the CA.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUser {
    #[serde(with = "hex_32")]
    pub c: [u8; 32],
    #[serde(with = "hex_32")]
    pub rho: [u8; 32],
}

/// The CA-relayable half of a token: everything needed to run retrieval
/// against a quorum of CA nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenCa {
    #[serde(rename = "R0", with = "decimal_point")]
    pub r0: (BigUint, BigUint),
    #[serde(rename = "R1", with = "decimal_point")]
    pub r1: (BigUint, BigUint),
    #[serde(rename = "hA", with = "decimal_biguint")]
    pub h_a: BigUint,
    #[serde(rename = "sigma", with = "hex_bytes")]
    pub sigma: Vec<u8>,
    #[serde(rename = "A", with = "decimal_biguint_vec")]
    pub a: Vec<BigUint>,
    #[serde(with = "hex_bytes_vec")]
    pub tags: Vec<Vec<u8>>,
}

/// A full BEKD token. `biometric` is a test-harness-only field: it holds
/// the raw feature vector so replay-attack tests can simulate the same
/// physical biometric being presented twice. Production tokens never
/// carry it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub tu: TokenUser,
    pub tca: TokenCa,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub biometric: Option<Vec<f64>>,
}

impl TokenCa {
    pub fn r0_point(&self) -> Result<k256::ProjectivePoint, TypesError> {
        biguint_pair_to_point(&self.r0)
    }

    pub fn r1_point(&self) -> Result<k256::ProjectivePoint, TypesError> {
        biguint_pair_to_point(&self.r1)
    }

    pub fn h_a_scalar(&self) -> Scalar {
        scalar_from_bytes_reduced(&biguint_to_32(&self.h_a))
    }

    pub fn a_scalars(&self) -> Vec<Scalar> {
        self.a.iter().map(|a| scalar_from_bytes_reduced(&biguint_to_32(a))).collect()
    }
}

fn biguint_pair_to_point(pair: &(BigUint, BigUint)) -> Result<k256::ProjectivePoint, TypesError> {
    let mut bytes = [0u8; POINT_LEN];
    bytes[..32].copy_from_slice(&biguint_to_32(&pair.0));
    bytes[32..].copy_from_slice(&biguint_to_32(&pair.1));
    deserialize_point(&bytes).map_err(TypesError::from)
}

pub fn point_to_biguint_pair(p: &k256::ProjectivePoint) -> (BigUint, BigUint) {
    let bytes = serialize_point(p);
    (
        BigUint::from_bytes_be(&bytes[..32]),
        BigUint::from_bytes_be(&bytes[32..]),
    )
}

pub fn scalar_to_biguint(s: &Scalar) -> BigUint {
    BigUint::from_bytes_be(&scalar_to_bytes(s))
}

fn biguint_to_32(v: &BigUint) -> [u8; 32] {
    let bytes = v.to_bytes_be();
    let mut out = [0u8; 32];
    let start = 32usize.saturating_sub(bytes.len());
    out[start..].copy_from_slice(&bytes[bytes.len().saturating_sub(32)..]);
    out
}

mod hex_32 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 32 bytes"))
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}

mod hex_bytes_vec {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(values: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        let hexed: Vec<String> = values.iter().map(hex::encode).collect();
        hexed.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error> {
        let hexed = Vec::<String>::deserialize(deserializer)?;
        hexed
            .into_iter()
            .map(|s| hex::decode(&s).map_err(serde::de::Error::custom))
            .collect()
    }
}

/// Arbitrary-precision decimal integer, via `serde_json::Number` so it
/// round-trips as a bare JSON numeral rather than a quoted string.
mod decimal_biguint {
    use std::str::FromStr;

    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Number;

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        let n = Number::from_str(&value.to_str_radix(10)).map_err(serde::ser::Error::custom)?;
        n.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let n = Number::deserialize(deserializer)?;
        BigUint::from_str(&n.to_string()).map_err(serde::de::Error::custom)
    }
}

mod decimal_biguint_vec {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(transparent)]
    struct Wrap(#[serde(with = "super::decimal_biguint")] BigUint);

    pub fn serialize<S: Serializer>(values: &[BigUint], serializer: S) -> Result<S::Ok, S::Error> {
        let wrapped: Vec<Wrap> = values.iter().cloned().map(Wrap).collect();
        wrapped.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<BigUint>, D::Error> {
        let wrapped = Vec::<Wrap>::deserialize(deserializer)?;
        Ok(wrapped.into_iter().map(|w| w.0).collect())
    }
}

mod decimal_point {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(transparent)]
    struct Wrap(#[serde(with = "super::decimal_biguint")] BigUint);

    pub fn serialize<S: Serializer>(value: &(BigUint, BigUint), serializer: S) -> Result<S::Ok, S::Error> {
        [Wrap(value.0.clone()), Wrap(value.1.clone())].serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<(BigUint, BigUint), D::Error> {
        let [a, b] = <[Wrap; 2]>::deserialize(deserializer)?;
        Ok((a.0, b.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bekd_crypto::point::point_mul_base;
    use bekd_crypto::scalar::scalar_random;

    fn sample_token() -> Token {
        let r0 = point_mul_base(&scalar_random());
        let r1 = point_mul_base(&scalar_random());
        Token {
            tu: TokenUser { c: [1u8; 32], rho: [2u8; 32] },
            tca: TokenCa {
                r0: point_to_biguint_pair(&r0),
                r1: point_to_biguint_pair(&r1),
                h_a: scalar_to_biguint(&scalar_random()),
                sigma: vec![0xaa; 65],
                a: (1..=3).map(|_| scalar_to_biguint(&scalar_random())).collect(),
                tags: vec![vec![0xbb; 32]; 3],
            },
            biometric: None,
        }
    }

    #[test]
    fn token_round_trips_through_json() {
        let token = sample_token();
        let json = serde_json::to_string(&token).unwrap();
        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(token.tu.c, back.tu.c);
        assert_eq!(token.tu.rho, back.tu.rho);
        assert_eq!(token.tca.h_a, back.tca.h_a);
        assert_eq!(token.tca.a, back.tca.a);
        assert_eq!(token.tca.tags, back.tca.tags);
    }

    #[test]
    fn numeric_fields_serialize_as_bare_json_numbers() {
        let token = sample_token();
        let json = serde_json::to_string(&token).unwrap();
        assert!(!json.contains("\"hA\":\""));
        assert!(json.contains("\"hA\":"));
    }

    #[test]
    fn point_round_trips_through_biguint_pair() {
        let p = point_mul_base(&scalar_random());
        let pair = point_to_biguint_pair(&p);
        let token_ca = TokenCa {
            r0: pair,
            r1: point_to_biguint_pair(&p),
            h_a: BigUint::from(0u32),
            sigma: vec![],
            a: vec![],
            tags: vec![],
        };
        let back = token_ca.r0_point().unwrap();
        assert_eq!(serialize_point(&back), serialize_point(&p));
    }

    #[test]
    fn biometric_field_absent_by_default_in_json() {
        let token = sample_token();
        let json = serde_json::to_string(&token).unwrap();
        assert!(!json.contains("biometric"));
    }
}
