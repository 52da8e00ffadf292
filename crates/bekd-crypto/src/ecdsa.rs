//! ECDSA over secp256k1: recoverable signing/recovery and Ethereum-style
//! owner-address derivation, used by the authentication ceremony and by
//! the CA's token-signature verification.

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;

use crate::error::CryptoError;
use crate::hash::keccak256;

/// A recoverable ECDSA signature: (r, s, v).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoverableSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub recovery_id: u8,
}

impl RecoverableSignature {
    pub fn to_signature(&self) -> Result<Signature, CryptoError> {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..].copy_from_slice(&self.s);
        Signature::from_slice(&bytes).map_err(|e| CryptoError::SigningFailed(e.to_string()))
    }

    pub fn recovery_id(&self) -> Result<RecoveryId, CryptoError> {
        RecoveryId::from_byte(self.recovery_id).ok_or(CryptoError::RecoveryFailed(
            "invalid recovery id byte".into(),
        ))
    }
}

/// Signs a 32-byte prehashed digest, returning a recoverable signature.
pub fn sign_prehash_recoverable(
    signing_key: &SigningKey,
    digest: &[u8; 32],
) -> Result<RecoverableSignature, CryptoError> {
    let (sig, recid) = signing_key
        .sign_prehash_recoverable(digest)
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
    let bytes = sig.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..]);
    Ok(RecoverableSignature {
        r,
        s,
        recovery_id: recid.to_byte(),
    })
}

/// Verifies a digest against a known verifying key, ignoring recovery id.
pub fn verify_prehash(
    verifying_key: &VerifyingKey,
    digest: &[u8; 32],
    sig: &RecoverableSignature,
) -> Result<(), CryptoError> {
    use k256::ecdsa::signature::hazmat::PrehashVerifier;
    let signature = sig.to_signature()?;
    verifying_key
        .verify_prehash(digest, &signature)
        .map_err(|_| CryptoError::BadSignature)
}

/// Recovers the signer's verifying key from a digest and signature.
pub fn recover_from_prehash(
    digest: &[u8; 32],
    sig: &RecoverableSignature,
) -> Result<VerifyingKey, CryptoError> {
    let signature = sig.to_signature()?;
    let recid = sig.recovery_id()?;
    VerifyingKey::recover_from_prehash(digest, &signature, recid)
        .map_err(|e| CryptoError::RecoveryFailed(e.to_string()))
}

/// Ethereum-style address: the low 20 bytes of keccak256(uncompressed
/// pubkey without the 0x04 prefix byte).
pub fn owner_address(key: &VerifyingKey) -> [u8; 20] {
    let encoded = key.to_encoded_point(false);
    let digest = keccak256(&encoded.as_bytes()[1..]);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest[12..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn sign_verify_recover_round_trip() {
        let signing_key = SigningKey::random(&mut OsRng);
        let verifying_key = VerifyingKey::from(&signing_key);
        let digest = keccak256(b"authenticate me");

        let sig = sign_prehash_recoverable(&signing_key, &digest).unwrap();
        verify_prehash(&verifying_key, &digest, &sig).unwrap();

        let recovered = recover_from_prehash(&digest, &sig).unwrap();
        assert_eq!(recovered, verifying_key);
    }

    #[test]
    fn tampered_digest_fails_verification() {
        let signing_key = SigningKey::random(&mut OsRng);
        let verifying_key = VerifyingKey::from(&signing_key);
        let digest = keccak256(b"authenticate me");
        let other_digest = keccak256(b"authenticate someone else");

        let sig = sign_prehash_recoverable(&signing_key, &digest).unwrap();
        assert!(verify_prehash(&verifying_key, &other_digest, &sig).is_err());
    }

    #[test]
    fn owner_address_is_stable_and_20_bytes() {
        let signing_key = SigningKey::random(&mut OsRng);
        let verifying_key = VerifyingKey::from(&signing_key);
        let a = owner_address(&verifying_key);
        let b = owner_address(&verifying_key);
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
    }

    #[test]
    fn wrong_signer_recovers_to_different_address() {
        let key_a = SigningKey::random(&mut OsRng);
        let key_b = SigningKey::random(&mut OsRng);
        let digest = keccak256(b"authenticate me");
        let sig = sign_prehash_recoverable(&key_a, &digest).unwrap();
        let recovered = recover_from_prehash(&digest, &sig).unwrap();
        assert_ne!(owner_address(&recovered), owner_address(&VerifyingKey::from(&key_b)));
    }
}
