//! Spent-set & authentication ceremony (C9).
//!
//! This is the only place `rho` is consumed irrevocably: the retrieval
//! engine's local-used set (C8) only guards a single wallet instance
//! against re-decapsulating the same envelope, while the `SpentSet`
//! here is the protocol-level single-use enforcement.

use bekd_crypto::ecdsa::{owner_address, recover_from_prehash, sign_prehash_recoverable};
use bekd_crypto::hash::keccak256;
use bekd_types::SpentSet;
use k256::ecdsa::SigningKey;
use k256::Scalar;

use crate::error::WalletError;

const DOMAIN_NAME: &[u8] = b"BiometricWallet";
const DOMAIN_VERSION: &[u8] = b"1";

/// EIP-712-shaped typed digest: domain-separated over (name, version,
/// chain id, wallet address), then over (rho, op_hash), then combined
/// with the `\x19\x01` typed-data prefix. Treated as an opaque primitive:
/// this is not a full EIP-712 encoder, just its hashing shape.
pub fn typed_digest(rho: &[u8; 32], op_hash: &[u8; 32], chain_id: u64, wallet_address: &[u8; 20]) -> [u8; 32] {
    let mut domain_preimage = Vec::with_capacity(DOMAIN_NAME.len() + DOMAIN_VERSION.len() + 32 + 20);
    domain_preimage.extend_from_slice(DOMAIN_NAME);
    domain_preimage.extend_from_slice(DOMAIN_VERSION);
    domain_preimage.extend_from_slice(&chain_id_bytes(chain_id));
    domain_preimage.extend_from_slice(wallet_address);
    let domain = keccak256(&domain_preimage);

    let mut struct_preimage = Vec::with_capacity(64);
    struct_preimage.extend_from_slice(rho);
    struct_preimage.extend_from_slice(op_hash);
    let struct_hash = keccak256(&struct_preimage);

    let mut final_preimage = Vec::with_capacity(2 + 32 + 32);
    final_preimage.extend_from_slice(&[0x19, 0x01]);
    final_preimage.extend_from_slice(&domain);
    final_preimage.extend_from_slice(&struct_hash);
    keccak256(&final_preimage)
}

fn chain_id_bytes(chain_id: u64) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[24..].copy_from_slice(&chain_id.to_be_bytes());
    out
}

/// Runs the four-step authentication ceremony and returns whether it
/// succeeded. `k` is the key recovered by [`crate::retrieve::retrieve`].
/// `wallet_address` is the externally-known smart-wallet address bound
/// into the EIP-712 domain; it is distinct from the address derived from
/// `k`, which is only used for the post-recovery owner check.
pub fn authenticate(
    k: &Scalar,
    rho: &[u8; 32],
    op_hash: &[u8; 32],
    chain_id: u64,
    wallet_address: &[u8; 20],
    spent_set: &dyn SpentSet,
) -> Result<bool, WalletError> {
    let signing_key = SigningKey::from_bytes(&bekd_crypto::scalar::scalar_to_bytes(k).into())
        .map_err(|e| WalletError::Protocol(format!("invalid recovered key: {e}")))?;
    let owner = owner_address(&k256::ecdsa::VerifyingKey::from(&signing_key));

    let digest = typed_digest(rho, op_hash, chain_id, wallet_address);
    let sig = sign_prehash_recoverable(&signing_key, &digest)?;
    let recovered = recover_from_prehash(&digest, &sig)?;

    if owner_address(&recovered) != owner {
        log::warn!("authenticate: recovered signer does not match wallet owner address");
        return Err(WalletError::BadSignature);
    }

    let spent = spent_set.try_mark(rho);
    if spent {
        log::info!("authenticate: token {} spent", hex::encode(rho));
    } else {
        log::warn!("authenticate: token {} rejected, already spent", hex::encode(rho));
    }
    Ok(spent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spent_set::InMemorySpentSet;

    const WALLET_ADDRESS: [u8; 20] = [9u8; 20];

    #[test]
    fn first_spend_succeeds_second_fails() {
        let k = bekd_crypto::scalar::scalar_random();
        let rho = [3u8; 32];
        let op_hash = keccak256(b"withdraw 1 eth");
        let spent_set = InMemorySpentSet::new();

        let first = authenticate(&k, &rho, &op_hash, 1, &WALLET_ADDRESS, &spent_set).unwrap();
        let second = authenticate(&k, &rho, &op_hash, 1, &WALLET_ADDRESS, &spent_set).unwrap();
        assert!(first);
        assert!(!second);
    }

    #[test]
    fn different_op_hashes_both_spend_independently_when_rho_differs() {
        let k = bekd_crypto::scalar::scalar_random();
        let spent_set = InMemorySpentSet::new();
        let op_a = keccak256(b"op a");
        let op_b = keccak256(b"op b");

        assert!(authenticate(&k, &[1u8; 32], &op_a, 1, &WALLET_ADDRESS, &spent_set).unwrap());
        assert!(authenticate(&k, &[2u8; 32], &op_b, 1, &WALLET_ADDRESS, &spent_set).unwrap());
    }

    #[test]
    fn typed_digest_is_sensitive_to_chain_id() {
        let rho = [1u8; 32];
        let op_hash = [2u8; 32];
        let addr = [3u8; 20];
        let a = typed_digest(&rho, &op_hash, 1, &addr);
        let b = typed_digest(&rho, &op_hash, 2, &addr);
        assert_ne!(a, b);
    }
}
