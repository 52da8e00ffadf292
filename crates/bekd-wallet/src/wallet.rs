//! High-level wallet: owns the CA node quorum and both single-use guards,
//! and exposes enroll/retrieve/authenticate as the three public
//! operations. Mirrors the reference implementation's `BEKDWallet`.

use bekd_ca::{CaNode, DkgOutput, LocalCaNode};
use bekd_crypto::scalar::SecretScalar;
use bekd_types::{ProtocolParams, Token};
use k256::{ProjectivePoint, Scalar};

use crate::auth::authenticate as run_authenticate;
use crate::enroll::enroll as run_enroll;
use crate::error::WalletError;
use crate::retrieve::retrieve as run_retrieve;
use crate::spent_set::InMemorySpentSet;

pub struct BekdWallet {
    params: ProtocolParams,
    master_secret: SecretScalar,
    pk_ca: ProjectivePoint,
    ca_nodes: Vec<LocalCaNode>,
    /// Per-instance anti-double-decapsulation guard (C8 step 2).
    local_used: InMemorySpentSet,
    /// Protocol-level single-use enforcement (C9 step 4).
    spent_set: InMemorySpentSet,
    chain_id: u64,
}

impl BekdWallet {
    /// Stands up a wallet with a fresh simulated CA consortium. In a real
    /// deployment the wallet would never see `sk_CA`; enrollment would be
    /// a round trip to the consortium instead of a local call.
    pub fn new(params: ProtocolParams, chain_id: u64) -> Self {
        let dkg = bekd_ca::run_simulated_dkg(params.n, params.t);
        Self::from_dkg(params, dkg, chain_id)
    }

    pub fn from_dkg(params: ProtocolParams, dkg: DkgOutput, chain_id: u64) -> Self {
        let ca_nodes = dkg.shares.into_iter().map(LocalCaNode::new).collect();
        Self {
            params,
            master_secret: dkg.master_secret,
            pk_ca: dkg.public_key,
            ca_nodes,
            local_used: InMemorySpentSet::new(),
            spent_set: InMemorySpentSet::new(),
            chain_id,
        }
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    pub fn ca_public_key(&self) -> &ProjectivePoint {
        &self.pk_ca
    }

    pub fn enroll(&self, biometric: &[f64]) -> Result<Token, WalletError> {
        run_enroll(&self.master_secret.expose(), &self.pk_ca, &self.params, biometric)
    }

    pub fn retrieve(&self, token: &Token, biometric_guess: &[f64]) -> Result<Scalar, WalletError> {
        let node_refs: Vec<&dyn CaNode> = self.ca_nodes.iter().map(|n| n as &dyn CaNode).collect();
        run_retrieve(token, biometric_guess, &self.pk_ca, &node_refs, &self.local_used, &self.params)
    }

    pub fn authenticate(
        &self,
        k: &Scalar,
        rho: &[u8; 32],
        op_hash: &[u8; 32],
        wallet_address: &[u8; 20],
    ) -> Result<bool, WalletError> {
        run_authenticate(k, rho, op_hash, self.chain_id, wallet_address, &self.spent_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biometric::{generate_biometric, generate_noisy_biometric};
    use bekd_crypto::hash::keccak256;

    #[test]
    fn full_enroll_retrieve_authenticate_cycle_succeeds() {
        let params = ProtocolParams::new(32, 4, 1, 3, 32).unwrap();
        let wallet = BekdWallet::new(params, 1);

        let biometric = generate_biometric(32, Some(10));
        let token = wallet.enroll(&biometric).unwrap();

        let guess = generate_noisy_biometric(&biometric, 0.0, 1.0, Some(11));
        let k = wallet.retrieve(&token, &guess).unwrap();

        let op_hash = keccak256(b"transfer 1 eth");
        let wallet_address = [7u8; 20];
        assert!(wallet.authenticate(&k, &token.tu.rho, &op_hash, &wallet_address).unwrap());
        assert!(!wallet.authenticate(&k, &token.tu.rho, &op_hash, &wallet_address).unwrap());
    }

    #[test]
    fn retrieval_failure_prevents_reaching_auth() {
        let params = ProtocolParams::new(32, 16, 1, 3, 32).unwrap();
        let wallet = BekdWallet::new(params, 1);
        let biometric = generate_biometric(32, Some(20));
        let token = wallet.enroll(&biometric).unwrap();

        let impostor = generate_biometric(32, Some(21));
        assert!(wallet.retrieve(&token, &impostor).is_err());
    }
}
