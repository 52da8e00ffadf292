//! On-disk CA consortium state: the sandbox's stand-in for a real
//! deployment where the wallet binary never sees `sk_CA` and CA nodes
//! run as separate services. Persisting shares (and, for this combined
//! demo role, the master secret itself) to a local JSON file is what
//! lets `enroll`, `retrieve`, and `authenticate` run as separate
//! process invocations against the same simulated consortium.

use std::path::Path;

use bekd_ca::{CaNode, CaShare, DkgOutput, LocalCaNode};
use bekd_crypto::point::{deserialize_point, serialize_point};
use bekd_crypto::scalar::{scalar_from_canonical_bytes, scalar_to_bytes, SecretScalar};
use bekd_types::ProtocolParams;
use k256::ProjectivePoint;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

#[derive(Serialize, Deserialize)]
struct ShareFile {
    index: u32,
    share: String,
}

#[derive(Serialize, Deserialize)]
struct StateFile {
    params: ProtocolParams,
    chain_id: u64,
    pk_ca: String,
    master_secret: String,
    shares: Vec<ShareFile>,
}

pub struct CaState {
    pub params: ProtocolParams,
    pub chain_id: u64,
    pub master_secret: SecretScalar,
    pub pk_ca: ProjectivePoint,
    pub nodes: Vec<LocalCaNode>,
}

impl CaState {
    pub fn fresh(params: ProtocolParams, chain_id: u64) -> Self {
        let dkg = bekd_ca::run_simulated_dkg(params.n, params.t);
        Self::from_dkg(params, chain_id, dkg)
    }

    fn from_dkg(params: ProtocolParams, chain_id: u64, dkg: DkgOutput) -> Self {
        let nodes = dkg.shares.into_iter().map(LocalCaNode::new).collect();
        Self { params, chain_id, master_secret: dkg.master_secret, pk_ca: dkg.public_key, nodes }
    }

    pub fn node_refs(&self) -> Vec<&dyn bekd_ca::CaNode> {
        self.nodes.iter().map(|n| n as &dyn bekd_ca::CaNode).collect()
    }

    pub fn save(&self, path: &Path) -> Result<(), CliError> {
        let shares: Vec<ShareFile> = self
            .nodes
            .iter()
            .map(|n| ShareFile { index: n.index(), share: hex::encode(scalar_to_bytes(&n.share_value())) })
            .collect();
        let file = StateFile {
            params: self.params,
            chain_id: self.chain_id,
            pk_ca: hex::encode(serialize_point(&self.pk_ca)),
            master_secret: hex::encode(scalar_to_bytes(&self.master_secret.expose())),
            shares,
        };
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(path, json).map_err(CliError::Io)
    }

    pub fn load(path: &Path) -> Result<Self, CliError> {
        let contents = std::fs::read_to_string(path).map_err(CliError::Io)?;
        let file: StateFile = serde_json::from_str(&contents)?;

        let mut pk_bytes = [0u8; bekd_crypto::point::POINT_LEN];
        pk_bytes.copy_from_slice(&hex::decode(&file.pk_ca)?);
        let pk_ca = deserialize_point(&pk_bytes)?;

        let master_secret = SecretScalar::new(&scalar_from_canonical_bytes(&hex_to_32(&file.master_secret)?)?);

        let nodes = file
            .shares
            .into_iter()
            .map(|s| -> Result<LocalCaNode, CliError> {
                let scalar = scalar_from_canonical_bytes(&hex_to_32(&s.share)?)?;
                Ok(LocalCaNode::new(CaShare::new(s.index, scalar)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { params: file.params, chain_id: file.chain_id, master_secret, pk_ca, nodes })
    }
}

fn hex_to_32(s: &str) -> Result<[u8; 32], CliError> {
    let bytes = hex::decode(s)?;
    bytes.try_into().map_err(|_| CliError::Malformed("expected 32 bytes".into()))
}
