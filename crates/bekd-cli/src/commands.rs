//! CLI command implementations.

use std::path::Path;

use bekd_crypto::hash::keccak256;
use bekd_crypto::scalar::scalar_from_canonical_bytes;
use bekd_types::{ProtocolParams, Token};
use bekd_wallet::biometric::{generate_biometric, generate_noisy_biometric};
use bekd_wallet::enroll::enroll as run_enroll;
use bekd_wallet::retrieve::retrieve as run_retrieve;
use bekd_wallet::spent_set::InMemorySpentSet;
use bekd_wallet::WalletError;

use crate::error::CliError;
use crate::state::CaState;

type Result = std::result::Result<(), CliError>;

pub fn init(
    state_path: &Path,
    d: usize,
    tbio: usize,
    t: usize,
    n: usize,
    lambda_bytes: usize,
    chain_id: u64,
) -> Result {
    if state_path.exists() {
        return Err(CliError::Malformed(format!(
            "state file already exists: {}",
            state_path.display()
        )));
    }

    let params = ProtocolParams::new(d, tbio, t, n, lambda_bytes)?;
    let state = CaState::fresh(params, chain_id);
    state.save(state_path)?;

    println!("Initialized CA consortium at {}", state_path.display());
    println!("  d = {}, tbio = {}, t = {}, n = {}, quorum = {}", d, tbio, t, n, t + 1);
    println!("  chain id: {}", chain_id);
    println!("  CA public key: {}", hex::encode(bekd_crypto::point::serialize_point(&state.pk_ca)));
    Ok(())
}

pub fn enroll(state_path: &Path, out: &Path, seed: Option<u64>, store_biometric: bool) -> Result {
    let state = CaState::load(state_path)?;
    let biometric = generate_biometric(state.params.d, seed);

    let mut token = run_enroll(&state.master_secret.expose(), &state.pk_ca, &state.params, &biometric)?;
    if store_biometric {
        token.biometric = Some(biometric);
    }

    bekd_wallet::token_storage::save_token(&token, out)?;

    println!("Enrolled token: {}", out.display());
    println!("  rho: {}", hex::encode(token.tu.rho));
    println!("  features: {}", state.params.d);
    if store_biometric {
        println!("  biometric embedded for simulated retrieval");
    }
    Ok(())
}

pub fn retrieve(state_path: &Path, token_path: &Path, seed: Option<u64>, noise_std: f64, match_ratio: f64) -> Result {
    let state = CaState::load(state_path)?;
    let token = bekd_wallet::token_storage::load_token(token_path)?;

    let original = token.biometric.as_ref().ok_or_else(|| {
        CliError::Malformed(
            "token has no embedded biometric; re-enroll with --store-biometric to simulate retrieval".into(),
        )
    })?;
    let guess = generate_noisy_biometric(original, noise_std, match_ratio, seed);

    let local_used = InMemorySpentSet::new();
    let k = run_retrieve(&token, &guess, &state.pk_ca, &state.node_refs(), &local_used, &state.params)?;

    println!("Recovered key: {}", hex::encode(bekd_crypto::scalar::scalar_to_bytes(&k)));
    Ok(())
}

pub fn authenticate(state_path: &Path, token_path: &Path, key_hex: &str, op: &str, wallet_address_hex: &str) -> Result {
    let state = CaState::load(state_path)?;
    let token = bekd_wallet::token_storage::load_token(token_path)?;

    let key_bytes = hex::decode(key_hex)?;
    let key_bytes: [u8; 32] =
        key_bytes.try_into().map_err(|_| CliError::Malformed("key must be 32 bytes (64 hex chars)".into()))?;
    let k = scalar_from_canonical_bytes(&key_bytes)?;

    let wallet_address_bytes = hex::decode(wallet_address_hex)?;
    let wallet_address: [u8; 20] = wallet_address_bytes
        .try_into()
        .map_err(|_| CliError::Malformed("wallet address must be 20 bytes (40 hex chars)".into()))?;

    let op_hash = keccak256(op.as_bytes());
    let spent_set = InMemorySpentSet::new();
    let ok = bekd_wallet::auth::authenticate(&k, &token.tu.rho, &op_hash, state.chain_id, &wallet_address, &spent_set)?;

    if ok {
        println!("Authenticated: op {:?} authorized, token spent.", op);
        Ok(())
    } else {
        println!("Authentication rejected: token already spent.");
        Err(CliError::Wallet(WalletError::Replay))
    }
}

pub fn show_token(token_path: &Path) -> Result {
    let token: Token = bekd_wallet::token_storage::load_token(token_path)?;

    println!("Token: {}", token_path.display());
    println!("  rho: {}", hex::encode(token.tu.rho));
    println!("  c:   {}", hex::encode(token.tu.c));
    println!("  hA:  {}", token.tca.h_a);
    println!("  sigma: {} bytes", token.tca.sigma.len());
    println!("  sketch entries: {}", token.tca.a.len());
    println!("  tags: {}", token.tca.tags.len());
    println!("  biometric embedded: {}", token.biometric.is_some());
    Ok(())
}

pub fn status(state_path: &Path) -> Result {
    let state = CaState::load(state_path)?;
    println!("CA consortium: {}", state_path.display());
    println!("  d = {}, tbio = {}, t = {}, n = {}", state.params.d, state.params.tbio, state.params.t, state.params.n);
    println!("  quorum: {}", state.params.ca_quorum());
    println!("  lambda bytes: {}", state.params.lambda_bytes);
    println!("  chain id: {}", state.chain_id);
    println!("  CA public key: {}", hex::encode(bekd_crypto::point::serialize_point(&state.pk_ca)));
    println!("  nodes: {}", state.nodes.len());
    Ok(())
}
