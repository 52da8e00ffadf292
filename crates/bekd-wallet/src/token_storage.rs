//! Token persistence: a single JSON file on disk, the reference
//! implementation's storage model carried forward unchanged.

use std::path::Path;

use bekd_types::Token;

use crate::error::WalletError;

pub const DEFAULT_TOKEN_PATH: &str = ".token_store.json";

pub fn save_token(token: &Token, path: &Path) -> Result<(), WalletError> {
    let json = serde_json::to_string_pretty(token).map_err(|e| WalletError::Storage(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| WalletError::Storage(e.to_string()))
}

pub fn load_token(path: &Path) -> Result<Token, WalletError> {
    let contents = std::fs::read_to_string(path).map_err(|e| WalletError::Storage(e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| WalletError::Storage(e.to_string()))
}

pub fn delete_token(path: &Path) -> Result<(), WalletError> {
    if path.exists() {
        std::fs::remove_file(path).map_err(|e| WalletError::Storage(e.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biometric::generate_biometric;
    use crate::enroll::enroll;
    use bekd_crypto::point::point_mul_base;
    use bekd_types::ProtocolParams;

    #[test]
    fn token_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");

        let sk_ca = bekd_crypto::scalar::scalar_random();
        let pk_ca = point_mul_base(&sk_ca);
        let params = ProtocolParams::new(8, 2, 1, 3, 32).unwrap();
        let biometric = generate_biometric(8, Some(1));
        let token = enroll(&sk_ca, &pk_ca, &params, &biometric).unwrap();

        save_token(&token, &path).unwrap();
        let loaded = load_token(&path).unwrap();
        assert_eq!(token.tu.rho, loaded.tu.rho);
        assert_eq!(token.tca.tags, loaded.tca.tags);
    }

    #[test]
    fn delete_is_idempotent_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(delete_token(&path).is_ok());
    }

    #[test]
    fn delete_removes_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, "{}").unwrap();
        delete_token(&path).unwrap();
        assert!(!path.exists());
    }
}
