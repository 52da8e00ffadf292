//! Protocol parameters, frozen at enroll time.

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// `(d, tbio, t, n, lambda_bytes)` — feature count, sketch threshold, CA
/// threshold, CA count, and tag length. CA quorum size is `t + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParams {
    pub d: usize,
    pub tbio: usize,
    pub t: usize,
    pub n: usize,
    pub lambda_bytes: usize,
}

impl ProtocolParams {
    pub fn new(d: usize, tbio: usize, t: usize, n: usize, lambda_bytes: usize) -> Result<Self, TypesError> {
        let params = Self { d, tbio, t, n, lambda_bytes };
        params.validate()?;
        Ok(params)
    }

    /// CA quorum size required to reconstruct M (C7).
    pub fn ca_quorum(&self) -> usize {
        self.t + 1
    }

    pub fn validate(&self) -> Result<(), TypesError> {
        if self.d == 0 {
            return Err(TypesError::InvalidParams("d must be at least 1"));
        }
        if self.tbio == 0 || self.tbio > self.d {
            return Err(TypesError::InvalidParams("tbio must be in [1, d]"));
        }
        if self.n == 0 {
            return Err(TypesError::InvalidParams("n must be at least 1"));
        }
        if self.ca_quorum() > self.n {
            return Err(TypesError::InvalidParams("t + 1 must not exceed n"));
        }
        if self.lambda_bytes == 0 || self.lambda_bytes > 32 {
            return Err(TypesError::InvalidParams("lambda_bytes must be in [1, 32]"));
        }
        Ok(())
    }
}

/// Source's defaults: d=128, tbio=4, t=1 (quorum 2), n=3, lambda=32.
impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            d: 128,
            tbio: 4,
            t: 1,
            n: 3,
            lambda_bytes: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        ProtocolParams::default().validate().unwrap();
    }

    #[test]
    fn quorum_exceeding_n_is_rejected() {
        assert!(ProtocolParams::new(128, 4, 5, 3, 32).is_err());
    }

    #[test]
    fn tbio_above_d_is_rejected() {
        assert!(ProtocolParams::new(4, 5, 1, 3, 32).is_err());
    }

    #[test]
    fn oversized_lambda_is_rejected() {
        assert!(ProtocolParams::new(128, 4, 1, 3, 64).is_err());
    }

    #[test]
    fn ca_quorum_is_t_plus_one() {
        let p = ProtocolParams::default();
        assert_eq!(p.ca_quorum(), 2);
    }
}
