//! Chain configuration

use serde::{Deserialize, Serialize};

use crate::constants::CUT_OFF_AGE;
use crate::error::{ConsensusError, Result};
use crate::types::Natural;

/// Tunables of a `BlockChain`. Missing JSON fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChainConfig {
    /// Blocks more than this many levels below the best height are forgotten
    /// and can no longer be extended.
    pub cut_off_age: Natural,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            cut_off_age: CUT_OFF_AGE,
        }
    }
}

impl ChainConfig {
    pub fn new(cut_off_age: Natural) -> Self {
        Self { cut_off_age }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cut_off_age == 0 {
            return Err(ConsensusError::InvalidConfig(
                "cut_off_age must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
