//! Error types for chain validation
//!
//! Expected rejections (bad transactions, stale forks, malformed blocks) are
//! reported as `ValidationResult::Invalid`. The variants here mean an
//! invariant of the ledger or the chain was broken, or the caller handed in
//! something the chain cannot be built from.

use thiserror::Error;

use crate::types::OutPoint;

#[derive(Error, Debug)]
pub enum ConsensusError {
    #[error("UTXO already present: {0}")]
    UtxoCollision(OutPoint),

    #[error("Block validation failed: {0}")]
    BlockValidation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConsensusError>;
