//! UTXO set: the ledger state after a block

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ConsensusError, Result};
use crate::types::*;

/// UTXO Set: 𝒰𝒮 = 𝒪 → 𝒯
///
/// Cloning yields an independent set; the chain relies on this to derive a
/// block's snapshot from its parent's without touching sibling forks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoSet {
    utxos: HashMap<OutPoint, TransactionOutput>,
}

impl UtxoSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new unspent output. An existing entry for `outpoint` means two
    /// outputs were issued under one key, which is never overwritten.
    pub fn add(&mut self, outpoint: OutPoint, output: TransactionOutput) -> Result<()> {
        if self.utxos.contains_key(&outpoint) {
            return Err(ConsensusError::UtxoCollision(outpoint));
        }
        self.utxos.insert(outpoint, output);
        Ok(())
    }

    pub fn remove(&mut self, outpoint: &OutPoint) -> Option<TransactionOutput> {
        self.utxos.remove(outpoint)
    }

    pub fn contains(&self, outpoint: &OutPoint) -> bool {
        self.utxos.contains_key(outpoint)
    }

    pub fn get(&self, outpoint: &OutPoint) -> Option<&TransactionOutput> {
        self.utxos.get(outpoint)
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OutPoint, &TransactionOutput)> {
        self.utxos.iter()
    }

    /// Sum of all unspent values. Widened so that no set can overflow it.
    pub fn total_value(&self) -> i128 {
        self.utxos.values().map(|o| o.value as i128).sum()
    }
}

impl FromIterator<(OutPoint, TransactionOutput)> for UtxoSet {
    /// Later entries replace earlier ones under the same key.
    fn from_iter<I: IntoIterator<Item = (OutPoint, TransactionOutput)>>(iter: I) -> Self {
        Self {
            utxos: iter.into_iter().collect(),
        }
    }
}
