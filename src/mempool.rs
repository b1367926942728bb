//! Pending transaction pool

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::types::*;

/// Holding area for transactions not yet confirmed.
///
/// Nothing is validated on insertion; validation happens when a block
/// carrying the transaction is connected or when a miner selects from the
/// pool. Iteration follows first insertion so that selection is reproducible.
/// Confirmed transactions are not removed here; that is left to the miner.
#[derive(Debug, Clone, Default)]
pub struct TransactionPool {
    transactions: IndexMap<Hash, Transaction>,
}

impl TransactionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `tx` unless a transaction with the same hash is present.
    /// Returns whether it was new.
    pub fn add(&mut self, tx: Transaction) -> bool {
        match self.transactions.entry(tx.hash()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(tx);
                true
            }
        }
    }

    pub fn contains(&self, tx_id: &Hash) -> bool {
        self.transactions.contains_key(tx_id)
    }

    pub fn get(&self, tx_id: &Hash) -> Option<&Transaction> {
        self.transactions.get(tx_id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.values()
    }
}
