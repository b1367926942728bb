//! Thread-safe handle around a `BlockChain`

use parking_lot::RwLock;
use std::sync::Arc;

use crate::chain::BlockChain;
use crate::crypto::{Secp256k1Verifier, SignatureVerifier};
use crate::error::Result;
use crate::mempool::TransactionPool;
use crate::types::*;
use crate::utxo::UtxoSet;

/// Cloneable handle for callers on several threads, e.g. one per peer
/// delivering blocks.
///
/// Every mutation holds the write lock for the whole operation, so pruning and
/// the best-block update of one `add_block` are never interleaved with another.
/// Readers get owned values and never hold the lock after returning.
pub struct SharedBlockChain<V = Secp256k1Verifier> {
    inner: Arc<RwLock<BlockChain<V>>>,
}

impl<V> Clone for SharedBlockChain<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: SignatureVerifier> SharedBlockChain<V> {
    pub fn new(chain: BlockChain<V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(chain)),
        }
    }

    pub fn add_block(&self, block: Block) -> Result<ValidationResult> {
        self.inner.write().add_block(block)
    }

    pub fn add_transaction(&self, tx: Transaction) {
        self.inner.write().add_transaction(tx)
    }

    pub fn max_height_block(&self) -> Block {
        self.inner.read().max_height_block().clone()
    }

    pub fn max_height_utxo_set(&self) -> Arc<UtxoSet> {
        self.inner.read().max_height_utxo_set()
    }

    pub fn transaction_pool(&self) -> TransactionPool {
        self.inner.read().transaction_pool().clone()
    }

    pub fn best_height(&self) -> Natural {
        self.inner.read().best_height()
    }

    /// Runs `f` under the read lock for queries needing a consistent view of
    /// several accessors.
    pub fn read<R>(&self, f: impl FnOnce(&BlockChain<V>) -> R) -> R {
        let chain = self.inner.read();
        f(&*chain)
    }
}
