//! Block tree with per-fork ledger snapshots and bounded retention

use log::{debug, info, trace};
use std::collections::HashMap;
use std::sync::Arc;

use crate::block::{apply_transaction, connect_block};
use crate::config::ChainConfig;
use crate::constants::GENESIS_HEIGHT;
use crate::crypto::{Secp256k1Verifier, SignatureVerifier};
use crate::error::{ConsensusError, Result};
use crate::mempool::TransactionPool;
use crate::transaction::handle_txs;
use crate::types::*;
use crate::utxo::UtxoSet;

/// Everything retained for one block. Kept as a single record so height,
/// snapshot and block can never drift apart.
#[derive(Debug)]
struct BlockRecord {
    block: Block,
    height: Natural,
    // Ledger state after this block; never mutated once published.
    utxo_set: Arc<UtxoSet>,
    // Arrival order among retained blocks, genesis is 0.
    sequence: u64,
}

/// The block tree rooted at genesis, reduced to the window of blocks that can
/// still be extended.
///
/// Any path from genesis to a leaf is a fork with its own UTXO snapshot. The
/// best block is the highest one; among blocks of equal height the first to
/// be retained stays best.
///
/// A block at height h is only accepted while h > best_height − cut_off_age.
/// Whenever the best height advances, every block that can no longer be
/// extended under that rule is pruned together with its snapshot. Genesis is
/// never pruned.
pub struct BlockChain<V = Secp256k1Verifier> {
    config: ChainConfig,
    verifier: V,
    records: HashMap<Hash, BlockRecord>,
    genesis_hash: Hash,
    best_hash: Hash,
    best_height: Natural,
    pool: TransactionPool,
    next_sequence: u64,
}

impl BlockChain<Secp256k1Verifier> {
    /// Chain with default configuration verifying secp256k1 signatures.
    pub fn new(genesis: Block) -> Result<Self> {
        Self::with_config(genesis, ChainConfig::default(), Secp256k1Verifier::new())
    }
}

impl<V: SignatureVerifier> BlockChain<V> {
    /// Builds the chain from a trusted genesis block. Its coinbase outputs seed
    /// the first snapshot; a genesis that cannot seed one is an error.
    pub fn with_config(genesis: Block, config: ChainConfig, verifier: V) -> Result<Self> {
        config.validate()?;

        if !genesis.coinbase.is_coinbase() {
            return Err(ConsensusError::BlockValidation(
                "Genesis coinbase must not have inputs".to_string(),
            ));
        }
        if !genesis.transactions.is_empty() {
            return Err(ConsensusError::BlockValidation(
                "Genesis block must only carry its coinbase".to_string(),
            ));
        }

        let genesis_hash = genesis.hash();
        let utxo_set = apply_transaction(&genesis.coinbase, UtxoSet::new())?;

        let mut pool = TransactionPool::new();
        pool.add(genesis.coinbase.clone());

        let mut records = HashMap::new();
        records.insert(
            genesis_hash,
            BlockRecord {
                block: genesis,
                height: GENESIS_HEIGHT,
                utxo_set: Arc::new(utxo_set),
                sequence: 0,
            },
        );

        info!(
            "Initialized chain at genesis {} (cut_off_age {})",
            hex::encode(genesis_hash),
            config.cut_off_age
        );

        Ok(Self {
            config,
            verifier,
            records,
            genesis_hash,
            best_hash: genesis_hash,
            best_height: GENESIS_HEIGHT,
            pool,
            next_sequence: 1,
        })
    }

    /// Connects `block` to its retained parent.
    ///
    /// Returns `Invalid` without touching any state if the block has no
    /// parent, is already retained, extends a block that is not retained,
    /// sits too deep below the best height, or carries a transaction that is
    /// invalid against its parent's ledger. `Err` is reserved for broken
    /// ledger invariants.
    pub fn add_block(&mut self, block: Block) -> Result<ValidationResult> {
        let block_hash = block.hash();

        let parent_hash = match block.prev_block_hash {
            Some(hash) => hash,
            None => return Ok(self.reject(&block_hash, "Block has no parent".to_string())),
        };

        if self.records.contains_key(&block_hash) {
            return Ok(self.reject(&block_hash, "Block already retained".to_string()));
        }

        let (parent_height, parent_utxo_set) = match self.records.get(&parent_hash) {
            Some(parent) => (parent.height, Arc::clone(&parent.utxo_set)),
            None => {
                return Ok(self.reject(
                    &block_hash,
                    format!("Parent {} is not retained", hex::encode(parent_hash)),
                ))
            }
        };

        let height = parent_height + 1;
        if height.saturating_add(self.config.cut_off_age) <= self.best_height {
            return Ok(self.reject(
                &block_hash,
                format!(
                    "Height {} is more than {} below best height {}",
                    height, self.config.cut_off_age, self.best_height
                ),
            ));
        }
        // A retained parent is never above the best block.
        debug_assert!(height <= self.best_height + 1);

        let (result, utxo_set) =
            connect_block(&block, UtxoSet::clone(&parent_utxo_set), &self.verifier)?;
        if let ValidationResult::Invalid(reason) = result {
            return Ok(self.reject(&block_hash, reason));
        }

        for tx in &block.transactions {
            self.pool.add(tx.clone());
        }
        self.pool.add(block.coinbase.clone());

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.records.insert(
            block_hash,
            BlockRecord {
                block,
                height,
                utxo_set: Arc::new(utxo_set),
                sequence,
            },
        );
        debug!(
            "Retained block {} at height {} (#{})",
            hex::encode(block_hash),
            height,
            sequence
        );

        if height > self.best_height {
            info!("New best block {} at height {}", hex::encode(block_hash), height);
            self.best_hash = block_hash;
            self.best_height = height;
            self.prune();
        }

        Ok(ValidationResult::Valid)
    }

    /// Adds a transaction to the pending pool without validating it.
    pub fn add_transaction(&mut self, tx: Transaction) {
        if !self.pool.add(tx) {
            trace!("Transaction already pending");
        }
    }

    /// The block to mine on top of.
    pub fn max_height_block(&self) -> &Block {
        &self.best_record().block
    }

    /// Ledger after the best block.
    pub fn max_height_utxo_set(&self) -> Arc<UtxoSet> {
        Arc::clone(&self.best_record().utxo_set)
    }

    pub fn transaction_pool(&self) -> &TransactionPool {
        &self.pool
    }

    /// Mutually valid pending transactions for a block on top of the best
    /// block, in the order they would be applied.
    pub fn candidate_transactions(&self) -> Result<Vec<Transaction>> {
        let candidates: Vec<Transaction> = self
            .pool
            .transactions()
            .filter(|tx| !tx.is_coinbase())
            .cloned()
            .collect();
        let utxo_set = UtxoSet::clone(&self.best_record().utxo_set);
        let (accepted, _) = handle_txs(&candidates, utxo_set, &self.verifier)?;
        Ok(accepted)
    }

    pub fn best_height(&self) -> Natural {
        self.best_height
    }

    pub fn genesis_hash(&self) -> &Hash {
        &self.genesis_hash
    }

    /// Height of a retained block.
    pub fn height(&self, block_hash: &Hash) -> Option<Natural> {
        self.records.get(block_hash).map(|record| record.height)
    }

    /// Ledger after a retained block.
    pub fn utxo_set(&self, block_hash: &Hash) -> Option<Arc<UtxoSet>> {
        self.records
            .get(block_hash)
            .map(|record| Arc::clone(&record.utxo_set))
    }

    pub fn is_retained(&self, block_hash: &Hash) -> bool {
        self.records.contains_key(block_hash)
    }

    pub fn retained_count(&self) -> usize {
        self.records.len()
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    fn best_record(&self) -> &BlockRecord {
        // The best block is at the top of the window and is never pruned.
        &self.records[&self.best_hash]
    }

    fn reject(&self, block_hash: &Hash, reason: String) -> ValidationResult {
        debug!("Rejected block {}: {}", hex::encode(block_hash), reason);
        ValidationResult::Invalid(reason)
    }

    /// Drops every block whose children would fail the height check, i.e.
    /// height + cut_off_age < best_height.
    fn prune(&mut self) {
        let cut_off_age = self.config.cut_off_age;
        let best_height = self.best_height;
        let genesis_hash = self.genesis_hash;

        let before = self.records.len();
        self.records.retain(|hash, record| {
            let keep =
                *hash == genesis_hash || record.height.saturating_add(cut_off_age) >= best_height;
            if !keep {
                trace!(
                    "Pruning block {} at height {} (#{})",
                    hex::encode(hash),
                    record.height,
                    record.sequence
                );
            }
            keep
        });

        let pruned = before - self.records.len();
        if pruned > 0 {
            debug!(
                "Pruned {} block(s) below height {}",
                pruned,
                best_height.saturating_sub(cut_off_age)
            );
        }
    }
}
