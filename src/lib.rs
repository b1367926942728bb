//! # UTXO Chain
//!
//! Bounded-memory block tree and UTXO ledger for a single node.
//!
//! The crate keeps one ledger snapshot per retained block, validates the
//! transactions of every incoming block against its parent's snapshot, and
//! tracks the highest block as the one to mine on. Blocks more than
//! `cut_off_age` levels below the best height are forgotten.
//!
//! ## Architecture
//!
//! - `utxo`: the UTXO set, one snapshot per block
//! - `transaction`: single transaction validity and unordered batch acceptance
//! - `block`: connecting a block to its parent's snapshot
//! - `chain`: the block tree, best block and pruning
//! - `mempool`: pending transactions awaiting a block
//! - `sync`: lock-serialised handle for concurrent callers
//!
//! Signature checking is delegated to a `SignatureVerifier`; the default is
//! ECDSA over secp256k1.
//!
//! ## Usage
//!
//! ```rust
//! use utxo_chain::{Block, BlockChain, Transaction, TransactionOutput, ValidationResult};
//!
//! let miner = vec![0x02; 33];
//! let genesis = Block::genesis(Transaction::new_coinbase(
//!     1,
//!     vec![TransactionOutput::new(100, miner.clone())],
//! ));
//! let genesis_hash = genesis.hash();
//! let mut chain = BlockChain::new(genesis).unwrap();
//!
//! let next = Block::new(
//!     genesis_hash,
//!     Transaction::new_coinbase(2, vec![TransactionOutput::new(25, miner)]),
//!     vec![],
//! );
//! assert_eq!(chain.add_block(next).unwrap(), ValidationResult::Valid);
//! assert_eq!(chain.best_height(), 2);
//! assert_eq!(chain.max_height_utxo_set().len(), 2);
//! ```

pub mod types;
pub mod constants;
pub mod config;
pub mod crypto;
pub mod utxo;
pub mod transaction;
pub mod block;
pub mod mempool;
pub mod chain;
pub mod sync;
pub mod error;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use types::*;
pub use constants::*;
pub use config::ChainConfig;
pub use crypto::{Secp256k1Verifier, SignatureVerifier};
pub use utxo::UtxoSet;
pub use mempool::TransactionPool;
pub use chain::BlockChain;
pub use sync::SharedBlockChain;
pub use error::{ConsensusError, Result};
