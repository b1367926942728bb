//! Core ledger types for chain validation

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::double_sha256;

/// Hash type: 256-bit hash
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Natural number type
pub type Natural = u64;

/// Integer type
pub type Integer = i64;

/// OutPoint: identifies one output by (producing transaction hash, output index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutPoint {
    pub hash: Hash,
    pub index: Natural,
}

impl OutPoint {
    pub fn new(hash: Hash, index: Natural) -> Self {
        Self { hash, index }
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", hex::encode(self.hash), self.index)
    }
}

/// Transaction Input: the spent outpoint and the owner's signature over the
/// input's signable bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub prevout: OutPoint,
    pub signature: ByteString,
}

impl TransactionInput {
    /// Unsigned input; the signature is filled in once the transaction is complete.
    pub fn new(prevout: OutPoint) -> Self {
        Self {
            prevout,
            signature: Vec::new(),
        }
    }
}

/// Transaction Output: amount in base units and the owner's serialized public key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub value: Integer,
    pub owner: ByteString,
}

impl TransactionOutput {
    pub fn new(value: Integer, owner: ByteString) -> Self {
        Self { value, owner }
    }

    fn encode(&self, buf: &mut ByteString) {
        buf.extend_from_slice(&self.value.to_le_bytes());
        encode_bytes(buf, &self.owner);
    }
}

/// Transaction: ordered inputs, ordered outputs and a nonce.
///
/// A transaction without inputs is a coinbase. Coinbases carry the height of
/// the block that mints them in `nonce`, so two coinbases paying the same owner
/// in one lineage never share an outpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub nonce: Natural,
}

impl Transaction {
    pub fn new(inputs: Vec<TransactionInput>, outputs: Vec<TransactionOutput>) -> Self {
        Self {
            inputs,
            outputs,
            nonce: 0,
        }
    }

    pub fn new_coinbase(height: Natural, outputs: Vec<TransactionOutput>) -> Self {
        Self {
            inputs: Vec::new(),
            outputs,
            nonce: height,
        }
    }

    pub fn is_coinbase(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Double SHA-256 of the full encoding, signatures included.
    pub fn hash(&self) -> Hash {
        double_sha256(&self.serialize())
    }

    /// Canonical little-endian encoding of every field.
    pub fn serialize(&self) -> ByteString {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(self.inputs.len() as u64).to_le_bytes());
        for input in &self.inputs {
            encode_outpoint(&mut buf, &input.prevout);
            encode_bytes(&mut buf, &input.signature);
        }
        self.encode_outputs(&mut buf);
        buf.extend_from_slice(&self.nonce.to_le_bytes());
        buf
    }

    /// Message signed by the input at `index`: the index, that input's outpoint,
    /// every output and the nonce. No signature is ever part of it.
    ///
    /// Returns `None` if `index` is out of range.
    pub fn signable_bytes(&self, index: usize) -> Option<ByteString> {
        let input = self.inputs.get(index)?;
        let mut buf = Vec::new();
        buf.extend_from_slice(&(index as u64).to_le_bytes());
        encode_outpoint(&mut buf, &input.prevout);
        self.encode_outputs(&mut buf);
        buf.extend_from_slice(&self.nonce.to_le_bytes());
        Some(buf)
    }

    /// Outpoints this transaction creates once applied.
    pub fn outpoints(&self) -> impl Iterator<Item = OutPoint> + '_ {
        let hash = self.hash();
        (0..self.outputs.len()).map(move |i| OutPoint::new(hash, i as Natural))
    }

    fn encode_outputs(&self, buf: &mut ByteString) {
        buf.extend_from_slice(&(self.outputs.len() as u64).to_le_bytes());
        for output in &self.outputs {
            output.encode(buf);
        }
    }
}

/// Block: parent link, the minting coinbase and the ordered transaction list.
///
/// The genesis block is the only block without a parent. Heights are not part
/// of the block; the chain assigns them when the block is retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub prev_block_hash: Option<Hash>,
    pub coinbase: Transaction,
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub fn new(
        prev_block_hash: Hash,
        coinbase: Transaction,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            prev_block_hash: Some(prev_block_hash),
            coinbase,
            transactions,
        }
    }

    pub fn genesis(coinbase: Transaction) -> Self {
        Self {
            prev_block_hash: None,
            coinbase,
            transactions: Vec::new(),
        }
    }

    /// Double SHA-256 over the parent hash, the coinbase hash and every
    /// transaction hash in block order.
    pub fn hash(&self) -> Hash {
        let mut buf = Vec::with_capacity(1 + 32 * (self.transactions.len() + 2));
        match &self.prev_block_hash {
            Some(prev) => {
                buf.push(1);
                buf.extend_from_slice(prev);
            }
            None => buf.push(0),
        }
        buf.extend_from_slice(&self.coinbase.hash());
        for tx in &self.transactions {
            buf.extend_from_slice(&tx.hash());
        }
        double_sha256(&buf)
    }
}

/// Validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

fn encode_outpoint(buf: &mut ByteString, outpoint: &OutPoint) {
    buf.extend_from_slice(&outpoint.hash);
    buf.extend_from_slice(&outpoint.index.to_le_bytes());
}

fn encode_bytes(buf: &mut ByteString, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
    buf.extend_from_slice(bytes);
}
