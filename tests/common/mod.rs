//! Keys, signing and block builders shared by the integration tests
#![allow(dead_code)]

use secp256k1::{All, Message, PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};
use utxo_chain::*;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A key pair standing in for a wallet.
pub struct Wallet {
    secp: Secp256k1<All>,
    secret: SecretKey,
}

impl Wallet {
    pub fn new(seed: u8) -> Self {
        Self {
            secp: Secp256k1::new(),
            secret: SecretKey::from_slice(&[seed; 32]).unwrap(),
        }
    }

    pub fn owner(&self) -> ByteString {
        PublicKey::from_secret_key(&self.secp, &self.secret)
            .serialize()
            .to_vec()
    }

    pub fn pay(&self, value: Integer) -> TransactionOutput {
        TransactionOutput::new(value, self.owner())
    }

    pub fn sign(&self, message: &[u8]) -> ByteString {
        let digest = Sha256::digest(message);
        let message = Message::from_digest_slice(&digest).unwrap();
        self.secp
            .sign_ecdsa(&message, &self.secret)
            .serialize_der()
            .to_vec()
    }

    /// Transaction spending `prevouts`, all owned by this wallet.
    pub fn spend(&self, prevouts: &[OutPoint], outputs: Vec<TransactionOutput>) -> Transaction {
        let inputs = prevouts.iter().copied().map(TransactionInput::new).collect();
        let mut tx = Transaction::new(inputs, outputs);
        for i in 0..tx.inputs.len() {
            let message = tx.signable_bytes(i).unwrap();
            tx.inputs[i].signature = self.sign(&message);
        }
        tx
    }
}

/// Genesis paying `value` to `wallet`, and the outpoint holding it.
pub fn funded_genesis(wallet: &Wallet, value: Integer) -> (Block, OutPoint) {
    let coinbase = Transaction::new_coinbase(GENESIS_HEIGHT, vec![wallet.pay(value)]);
    let outpoint = OutPoint::new(coinbase.hash(), 0);
    (Block::genesis(coinbase), outpoint)
}

/// Empty block on `parent` at `height`; `tag` keeps siblings distinct.
pub fn empty_block(parent: Hash, height: Natural, tag: u8) -> Block {
    let reward = TransactionOutput::new(25, vec![tag; 33]);
    let coinbase = Transaction::new_coinbase(height, vec![reward]);
    Block::new(parent, coinbase, vec![])
}
