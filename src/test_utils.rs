//! Key and transaction helpers shared by the unit tests

use secp256k1::{All, Message, PublicKey, Secp256k1, SecretKey};

use crate::crypto::sha256;
use crate::types::*;

pub struct TestKey {
    secp: Secp256k1<All>,
    secret: SecretKey,
}

impl TestKey {
    pub fn new(seed: u8) -> Self {
        let secp = Secp256k1::new();
        let secret = SecretKey::from_slice(&[seed; 32]).unwrap();
        Self { secp, secret }
    }

    pub fn owner(&self) -> ByteString {
        PublicKey::from_secret_key(&self.secp, &self.secret)
            .serialize()
            .to_vec()
    }

    pub fn sign(&self, message: &[u8]) -> ByteString {
        let message = Message::from_digest_slice(&sha256(message)).unwrap();
        self.secp
            .sign_ecdsa(&message, &self.secret)
            .serialize_der()
            .to_vec()
    }
}

/// Signs input `i` with `keys[i]`.
pub fn sign_inputs(tx: &mut Transaction, keys: &[&TestKey]) {
    for (i, key) in keys.iter().enumerate() {
        let message = tx.signable_bytes(i).unwrap();
        tx.inputs[i].signature = key.sign(&message);
    }
}

/// Transaction spending `prevouts` (all owned by `key`) into `outputs`.
pub fn signed_tx(
    key: &TestKey,
    prevouts: &[OutPoint],
    outputs: Vec<TransactionOutput>,
) -> Transaction {
    let inputs = prevouts.iter().copied().map(TransactionInput::new).collect();
    let mut tx = Transaction::new(inputs, outputs);
    let keys: Vec<&TestKey> = prevouts.iter().map(|_| key).collect();
    sign_inputs(&mut tx, &keys);
    tx
}
