//! Hashing and signature verification

use bitcoin_hashes::{sha256d, Hash as BitcoinHash, HashEngine};
use secp256k1::{ecdsa::Signature, Message, PublicKey, Secp256k1, VerifyOnly};
use sha2::{Digest, Sha256};

use crate::types::Hash;

/// Signature verification capability supplied by the environment.
///
/// `owner` is the identity recorded in the spent output, `message` the
/// signable bytes of the spending input. Implementations must be pure.
pub trait SignatureVerifier {
    fn verify(&self, owner: &[u8], message: &[u8], signature: &[u8]) -> bool;
}

impl<F> SignatureVerifier for F
where
    F: Fn(&[u8], &[u8], &[u8]) -> bool,
{
    fn verify(&self, owner: &[u8], message: &[u8], signature: &[u8]) -> bool {
        self(owner, message, signature)
    }
}

/// ECDSA over secp256k1: `owner` is a SEC1 public key, `signature` is DER and
/// the signed digest is SHA-256 of the message.
pub struct Secp256k1Verifier {
    secp: Secp256k1<VerifyOnly>,
}

impl Secp256k1Verifier {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::verification_only(),
        }
    }
}

impl Default for Secp256k1Verifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureVerifier for Secp256k1Verifier {
    fn verify(&self, owner: &[u8], message: &[u8], signature: &[u8]) -> bool {
        let pubkey = match PublicKey::from_slice(owner) {
            Ok(pk) => pk,
            Err(_) => return false,
        };

        let signature = match Signature::from_der(signature) {
            Ok(sig) => sig,
            Err(_) => return false,
        };

        let message = match Message::from_digest_slice(&sha256(message)) {
            Ok(msg) => msg,
            Err(_) => return false,
        };

        self.secp.verify_ecdsa(&message, &signature, &pubkey).is_ok()
    }
}

/// SHA256(SHA256(data)), used for transaction and block identifiers
pub fn double_sha256(data: &[u8]) -> Hash {
    let mut engine = sha256d::Hash::engine();
    engine.input(data);
    sha256d::Hash::from_engine(engine).into_inner()
}

/// Single SHA256, the digest handed to ECDSA
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}
