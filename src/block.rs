//! Block connection against a parent ledger snapshot

use crate::crypto::SignatureVerifier;
use crate::error::Result;
use crate::transaction::check_tx_inputs;
use crate::types::*;
use crate::utxo::UtxoSet;

/// ConnectBlock: ℬ × 𝒰𝒮 → {valid, invalid} × 𝒰𝒮
///
/// For block b = (parent, coinbase, txs) on top of UTXO set us:
/// 1. The coinbase must have no inputs
/// 2. For each tx ∈ txs in block order: tx must be valid against the set
///    produced by the transactions before it, and is then applied
/// 3. The coinbase outputs must not already be unspent
/// 4. Add the coinbase outputs: us' = us ∪ {(coinbase.id, i) ↦ coinbase.outputs[i]}
/// 5. Return (valid, us')
///
/// The returned set is only meaningful when the result is valid; callers keep
/// the parent snapshot untouched and discard it otherwise.
pub fn connect_block<V>(
    block: &Block,
    mut utxo_set: UtxoSet,
    verifier: &V,
) -> Result<(ValidationResult, UtxoSet)>
where
    V: SignatureVerifier + ?Sized,
{
    // 1. Coinbase shape
    if !block.coinbase.is_coinbase() {
        return Ok((
            ValidationResult::Invalid("Coinbase must not have inputs".to_string()),
            utxo_set,
        ));
    }

    // 2. Transactions, sequentially
    for (i, tx) in block.transactions.iter().enumerate() {
        if let (ValidationResult::Invalid(reason), _) = check_tx_inputs(tx, &utxo_set, verifier) {
            let reason = format!("Invalid transaction at index {}: {}", i, reason);
            return Ok((ValidationResult::Invalid(reason), utxo_set));
        }
        utxo_set = apply_transaction(tx, utxo_set)?;
    }

    // 3. Coinbase uniqueness
    if let Some(existing) = block.coinbase.outpoints().find(|o| utxo_set.contains(o)) {
        return Ok((
            ValidationResult::Invalid(format!("Coinbase output {} already unspent", existing)),
            utxo_set,
        ));
    }

    // 4. Mint
    utxo_set = apply_transaction(&block.coinbase, utxo_set)?;

    Ok((ValidationResult::Valid, utxo_set))
}

/// ApplyTransaction: 𝒯𝒳 × 𝒰𝒮 → 𝒰𝒮
///
/// us' = (us \ {i.prevout : i ∈ tx.inputs}) ∪ {(tx.id, i) ↦ tx.outputs[i] : i ∈ [0, |tx.outputs|)}
///
/// The transaction must already be valid against `utxo_set`. An output key
/// that is still unspent is a `UtxoCollision`.
pub fn apply_transaction(tx: &Transaction, mut utxo_set: UtxoSet) -> Result<UtxoSet> {
    for input in &tx.inputs {
        utxo_set.remove(&input.prevout);
    }

    for (outpoint, output) in tx.outpoints().zip(&tx.outputs) {
        utxo_set.add(outpoint, output.clone())?;
    }

    Ok(utxo_set)
}
