//! Transaction validation and batch acceptance

use log::{debug, trace};
use std::collections::HashSet;

use crate::block::apply_transaction;
use crate::crypto::SignatureVerifier;
use crate::error::Result;
use crate::types::*;
use crate::utxo::UtxoSet;

/// IsValidTx: 𝒯𝒳 × 𝒰𝒮 → {valid, invalid}
///
/// A transaction tx is valid against UTXO set us if and only if:
/// 1. ∀i ∈ tx.inputs: i.prevout ∈ us
/// 2. ∀i ∈ tx.inputs: verify(us(i.prevout).owner, signable(tx, i), i.signature)
/// 3. no prevout is referenced by two inputs of tx
/// 4. ∀o ∈ tx.outputs: o.value ≥ 0
/// 5. Σᵢ us(i.prevout).value ≥ Σₒ o.value
pub fn is_valid_tx<V>(tx: &Transaction, utxo_set: &UtxoSet, verifier: &V) -> bool
where
    V: SignatureVerifier + ?Sized,
{
    check_tx_inputs(tx, utxo_set, verifier).0.is_valid()
}

/// CheckTxInputs: 𝒯𝒳 × 𝒰𝒮 → {valid, invalid} × ℤ
///
/// Runs every rule of `is_valid_tx` and reports the first violation. For a
/// valid transaction the second element is its fee, Σ inputs − Σ outputs;
/// it is 0 otherwise.
///
/// A transaction whose outputs already exist in `utxo_set` is also invalid:
/// applying it would issue a second output under an unspent key.
pub fn check_tx_inputs<V>(
    tx: &Transaction,
    utxo_set: &UtxoSet,
    verifier: &V,
) -> (ValidationResult, Integer)
where
    V: SignatureVerifier + ?Sized,
{
    let mut spent = HashSet::with_capacity(tx.inputs.len());
    let mut total_input_value: Integer = 0;

    for (i, input) in tx.inputs.iter().enumerate() {
        if !spent.insert(input.prevout) {
            return invalid(format!("Input {} spends {} twice", i, input.prevout));
        }

        let utxo = match utxo_set.get(&input.prevout) {
            Some(utxo) => utxo,
            None => return invalid(format!("Input {} not found in UTXO set", i)),
        };

        let signed = tx
            .signable_bytes(i)
            .map_or(false, |message| verifier.verify(&utxo.owner, &message, &input.signature));
        if !signed {
            return invalid(format!("Invalid signature at input {}", i));
        }

        total_input_value = match total_input_value.checked_add(utxo.value) {
            Some(total) => total,
            None => return invalid("Input value overflow".to_string()),
        };
    }

    let mut total_output_value: Integer = 0;
    for (i, output) in tx.outputs.iter().enumerate() {
        if output.value < 0 {
            return invalid(format!("Negative output value {} at index {}", output.value, i));
        }
        total_output_value = match total_output_value.checked_add(output.value) {
            Some(total) => total,
            None => return invalid("Output value overflow".to_string()),
        };
    }

    if total_input_value < total_output_value {
        return invalid("Insufficient input value".to_string());
    }

    if let Some(existing) = tx.outpoints().find(|outpoint| utxo_set.contains(outpoint)) {
        return invalid(format!("Output {} already unspent", existing));
    }

    (ValidationResult::Valid, total_input_value - total_output_value)
}

/// HandleTxs: 𝒯𝒳* × 𝒰𝒮 → 𝒯𝒳* × 𝒰𝒮
///
/// Accepts a mutually valid subset of an unordered batch:
/// 1. Pass over every unprocessed candidate in order
/// 2. A candidate whose inputs all resolve in the current set is processed:
///    if valid it is applied at once and appended to the accepted list,
///    otherwise it is discarded for good
/// 3. Repeat until a pass processes nothing
///
/// Candidates whose inputs never resolve (missing or rejected producers,
/// dependency cycles) are dropped silently. The result depends on candidate
/// order and need not be the largest valid subset.
pub fn handle_txs<V>(
    candidates: &[Transaction],
    mut utxo_set: UtxoSet,
    verifier: &V,
) -> Result<(Vec<Transaction>, UtxoSet)>
where
    V: SignatureVerifier + ?Sized,
{
    let mut processed = vec![false; candidates.len()];
    let mut accepted = Vec::new();
    let mut passes = 0usize;

    loop {
        passes += 1;
        let mut progressed = false;

        for (i, tx) in candidates.iter().enumerate() {
            if processed[i] {
                continue;
            }

            let resolved = tx
                .inputs
                .iter()
                .all(|input| utxo_set.contains(&input.prevout));
            if !resolved {
                continue;
            }

            processed[i] = true;
            progressed = true;

            match check_tx_inputs(tx, &utxo_set, verifier).0 {
                ValidationResult::Valid => {
                    trace!("Accepted transaction {} in pass {}", hex::encode(tx.hash()), passes);
                    utxo_set = apply_transaction(tx, utxo_set)?;
                    accepted.push(tx.clone());
                }
                ValidationResult::Invalid(reason) => {
                    debug!("Rejected transaction {}: {}", hex::encode(tx.hash()), reason);
                }
            }
        }

        if !progressed {
            break;
        }
    }

    let unresolved = processed.iter().filter(|done| !**done).count();
    if unresolved > 0 {
        debug!("Dropped {} transaction(s) with unresolvable inputs", unresolved);
    }

    Ok((accepted, utxo_set))
}

fn invalid(reason: String) -> (ValidationResult, Integer) {
    (ValidationResult::Invalid(reason), 0)
}
