//! Unordered batch acceptance with real signatures

mod common;

use common::*;
use std::thread;
use utxo_chain::transaction::{handle_txs, is_valid_tx};
use utxo_chain::*;

fn ledger(wallet: &Wallet, values: &[Integer]) -> (UtxoSet, Vec<OutPoint>) {
    let mut utxo_set = UtxoSet::new();
    let mut outpoints = Vec::new();
    for (i, value) in values.iter().enumerate() {
        let outpoint = OutPoint::new([0x42; 32], i as Natural);
        utxo_set.add(outpoint, wallet.pay(*value)).unwrap();
        outpoints.push(outpoint);
    }
    (utxo_set, outpoints)
}

#[test]
fn test_dependent_pair_in_reverse_order() -> anyhow::Result<()> {
    init_logging();
    let a = Wallet::new(1);
    let b = Wallet::new(2);
    let (utxo_set, outpoints) = ledger(&a, &[50]);
    let verifier = Secp256k1Verifier::new();

    let tx1 = a.spend(&[outpoints[0]], vec![b.pay(50)]);
    let tx2 = b.spend(&[OutPoint::new(tx1.hash(), 0)], vec![a.pay(45)]);
    assert!(!is_valid_tx(&tx2, &utxo_set, &verifier));

    let (accepted, after) = handle_txs(&[tx2.clone(), tx1.clone()], utxo_set, &verifier)?;

    assert_eq!(accepted, vec![tx1.clone(), tx2.clone()]);
    assert_eq!(after.len(), 1);
    assert!(after.contains(&OutPoint::new(tx2.hash(), 0)));
    assert!(!after.contains(&OutPoint::new(tx1.hash(), 0)));
    Ok(())
}

#[test]
fn test_double_spend_accepts_exactly_one() -> anyhow::Result<()> {
    let a = Wallet::new(1);
    let b = Wallet::new(2);
    let c = Wallet::new(3);
    let (utxo_set, outpoints) = ledger(&a, &[50]);

    let to_b = a.spend(&[outpoints[0]], vec![b.pay(50)]);
    let to_c = a.spend(&[outpoints[0]], vec![c.pay(50)]);

    let candidates = [to_b.clone(), to_c.clone()];
    let (accepted, after) = handle_txs(&candidates, utxo_set, &Secp256k1Verifier::new())?;

    assert_eq!(accepted, vec![to_b.clone()]);
    assert!(after.contains(&OutPoint::new(to_b.hash(), 0)));
    assert!(!after.contains(&OutPoint::new(to_c.hash(), 0)));
    Ok(())
}

#[test]
fn test_mixed_batch() -> anyhow::Result<()> {
    let a = Wallet::new(1);
    let b = Wallet::new(2);
    let mallory = Wallet::new(9);
    let (utxo_set, outpoints) = ledger(&a, &[10, 20, 30]);
    let before = utxo_set.total_value();

    let merge = a.spend(&outpoints[..2], vec![b.pay(29)]);
    let forged = mallory.spend(&[outpoints[2]], vec![mallory.pay(30)]);
    let overspend = a.spend(&[outpoints[2]], vec![b.pay(31)]);
    let onward = b.spend(&[OutPoint::new(merge.hash(), 0)], vec![b.pay(20), a.pay(9)]);
    let orphan = b.spend(&[OutPoint::new([0x99; 32], 0)], vec![b.pay(1)]);

    let candidates = vec![onward.clone(), forged, orphan, overspend, merge.clone()];
    let (accepted, after) = handle_txs(&candidates, utxo_set, &Secp256k1Verifier::new())?;

    assert_eq!(accepted, vec![merge, onward]);
    // One unit of fee left the ledger, the third output is untouched.
    assert_eq!(after.total_value(), before - 1);
    assert!(after.contains(&outpoints[2]));
    assert_eq!(after.len(), 3);
    Ok(())
}

#[test]
fn test_shared_chain_across_threads() -> anyhow::Result<()> {
    let miner = Wallet::new(1);
    let (genesis, funding) = funded_genesis(&miner, 100);
    let genesis_hash = genesis.hash();
    let shared = SharedBlockChain::new(BlockChain::new(genesis)?);

    let payments: Vec<Transaction> = (2..=5u8)
        .map(|seed| miner.spend(&[funding], vec![Wallet::new(seed).pay(100)]))
        .collect();

    let handles: Vec<_> = payments
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, tx)| {
            let shared = shared.clone();
            thread::spawn(move || {
                shared.add_transaction(tx.clone());
                let reward = TransactionOutput::new(i as Integer, vec![7; 33]);
                let coinbase = Transaction::new_coinbase(2, vec![reward]);
                shared.add_block(Block::new(genesis_hash, coinbase, vec![tx]))
            })
        })
        .collect();

    for handle in handles {
        // Each block spends the funding output on its own fork.
        assert!(handle.join().unwrap()?.is_valid());
    }

    let best = shared.max_height_block();
    let best_set = shared.max_height_utxo_set();
    assert_eq!(best.transactions.len(), 1);
    assert!(best_set.contains(&OutPoint::new(best.transactions[0].hash(), 0)));
    assert!(!best_set.contains(&funding));

    // Every pending payment conflicts with the one confirmed on the best fork.
    let candidates = shared.read(|chain| chain.candidate_transactions())?;
    assert!(candidates.is_empty());
    Ok(())
}
