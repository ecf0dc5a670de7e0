//! End-to-end rounds through the pool, the Base selector and the state simulator

use crate::{
    batch::BatchOrchestrator,
    config::{GenesisAccount, SelectorConfig},
    pool::TransactionPool,
    processor::{BatchProcessor, ProcessingResult, ProcessorError, StateSimulator, INTRINSIC_GAS},
    selector::SelectionError,
    ProposerAddress, StopReason, Transaction,
};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, Bytes, Signature, U256};
use std::sync::Arc;

fn wallet(key: &str) -> LocalWallet {
    key.parse::<LocalWallet>().unwrap()
}

fn signed_tx(signer: &LocalWallet, nonce: u64, gas_price: u64) -> Transaction {
    let mut tx = Transaction {
        from: signer.address(),
        to: Address::from_low_u64_be(0xcafe),
        value: U256::from(100),
        nonce,
        gas_price: U256::from(gas_price),
        gas_limit: INTRINSIC_GAS,
        data: Bytes::default(),
        signature: Signature { r: U256::zero(), s: U256::zero(), v: 0 },
    };
    tx.signature = signer.sign_hash(tx.signing_hash()).unwrap();
    tx
}

fn base_config() -> SelectorConfig {
    SelectorConfig {
        selector_type: "base".to_string(),
        sorter_type: "bycostandtime".to_string(),
        selection_time_ms: 10_000,
    }
}

fn proposer() -> ProposerAddress {
    Address::from_low_u64_be(0xbeef)
}

#[tokio::test]
async fn test_deferred_transaction_is_selected_in_next_round() {
    let alice = wallet("0000000000000000000000000000000000000000000000000000000000000001");
    let bob = wallet("0000000000000000000000000000000000000000000000000000000000000002");
    let genesis = [GenesisAccount { address: alice.address(), balance: U256::exp10(18), nonce: 0 }];
    let mut simulator = StateSimulator::with_genesis(10 * INTRINSIC_GAS, &genesis);

    let pool = Arc::new(TransactionPool::new());
    // Pays more, so it is tried before its predecessor
    let second = pool.add(signed_tx(&alice, 1, 9)).await;
    let first = pool.add(signed_tx(&alice, 0, 5)).await;
    // Bob has no funds
    let broke = pool.add(signed_tx(&bob, 0, 7)).await;

    let orchestrator = BatchOrchestrator::new(pool.clone(), &base_config()).unwrap();

    let round = orchestrator.run_round(&mut simulator, proposer()).await.unwrap();
    assert_eq!(round.selected_hashes, vec![first.clone()]);
    assert_eq!(round.invalid_hashes, vec![broke]);
    assert_eq!(round.deferred_hashes, vec![second.clone()]);
    assert_eq!(round.stop_reason, StopReason::Exhausted);
    assert_eq!(pool.len().await, 1);

    simulator.reset_batch();
    let round = orchestrator.run_round(&mut simulator, proposer()).await.unwrap();
    assert_eq!(round.selected_hashes, vec![second]);
    assert!(pool.is_empty().await);
}

#[tokio::test]
async fn test_gas_budget_leaves_remaining_transactions_pending() {
    let alice = wallet("0000000000000000000000000000000000000000000000000000000000000001");
    let genesis = [GenesisAccount { address: alice.address(), balance: U256::exp10(18), nonce: 0 }];
    let mut simulator = StateSimulator::with_genesis(2 * INTRINSIC_GAS, &genesis);

    let pool = Arc::new(TransactionPool::new());
    for nonce in 0..4 {
        pool.add(signed_tx(&alice, nonce, 1)).await;
    }

    let orchestrator = BatchOrchestrator::new(pool.clone(), &base_config()).unwrap();
    let round = orchestrator.run_round(&mut simulator, proposer()).await.unwrap();

    assert_eq!(round.selected_txs.iter().map(|tx| tx.nonce).collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(round.stop_reason, StopReason::CapacityReached);
    assert_eq!(pool.len().await, 2);
}

struct BrokenProcessor;

impl BatchProcessor for BrokenProcessor {
    fn process_transaction(&mut self, _tx: &Transaction, _proposer: ProposerAddress) -> ProcessingResult {
        ProcessingResult::failure(ProcessorError::Internal("state unavailable".to_string()))
    }
}

#[tokio::test]
async fn test_fatal_error_leaves_pool_untouched() {
    let alice = wallet("0000000000000000000000000000000000000000000000000000000000000001");
    let pool = Arc::new(TransactionPool::new());
    pool.add(signed_tx(&alice, 0, 1)).await;
    pool.add(signed_tx(&alice, 1, 1)).await;

    let orchestrator = BatchOrchestrator::new(pool.clone(), &base_config()).unwrap();
    let result = orchestrator.run_round(&mut BrokenProcessor, proposer()).await;

    assert!(matches!(result, Err(SelectionError::Processor { .. })));
    assert_eq!(pool.len().await, 2);
}

#[tokio::test]
async fn test_accept_all_drains_pool() {
    let alice = wallet("0000000000000000000000000000000000000000000000000000000000000001");
    let pool = Arc::new(TransactionPool::new());
    pool.add(signed_tx(&alice, 5, 1)).await;
    pool.add(signed_tx(&alice, 3, 1)).await;

    let config = SelectorConfig { selector_type: "acceptall".to_string(), ..base_config() };
    let orchestrator = BatchOrchestrator::new(pool.clone(), &config).unwrap();
    let round = orchestrator.run_round(&mut BrokenProcessor, proposer()).await.unwrap();

    assert_eq!(round.selected_txs.iter().map(|tx| tx.nonce).collect::<Vec<_>>(), vec![5, 3]);
    assert!(pool.is_empty().await);
}

#[test]
fn test_unknown_sorter_fails_construction() {
    let config = SelectorConfig { sorter_type: "lifo".to_string(), ..base_config() };
    assert!(BatchOrchestrator::new(Arc::new(TransactionPool::new()), &config).is_err());
}
