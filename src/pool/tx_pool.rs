//! Transaction Pool Module
//!
//! This module implements a pool for pending user transactions.
//! Each transaction is stamped with its arrival time and sequence number so
//! sorters can break ties deterministically.

use crate::{PendingTransaction, Transaction};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct PoolInner {
    /// Pending transactions keyed by hash hex
    transactions: HashMap<String, PendingTransaction>,
    /// Sequence number handed to the next arrival
    next_arrival: u64,
}

/// Pool for pending user transactions
///
/// Protected by RwLock for concurrent access. Adding a transaction whose hash
/// is already pending is a no-op.
#[derive(Default)]
pub struct TransactionPool {
    inner: RwLock<PoolInner>,
}

impl TransactionPool {
    /// Creates a new empty transaction pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transaction to the pool, stamped with the current time
    ///
    /// # Returns
    /// The hash hex under which the transaction is pending
    pub async fn add(&self, tx: Transaction) -> String {
        self.add_at(tx, chrono::Utc::now().timestamp_millis()).await
    }

    /// Add a transaction with an explicit arrival timestamp (unix millis)
    pub async fn add_at(&self, tx: Transaction, received_at: i64) -> String {
        let hash = tx.hash_hex();
        let mut inner = self.inner.write().await;

        if !inner.transactions.contains_key(&hash) {
            let arrival = inner.next_arrival;
            inner.next_arrival += 1;
            inner
                .transactions
                .insert(hash.clone(), PendingTransaction::new(tx, received_at, arrival));
        }

        hash
    }

    /// Snapshot of every pending transaction, in arrival order
    pub async fn pending(&self) -> Vec<PendingTransaction> {
        let inner = self.inner.read().await;
        let mut pending: Vec<_> = inner.transactions.values().cloned().collect();
        pending.sort_by_key(|tx| tx.arrival);
        pending
    }

    /// Drop the given hashes from the pool
    ///
    /// # Returns
    /// How many of them were actually pending
    pub async fn remove(&self, hashes: &[String]) -> usize {
        let mut inner = self.inner.write().await;
        hashes
            .iter()
            .filter(|hash| inner.transactions.remove(*hash).is_some())
            .count()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.transactions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
