//! Batch Orchestrator Module
//!
//! This module connects the transaction pool, the configured selector and a
//! batch processor.
//!
//! # Round Flow
//! 1. Snapshot pending transactions from `TransactionPool`
//! 2. Derive the selection deadline from `selection_time_ms`
//! 3. Run the selector against the batch processor
//! 4. Remove selected and invalid transactions from the pool; deferred ones
//!    stay pending for the next round

use crate::{
    config::{ConfigError, SelectorConfig},
    pool::TransactionPool,
    processor::BatchProcessor,
    selector::{create_selector, SelectionError, TxSelector},
    ProposerAddress, Selection,
};
use std::sync::Arc;
use tokio::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Batch orchestrator
///
/// Owns the selection policy and shares the pool with whoever feeds it.
pub struct BatchOrchestrator {
    /// Pending user transactions
    tx_pool: Arc<TransactionPool>,
    /// Selection strategy built from configuration
    selector: Box<dyn TxSelector>,
    /// Wall-clock budget of one round
    selection_time: Duration,
}

impl BatchOrchestrator {
    /// Creates a new batch orchestrator
    ///
    /// # Errors
    /// Fails if the configuration names an unknown selector or sorter
    pub fn new(tx_pool: Arc<TransactionPool>, config: &SelectorConfig) -> Result<Self, ConfigError> {
        let selector = create_selector(config)?;
        Ok(Self::with_selector(tx_pool, selector, Duration::from_millis(config.selection_time_ms)))
    }

    pub fn with_selector(
        tx_pool: Arc<TransactionPool>,
        selector: Box<dyn TxSelector>,
        selection_time: Duration,
    ) -> Self {
        Self { tx_pool, selector, selection_time }
    }

    /// Run one selection round against `processor`
    ///
    /// On a fatal processor error the pool is left untouched.
    pub async fn run_round(
        &self,
        processor: &mut dyn BatchProcessor,
        proposer: ProposerAddress,
    ) -> Result<Selection, SelectionError> {
        let pending = self.tx_pool.pending().await;
        let pending_count = pending.len();
        let deadline = Instant::now() + self.selection_time;

        debug!("Selecting from {} pending transactions with {}", pending_count, self.selector.name());

        let selection = match self.selector.select_txs(processor, pending, proposer, Some(deadline)) {
            Ok(selection) => selection,
            Err(e) => {
                error!("Selection round aborted: {}", e);
                return Err(e);
            }
        };

        let settled = self.tx_pool.remove(&selection.selected_hashes).await
            + self.tx_pool.remove(&selection.invalid_hashes).await;

        info!(
            "Selection round finished ({:?}): {} selected, {} invalid, {} deferred, {} of {} settled",
            selection.stop_reason,
            selection.selected_hashes.len(),
            selection.invalid_hashes.len(),
            selection.deferred_hashes.len(),
            settled,
            pending_count
        );

        Ok(selection)
    }
}
