//! Transaction Selector Module
//!
//! Drives the sorted pending set through the batch processor one transaction
//! at a time. Submissions are strictly sequential: the validity of a later
//! transaction depends on the state left behind by the earlier ones.

use crate::{
    config::{ConfigError, SelectorConfig},
    processor::{BatchProcessor, ErrorClass, ProcessorError},
    sorter::{create_sorter, SorterType, TxSorter},
    PendingTransaction, ProposerAddress, Selection, StopReason,
};
use std::str::FromStr;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Fatal selection failure. No partial results survive it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("batch processor failed on {tx_hash}: {source}")]
    Processor {
        tx_hash: String,
        #[source]
        source: ProcessorError,
    },
}

/// Selection strategy
pub trait TxSelector: Send + Sync {
    /// Picks the transactions for the next batch.
    ///
    /// # Arguments
    /// * `processor` - Batch simulator, borrowed exclusively for the whole round
    /// * `pending` - Unordered pending transactions from the pool
    /// * `proposer` - Address the batch is built for, passed through to the processor
    /// * `deadline` - Checked before every submission; once it has passed the
    ///   round ends with whatever was accumulated so far
    ///
    /// # Returns
    /// * `Ok(Selection)` when the pending set is exhausted, the batch is full or
    ///   the deadline passed
    /// * `Err(SelectionError)` when the processor fails in a way that cannot be
    ///   classified; no partial results are returned
    fn select_txs(
        &self,
        processor: &mut dyn BatchProcessor,
        pending: Vec<PendingTransaction>,
        proposer: ProposerAddress,
        deadline: Option<Instant>,
    ) -> Result<Selection, SelectionError>;

    fn name(&self) -> &'static str;
}

/// Named selector variants accepted in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorType {
    AcceptAll,
    Base,
}

impl FromStr for SelectorType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "acceptall" => Ok(Self::AcceptAll),
            "base" => Ok(Self::Base),
            _ => Err(ConfigError::UnknownSelectorType(s.to_string())),
        }
    }
}

/// Builds the selector named in the configuration.
///
/// Unknown selector or sorter names are rejected here instead of producing a
/// selector without a sorter.
pub fn create_selector(config: &SelectorConfig) -> Result<Box<dyn TxSelector>, ConfigError> {
    match config.selector_type.parse::<SelectorType>()? {
        SelectorType::AcceptAll => Ok(Box::new(AcceptAll)),
        SelectorType::Base => {
            let sorter_type = config.sorter_type.parse::<SorterType>()?;
            Ok(Box::new(Base::new(create_sorter(sorter_type))))
        }
    }
}

/// Accepts every pending transaction without asking the processor
///
/// Used when admission control is disabled. Invalid transactions are only
/// caught downstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl TxSelector for AcceptAll {
    fn select_txs(
        &self,
        _processor: &mut dyn BatchProcessor,
        pending: Vec<PendingTransaction>,
        _proposer: ProposerAddress,
        _deadline: Option<Instant>,
    ) -> Result<Selection, SelectionError> {
        let mut selection = Selection::empty();
        selection.selected_txs.reserve(pending.len());
        selection.selected_hashes.reserve(pending.len());

        // Input order is kept as is
        for tx in pending {
            let hash = tx.hash_hex();
            selection.push_selected(tx.into_transaction(), hash);
        }

        Ok(selection)
    }

    fn name(&self) -> &'static str {
        "AcceptAll"
    }
}

/// Sorts pending transactions and keeps the ones the processor accepts
///
/// Each submission ends in one of four ways, decided by [`ErrorClass`]:
/// - success: the transaction is selected
/// - `Invalid`: its hash is recorded in `invalid_hashes`
/// - `Deferred`: its hash is recorded in `deferred_hashes`
/// - `Capacity`: the round stops and keeps what it has
///
/// Any other failure aborts the round and drops everything accumulated so far.
pub struct Base {
    sorter: Box<dyn TxSorter>,
}

impl Base {
    /// Creates a selector that orders pending transactions with `sorter`
    pub fn new(sorter: Box<dyn TxSorter>) -> Self {
        Self { sorter }
    }

    pub fn sorter_name(&self) -> &'static str {
        self.sorter.name()
    }
}

impl TxSelector for Base {
    fn select_txs(
        &self,
        processor: &mut dyn BatchProcessor,
        pending: Vec<PendingTransaction>,
        proposer: ProposerAddress,
        deadline: Option<Instant>,
    ) -> Result<Selection, SelectionError> {
        // Step 1: Order the pending set with the configured policy
        let sorted = self.sorter.sort_txs(pending);
        let mut selection = Selection::empty();

        for tx in sorted {
            // Step 2: Give up between submissions once the deadline has passed
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                info!("Selection deadline reached after {} transactions", selection.selected_txs.len());
                selection.stop_reason = StopReason::DeadlineReached;
                return Ok(selection);
            }

            // Step 3: Apply the transaction on top of everything accepted so far
            let hash = tx.hash_hex();
            let result = processor.process_transaction(tx.transaction(), proposer);

            let Some(err) = result.err else {
                debug!("Selected {} ({} gas)", hash, result.gas_used);
                selection.push_selected(tx.into_transaction(), hash);
                continue;
            };

            // Step 4: Classify the failure
            match err.class() {
                ErrorClass::Invalid => {
                    warn!("Rejected invalid transaction {}: {}", hash, err);
                    selection.invalid_hashes.push(hash);
                }
                ErrorClass::Deferred => {
                    // Could become valid once the sender's earlier nonces are consumed
                    debug!("Deferred {}: {}", hash, err);
                    selection.deferred_hashes.push(hash);
                }
                ErrorClass::Capacity => {
                    debug!("Batch full at {}: {}", hash, err);
                    selection.stop_reason = StopReason::CapacityReached;
                    return Ok(selection);
                }
                ErrorClass::Fatal => {
                    return Err(SelectionError::Processor { tx_hash: hash, source: err });
                }
            }
        }

        Ok(selection)
    }

    fn name(&self) -> &'static str {
        "Base"
    }
}
