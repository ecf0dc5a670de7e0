//! Batch Processor Module
//!
//! The batch processor is the source of truth for transaction validity. It
//! applies one transaction at a time to an accumulating batch state and
//! reports whether it fit, and if not, why.
//!
//! - `BatchProcessor`: the contract consumed by the selector
//! - `ProcessorError` / `ErrorClass`: the failure taxonomy
//! - `StateSimulator`: in-memory processor over account balances and nonces

mod error;
mod simulator;


pub use error::{is_invalid_tx_error, ErrorClass, ProcessorError, INVALID_TX_ERRORS};
pub use simulator::{StateSimulator, INTRINSIC_GAS};

use crate::{ProposerAddress, Transaction};

/// Outcome of submitting one transaction to a [`BatchProcessor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingResult {
    pub gas_used: u64,
    pub err: Option<ProcessorError>,
}

impl ProcessingResult {
    pub fn success(gas_used: u64) -> Self {
        Self { gas_used, err: None }
    }

    pub fn failure(err: ProcessorError) -> Self {
        Self { gas_used: 0, err: Some(err) }
    }

    pub fn failed(&self) -> bool {
        self.err.is_some()
    }
}

/// Stateful batch simulator
///
/// Every successful call mutates the processor's cumulative state, so later
/// submissions observe the effects of earlier ones. Implementations are
/// borrowed exclusively for the duration of a selection round.
pub trait BatchProcessor {
    /// Attempt to apply one transaction to the accumulating batch state
    ///
    /// # Arguments
    /// * `tx` - Transaction to apply; its signature covers `tx.signing_hash()`
    /// * `proposer` - Address the batch is built for
    ///
    /// # Returns
    /// A result whose `err`, when set, is classified by [`ProcessorError::class`]
    fn process_transaction(&mut self, tx: &Transaction, proposer: ProposerAddress) -> ProcessingResult;
}
