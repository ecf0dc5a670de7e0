//! This crate selects the transactions admitted into the next batch of a rollup sequencer.
//! Pending transactions are ordered by a pluggable sorter and submitted one by one to a
//! stateful batch processor, whose verdicts decide what is selected, rejected or deferred.

pub mod types; // Transactions, pool entries and the selection outcome.
pub mod config; // Defines and loads system configuration.
pub mod processor; // Batch processor contract, error taxonomy and the in-memory simulator.
pub mod sorter; // Priority orderings over pending transactions.
pub mod selector; // The admission-control loop.
pub mod pool; // Implements a pool for pending transactions.
pub mod batch; // Runs selection rounds against the pool.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use config::Config;
pub use batch::BatchOrchestrator;
