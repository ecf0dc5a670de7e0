//! Transaction Sorting Module
//!
//! This module implements the priority orderings applied to pending
//! transactions before they are submitted to the batch processor, using the
//! Strategy design pattern:
//! - ByCostAndTime: highest gas price first, earliest arrival breaks ties
//! - ByCostAndNonce: highest gas price first, lowest nonce breaks ties
//!
//! Every policy is total and deterministic: equal priority keys fall back to
//! the pool arrival sequence and finally the transaction hash.

mod policies;


pub use policies::{create_sorter, ByCostAndNonce, ByCostAndTime, SorterType, TxSorter};
