//! Sorting Policies Module
//!
//! Each policy implements [`TxSorter`]. New orderings plug in by implementing
//! the trait; the selector never looks at the comparator itself.

use crate::{config::ConfigError, PendingTransaction};
use std::cmp::Ordering;
use std::str::FromStr;

/// Priority ordering over pending transactions
///
/// Implementations must return every input exactly once and order equal
/// inputs identically on every call.
pub trait TxSorter: Send + Sync {
    fn sort_txs(&self, pending: Vec<PendingTransaction>) -> Vec<PendingTransaction>;

    fn name(&self) -> &'static str;
}

/// Named sorter variants accepted in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SorterType {
    ByCostAndTime,
    ByCostAndNonce,
}

impl FromStr for SorterType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bycostandtime" => Ok(Self::ByCostAndTime),
            "bycostandnonce" => Ok(Self::ByCostAndNonce),
            _ => Err(ConfigError::UnknownSorterType(s.to_string())),
        }
    }
}

/// Factory for sorting policies
pub fn create_sorter(sorter_type: SorterType) -> Box<dyn TxSorter> {
    match sorter_type {
        SorterType::ByCostAndTime => Box::new(ByCostAndTime),
        SorterType::ByCostAndNonce => Box::new(ByCostAndNonce),
    }
}

/// Final tie-breaks shared by every policy; the hash is cached on the pending entry
fn by_arrival_then_hash(a: &PendingTransaction, b: &PendingTransaction) -> Ordering {
    a.arrival.cmp(&b.arrival).then_with(|| a.hash().cmp(&b.hash()))
}

/// Highest gas price first, then earliest `received_at`
#[derive(Debug, Clone, Copy, Default)]
pub struct ByCostAndTime;

impl TxSorter for ByCostAndTime {
    fn sort_txs(&self, mut pending: Vec<PendingTransaction>) -> Vec<PendingTransaction> {
        pending.sort_by(|a, b| {
            b.transaction()
                .gas_price
                .cmp(&a.transaction().gas_price)
                .then_with(|| a.received_at.cmp(&b.received_at))
                .then_with(|| by_arrival_then_hash(a, b))
        });
        pending
    }

    fn name(&self) -> &'static str {
        "ByCostAndTime"
    }
}

/// Highest gas price first, then lowest nonce
#[derive(Debug, Clone, Copy, Default)]
pub struct ByCostAndNonce;

impl TxSorter for ByCostAndNonce {
    fn sort_txs(&self, mut pending: Vec<PendingTransaction>) -> Vec<PendingTransaction> {
        pending.sort_by(|a, b| {
            b.transaction()
                .gas_price
                .cmp(&a.transaction().gas_price)
                .then_with(|| a.transaction().nonce.cmp(&b.transaction().nonce))
                .then_with(|| by_arrival_then_hash(a, b))
        });
        pending
    }

    fn name(&self) -> &'static str {
        "ByCostAndNonce"
    }
}
