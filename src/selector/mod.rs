//! Transaction Selection Module
//!
//! Decides which pending transactions enter the next batch:
//! - AcceptAll: takes every pending transaction as is, no validation
//! - Base: orders transactions with a sorter and keeps the ones the batch
//!   processor accepts
//!
//! The Base selector maps processor failures onto four outcomes: invalid
//! transactions are rejected, nonce-ahead transactions are deferred, an
//! exhausted gas budget ends the batch, and anything else aborts the round.

mod selector;


pub use selector::{create_selector, AcceptAll, Base, SelectionError, SelectorType, TxSelector};
