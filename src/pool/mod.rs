//! Transaction Pool Module
//!
//! This module keeps pending user transactions until a selection round settles
//! them. Selected and invalid transactions are removed after each round;
//! deferred ones stay and are offered again in the next round.

mod tx_pool;


pub use tx_pool::TransactionPool;
