//! Batch Building Module
//!
//! This module runs selection rounds:
//! - BatchOrchestrator: pulls the pending set, selects under a deadline and
//!   settles the pool

pub mod orchestrator;

#[cfg(test)]
mod tests;

pub use orchestrator::BatchOrchestrator;
