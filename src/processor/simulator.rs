//! In-memory batch simulator
//!
//! Replays the validation the sequencer performs before a transaction may
//! enter a batch (signature, nonce, gas, balance) against a private account
//! map, and applies the transfer when every check passes.

use super::{BatchProcessor, ProcessingResult, ProcessorError};
use crate::{config::GenesisAccount, AccountState, ProposerAddress, Transaction};
use ethers::types::{Address, U256};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Gas charged for the cheapest possible transfer
pub const INTRINSIC_GAS: u64 = 21_000;

/// Outcome of a successful validation, consumed by `apply`
#[derive(Debug, Clone, Copy)]
struct Checked {
    /// Amount debited from the sender
    required: U256,
    /// Sender nonce after the transaction
    next_nonce: u64,
}

/// Batch processor backed by an in-memory account map
///
/// The cumulative gas counter and the account map accumulate across calls
/// until [`StateSimulator::reset_batch`] starts a new batch.
#[derive(Debug, Clone)]
pub struct StateSimulator {
    accounts: HashMap<Address, AccountState>,
    max_cumulative_gas: u64,
    cumulative_gas_used: u64,
}

impl StateSimulator {
    /// Creates an empty simulator
    ///
    /// # Arguments
    /// * `max_cumulative_gas` - Gas budget of one batch
    pub fn new(max_cumulative_gas: u64) -> Self {
        Self { accounts: HashMap::new(), max_cumulative_gas, cumulative_gas_used: 0 }
    }

    /// Creates a simulator pre-funded with the given accounts
    pub fn with_genesis(max_cumulative_gas: u64, genesis: &[GenesisAccount]) -> Self {
        let mut simulator = Self::new(max_cumulative_gas);
        for account in genesis {
            simulator.set_account(AccountState {
                address: account.address,
                balance: account.balance,
                nonce: account.nonce,
            });
        }
        simulator
    }

    pub fn set_account(&mut self, state: AccountState) {
        self.accounts.insert(state.address, state);
    }

    /// Returns the account, or an empty one if it was never touched
    pub fn account(&self, address: &Address) -> AccountState {
        self.accounts.get(address).cloned().unwrap_or(AccountState {
            address: *address,
            balance: U256::zero(),
            nonce: 0,
        })
    }

    pub fn cumulative_gas_used(&self) -> u64 {
        self.cumulative_gas_used
    }

    /// Keeps account state but clears the gas budget for the next batch
    pub fn reset_batch(&mut self) {
        self.cumulative_gas_used = 0;
    }

    /// Verify that the signature over the signing hash recovers to `from`
    fn verify_signature(&self, tx: &Transaction) -> Result<(), ProcessorError> {
        let recovered = tx
            .signature
            .recover(tx.signing_hash())
            .map_err(|_| ProcessorError::InvalidSignature { from: tx.from })?;

        if recovered != tx.from {
            warn!("Signature verification failed: signer mismatch for {:?}", tx.from);
            return Err(ProcessorError::InvalidSignature { from: tx.from });
        }

        Ok(())
    }

    /// Check that the transaction uses exactly the sender's next nonce
    ///
    /// # Returns
    /// The nonce the sender will have once the transaction is applied
    fn check_nonce(&self, tx: &Transaction) -> Result<u64, ProcessorError> {
        let expected = self.account(&tx.from).nonce;

        if tx.nonce < expected {
            return Err(ProcessorError::NonceTooLow { expected, got: tx.nonce });
        }
        if tx.nonce > expected {
            // Might become valid once the earlier nonces are consumed
            return Err(ProcessorError::NonceIsBiggerThanAccountNonce { expected, got: tx.nonce });
        }

        expected
            .checked_add(1)
            .ok_or(ProcessorError::NonceOverflow { nonce: expected })
    }

    /// Check the gas limit against the intrinsic cost and the batch budget
    fn check_gas(&self, tx: &Transaction) -> Result<(), ProcessorError> {
        if tx.gas_limit < INTRINSIC_GAS {
            return Err(ProcessorError::IntrinsicGasTooLow {
                gas_limit: tx.gas_limit,
                intrinsic: INTRINSIC_GAS,
            });
        }
        // Would not fit even in an empty batch
        if tx.gas_limit > self.max_cumulative_gas {
            return Err(ProcessorError::GasLimitExceedsBatch {
                gas_limit: tx.gas_limit,
                max: self.max_cumulative_gas,
            });
        }

        let total_gas = self.cumulative_gas_used.saturating_add(tx.gas_limit);
        if total_gas > self.max_cumulative_gas {
            return Err(ProcessorError::InvalidCumulativeGas {
                used: self.cumulative_gas_used,
                gas_limit: tx.gas_limit,
                max: self.max_cumulative_gas,
            });
        }

        Ok(())
    }

    /// Check that the sender can pay `value + gas_price * gas_limit`
    ///
    /// # Returns
    /// The amount that will be debited from the sender
    fn check_balance(&self, tx: &Transaction) -> Result<U256, ProcessorError> {
        let required = tx.cost().ok_or(ProcessorError::CostOverflow)?;
        let available = self.account(&tx.from).balance;

        if available < required {
            warn!(
                "Insufficient balance for {:?}: required {}, available {}",
                tx.from, required, available
            );
            return Err(ProcessorError::InsufficientBalance { required, available });
        }

        Ok(required)
    }

    /// Apply a validated transaction to the accumulated batch state
    ///
    /// Debits the sender, credits the recipient with `value` and the proposer
    /// with the fee, and charges the full gas limit against the batch budget.
    fn apply(&mut self, tx: &Transaction, checked: Checked, proposer: ProposerAddress) {
        let fee = checked.required - tx.value;

        let mut sender = self.account(&tx.from);
        sender.balance -= checked.required;
        sender.nonce = checked.next_nonce;
        self.set_account(sender);

        let mut recipient = self.account(&tx.to);
        recipient.balance = recipient.balance.saturating_add(tx.value);
        self.set_account(recipient);

        let mut coinbase = self.account(&proposer);
        coinbase.balance = coinbase.balance.saturating_add(fee);
        self.set_account(coinbase);

        self.cumulative_gas_used += tx.gas_limit;
    }

    /// Validate a transaction against the current batch state
    ///
    /// Checks run in a fixed order, so a transaction failing several of them
    /// always reports the first one.
    fn validate(&self, tx: &Transaction) -> Result<Checked, ProcessorError> {
        // 1. Verify signature
        self.verify_signature(tx)?;

        // 2. Check nonce
        let next_nonce = self.check_nonce(tx)?;

        // 3. Check gas against the intrinsic cost and the remaining budget
        self.check_gas(tx)?;

        // 4. Check balance
        let required = self.check_balance(tx)?;

        Ok(Checked { required, next_nonce })
    }
}

impl BatchProcessor for StateSimulator {
    /// Validate `tx` and, if it passes, apply it to the batch state
    ///
    /// # Arguments
    /// * `tx` - Transaction to apply
    /// * `proposer` - Address credited with the transaction fee
    ///
    /// # Returns
    /// A successful result carrying the gas charged, or the first failed check.
    /// A failed transaction leaves the state untouched.
    fn process_transaction(&mut self, tx: &Transaction, proposer: ProposerAddress) -> ProcessingResult {
        match self.validate(tx) {
            Ok(checked) => {
                self.apply(tx, checked, proposer);
                debug!(
                    "Applied {:?}, cumulative gas {} / {}",
                    tx.hash(),
                    self.cumulative_gas_used,
                    self.max_cumulative_gas
                );
                ProcessingResult::success(tx.gas_limit)
            }
            Err(err) => ProcessingResult::failure(err),
        }
    }
}
