use ethers::types::{Address, U256};
use thiserror::Error;

/// Messages of the errors that permanently invalidate a transaction.
///
/// Processors that can only report text must report one of these keys
/// verbatim, see [`is_invalid_tx_error`]. Typed [`ProcessorError`] variants
/// carry the details instead.
pub const INVALID_TX_ERRORS: &[&str] = &[
    "invalid signature",
    "nonce too low",
    "intrinsic gas too low",
    "insufficient funds",
    "gas limit exceeds batch gas limit",
    "transaction cost overflow",
    "nonce overflow",
];

/// How the selector reacts to a failed submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Reject the transaction for good and keep going
    Invalid,
    /// Leave the transaction for a later batch and keep going
    Deferred,
    /// The batch is full, stop without error
    Capacity,
    /// The processor cannot be trusted anymore, abort the round
    Fatal,
}

/// Failure reported by a batch processor
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessorError {
    #[error("invalid signature: recovered signer does not match {from:?}")]
    InvalidSignature { from: Address },
    #[error("nonce too low: expected {expected}, got {got}")]
    NonceTooLow { expected: u64, got: u64 },
    #[error("intrinsic gas too low: {gas_limit} < {intrinsic}")]
    IntrinsicGasTooLow { gas_limit: u64, intrinsic: u64 },
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientBalance { required: U256, available: U256 },
    #[error("gas limit exceeds batch gas limit: {gas_limit} > {max}")]
    GasLimitExceedsBatch { gas_limit: u64, max: u64 },
    #[error("transaction cost overflow")]
    CostOverflow,
    #[error("nonce overflow: account nonce {nonce} cannot be incremented")]
    NonceOverflow { nonce: u64 },
    #[error("nonce is bigger than account nonce: expected {expected}, got {got}")]
    NonceIsBiggerThanAccountNonce { expected: u64, got: u64 },
    #[error("invalid cumulative gas: {used} + {gas_limit} > {max}")]
    InvalidCumulativeGas { used: u64, gas_limit: u64, max: u64 },
    /// Error surfaced by an external processor as plain text
    #[error("{0}")]
    Reported(String),
    #[error("internal processor error: {0}")]
    Internal(String),
}

impl ProcessorError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidSignature { .. }
            | Self::NonceTooLow { .. }
            | Self::IntrinsicGasTooLow { .. }
            | Self::InsufficientBalance { .. }
            | Self::GasLimitExceedsBatch { .. }
            | Self::CostOverflow
            | Self::NonceOverflow { .. } => ErrorClass::Invalid,
            Self::NonceIsBiggerThanAccountNonce { .. } => ErrorClass::Deferred,
            Self::InvalidCumulativeGas { .. } => ErrorClass::Capacity,
            Self::Reported(message) if is_invalid_tx_error(message) => ErrorClass::Invalid,
            Self::Reported(_) | Self::Internal(_) => ErrorClass::Fatal,
        }
    }
}

/// Whether `message` is exactly one of the known invalid transaction errors
pub fn is_invalid_tx_error(message: &str) -> bool {
    INVALID_TX_ERRORS.contains(&message)
}
