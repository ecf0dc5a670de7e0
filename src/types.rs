use ethers::types::{Address, Bytes, Signature, H256, U256};
use ethers::utils::keccak256;
use serde::{Deserialize, Serialize};

/// Identity credited with producing the batch.
pub type ProposerAddress = Address;

/// L2 transaction as it is admitted into a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub nonce: u64,
    pub gas_price: U256,
    pub gas_limit: u64,
    #[serde(default)]
    pub data: Bytes,
    pub signature: Signature,
}

impl Transaction {
    /// Encode the unsigned payload fields
    fn payload_bytes(&self) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(self.from.as_bytes());
        data.extend_from_slice(self.to.as_bytes());

        let mut value_bytes = [0u8; 32];
        self.value.to_big_endian(&mut value_bytes);
        data.extend_from_slice(&value_bytes);

        data.extend_from_slice(&self.nonce.to_be_bytes());

        let mut gas_price_bytes = [0u8; 32];
        self.gas_price.to_big_endian(&mut gas_price_bytes);
        data.extend_from_slice(&gas_price_bytes);

        data.extend_from_slice(&self.gas_limit.to_be_bytes());
        data.extend_from_slice(&self.data);
        data
    }

    /// Message signed by `from`: the hash of the unsigned payload
    pub fn signing_hash(&self) -> H256 {
        H256::from_slice(&keccak256(self.payload_bytes()))
    }

    /// Identity of the transaction, covering the payload and the signature
    ///
    /// Two copies of the same payload signed by different keys hash differently.
    pub fn hash(&self) -> H256 {
        let mut data = self.payload_bytes();

        let mut word = [0u8; 32];
        self.signature.r.to_big_endian(&mut word);
        data.extend_from_slice(&word);
        self.signature.s.to_big_endian(&mut word);
        data.extend_from_slice(&word);
        data.extend_from_slice(&self.signature.v.to_be_bytes());

        H256::from_slice(&keccak256(data))
    }

    /// Hash rendered as a `0x`-prefixed hex string
    pub fn hash_hex(&self) -> String {
        format!("{:?}", self.hash())
    }

    /// Upper bound of what the sender pays: `value + gas_price * gas_limit`.
    /// `None` on overflow.
    pub fn cost(&self) -> Option<U256> {
        self.gas_price
            .checked_mul(U256::from(self.gas_limit))
            .and_then(|fee| fee.checked_add(self.value))
    }
}

/// Transaction waiting in the pool together with the metadata the pool stamped on arrival
///
/// The transaction is only reachable through accessors so the hash computed in
/// [`PendingTransaction::new`] always matches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    transaction: Transaction,
    hash: H256,
    /// Unix timestamp in milliseconds
    pub received_at: i64,
    /// Position in the pool's arrival sequence
    pub arrival: u64,
}

impl PendingTransaction {
    pub fn new(transaction: Transaction, received_at: i64, arrival: u64) -> Self {
        let hash = transaction.hash();
        Self { transaction, hash, received_at, arrival }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn into_transaction(self) -> Transaction {
        self.transaction
    }

    pub fn hash(&self) -> H256 {
        self.hash
    }

    pub fn hash_hex(&self) -> String {
        format!("{:?}", self.hash)
    }
}

/// Account state tracked by the batch simulator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    pub address: Address,
    pub balance: U256,
    pub nonce: u64,
}

/// Why a selection round stopped iterating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Every pending transaction was submitted
    Exhausted,
    /// The processor reported the cumulative gas budget as exceeded
    CapacityReached,
    /// The caller's deadline passed between two submissions
    DeadlineReached,
}

/// Outcome of one selection round
///
/// `selected_txs` and `selected_hashes` are index-aligned. A hash shows up in
/// at most one of the three hash lists, in processing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub selected_txs: Vec<Transaction>,
    pub selected_hashes: Vec<String>,
    pub invalid_hashes: Vec<String>,
    /// Nonce-ahead transactions left for a later batch
    pub deferred_hashes: Vec<String>,
    pub stop_reason: StopReason,
}

impl Selection {
    pub fn empty() -> Self {
        Self {
            selected_txs: Vec::new(),
            selected_hashes: Vec::new(),
            invalid_hashes: Vec::new(),
            deferred_hashes: Vec::new(),
            stop_reason: StopReason::Exhausted,
        }
    }

    pub(crate) fn push_selected(&mut self, tx: Transaction, hash: String) {
        self.selected_txs.push(tx);
        self.selected_hashes.push(hash);
    }
}
