//! Ordered record of applied transactions

use millionaire_core::msg::Attribute;
use millionaire_core::ContractError;
use serde::Serialize;
use tiny_keccak::{Hasher, Keccak};

use crate::tx::Hash;

/// Outcome of one transaction
#[derive(Clone, Debug, Serialize)]
pub struct Receipt {
    /// Position in the ledger
    pub index: u64,
    /// Height the transaction executed at
    pub height: u64,
    /// Hash of the transaction, or of the raw request when it never decoded
    #[serde(serialize_with = "hex_hash")]
    pub tx_hash: Hash,
    /// Whether the contract accepted the call
    pub success: bool,
    /// Log entries of a successful call
    pub attributes: Vec<Attribute>,
    /// Failure text of a rejected call, empty on success
    pub raw_log: String,
    /// Structured error of a rejected call
    #[serde(skip)]
    pub error: Option<ContractError>,
}

impl Receipt {
    /// Value of the first log entry named `key`
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }
}

fn hex_hash<S: serde::Serializer>(hash: &Hash, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("0x{}", hex::encode(hash)))
}

/// Failure text as surfaced to clients
pub fn failure_log(err: &ContractError) -> String {
    format!("failed to execute message; message index: 0: {err}")
}

/// Receipts in application order
///
/// trace_hash_N = H(trace_hash_{N-1}, tx_hash_N, success_N)
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    receipts: Vec<Receipt>,
    trace_hash: Hash,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a receipt and fold it into the trace hash
    pub fn record(&mut self, receipt: Receipt) -> &Receipt {
        let mut hasher = Keccak::v256();
        hasher.update(&self.trace_hash);
        hasher.update(&receipt.tx_hash);
        hasher.update(&[u8::from(receipt.success)]);
        hasher.finalize(&mut self.trace_hash);

        self.receipts.push(receipt);
        &self.receipts[self.receipts.len() - 1]
    }

    /// Index the next receipt will get
    pub fn next_index(&self) -> u64 {
        self.receipts.len() as u64
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    pub fn get(&self, index: u64) -> Option<&Receipt> {
        self.receipts.get(usize::try_from(index).ok()?)
    }

    /// Running hash over every recorded receipt
    pub fn trace_hash(&self) -> Hash {
        self.trace_hash
    }
}
