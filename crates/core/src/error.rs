//! Error types
//!
//! The `Display` output of each variant is the diagnostic a host surfaces in
//! its transaction failure log. Clients match on these strings, so they are
//! part of the wire contract.

use thiserror::Error;

use crate::types::PartyRole;

/// Submission bytes that cannot be interpreted at all
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MalformedInput {
    /// Signature does not have the scheme's fixed length
    #[error("signature must be {expected} bytes, got {actual}")]
    SignatureLength { expected: usize, actual: usize },
    /// Public key does not have the scheme's fixed length
    #[error("public key must be {expected} bytes, got {actual}")]
    PublicKeyLength { expected: usize, actual: usize },
    /// Message is empty
    #[error("message is empty")]
    EmptyMessage,
    /// Message is not a decimal integer
    #[error("message is not a decimal integer")]
    UndecodableMessage,
    /// Byte field is not standard base64
    #[error("{0} is not valid base64")]
    InvalidBase64(&'static str),
}

/// Signature verifier rejection
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum VerificationError {
    /// Bad encoding or lengths
    #[error("Malformed input: {0}")]
    Malformed(#[from] MalformedInput),
    /// Cryptographic check failed
    #[error("Invalid signature")]
    InvalidSignature,
    /// Message does not encode the claimed input
    #[error("Value mismatch: message does not encode the claimed input")]
    ValueMismatch,
}

/// Input slot store rejection
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SlotError {
    /// The role's slot already holds a value
    #[error("Input {0} is already set")]
    AlreadyFilled(PartyRole),
}

/// Contract-level error
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ContractError {
    /// Submission rejected by the verifier
    #[error(transparent)]
    Verification(#[from] VerificationError),
    /// Submission rejected by the slot store
    #[error(transparent)]
    Slot(#[from] SlotError),
    /// Submission key differs from the key configured for the role
    #[error("Unauthorized key for input {0}")]
    UnauthorizedKey(PartyRole),
    /// Comparison requested before both inputs are set
    #[error("Inputs incomplete: both input a and input b must be set")]
    InputsIncomplete,
    /// Inputs are equal and the tie-break policy rejects ties
    #[error("Inputs are equal: no larger number")]
    TiedInputs,
    /// Queried slot is empty
    #[error("Input {0} is not set")]
    InputNotSet(PartyRole),
    /// Input queries are disabled for this instance
    #[error("Input queries are disabled")]
    QueryDisabled,
}

impl From<MalformedInput> for ContractError {
    fn from(err: MalformedInput) -> Self {
        Self::Verification(err.into())
    }
}
