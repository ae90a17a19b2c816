//! Core of the two-party "who is larger" comparison contract
//!
//! This crate contains the logic a host executes on behalf of the contract:
//! - Signature verification binding a claimed input to an Ed25519 key
//! - The per-role input slots
//! - The comparison and disclosure rule
//! - The contract state machine and its message/query surface
//!
//! The host (ledger, transport, key management) is not part of this crate.
//! It hands every call an [`Env`] and applies calls one at a time.

pub mod types;
pub mod error;
pub mod encoding;
pub mod verifier;
pub mod store;
pub mod compare;
pub mod msg;
pub mod contract;
pub mod signing;

pub use types::*;
pub use error::{ContractError, MalformedInput, SlotError, VerificationError};
pub use encoding::Binary;
pub use verifier::verify;
pub use store::{Slot, SlotStore, StoredInput};
pub use compare::{compare, ComparisonResult, TieBreak};
pub use msg::{ExecuteMsg, InstantiateMsg, QueryMsg, QueryResponse, Response, SetInput};
pub use msg::{WireExecuteMsg, WireSetInput};
pub use contract::{Contract, Phase};
