//! Host errors

use millionaire_core::ContractError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    /// No contract instance yet
    #[error("contract not instantiated")]
    NotInstantiated,
    /// The host holds a single instance
    #[error("contract already instantiated")]
    AlreadyInstantiated,
    /// Request could not be decoded at the boundary
    #[error("failed to decode request: {0}")]
    Decode(#[from] serde_json::Error),
    /// Query or instantiation rejected by the contract
    #[error("{0}")]
    Contract(#[from] ContractError),
}
