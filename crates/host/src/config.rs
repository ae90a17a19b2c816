//! Configuration

use std::env;

use millionaire_core::{InstantiateMsg, TieBreak};
use serde::{Deserialize, Serialize};

/// Host configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostConfig {
    /// Chain identifier handed to the contract
    pub chain_id: String,
    /// Height of the first transaction
    pub start_height: u64,
    /// Tie-break policy used when instantiating without explicit settings
    pub tie_break: TieBreak,
    /// Whether input queries answer (debug surface)
    pub query_inputs: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            chain_id: "millionaire-dev-1".to_string(),
            start_height: 1,
            tie_break: TieBreak::Reject,
            query_inputs: true,
        }
    }
}

impl HostConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            chain_id: env::var("CHAIN_ID").unwrap_or(defaults.chain_id),
            start_height: env::var("START_HEIGHT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.start_height),
            tie_break: env::var("TIE_BREAK")
                .map(|s| TieBreak::from(s.as_str()))
                .unwrap_or(defaults.tie_break),
            query_inputs: env::var("QUERY_INPUTS")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(defaults.query_inputs),
        }
    }

    /// Instantiation message carrying this configuration
    pub fn instantiate_msg(&self) -> InstantiateMsg {
        InstantiateMsg {
            tie_break: self.tie_break,
            query_inputs: self.query_inputs,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instantiate_msg_from_config() {
        let config = HostConfig {
            tie_break: TieBreak::FavorA,
            query_inputs: false,
            ..Default::default()
        };
        let msg = config.instantiate_msg();
        assert_eq!(msg.tie_break, TieBreak::FavorA);
        assert!(!msg.query_inputs);
        assert_eq!(msg.authorized_keys, Default::default());
    }
}
