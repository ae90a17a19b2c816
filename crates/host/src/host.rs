//! Transaction execution against a single contract instance

use millionaire_core::{
    Address, Contract, ContractError, Env, ExecuteMsg, InstantiateMsg, QueryMsg, Response,
    WireExecuteMsg,
};
use tracing::{info, warn};

use crate::config::HostConfig;
use crate::error::HostError;
use crate::ledger::{failure_log, Ledger, Receipt};
use crate::tx::{request_hash, Hash, Transaction};

/// In-process host
///
/// Transactions run to completion one at a time in submission order. A
/// rejected transaction is still recorded, with `success = false`, and leaves
/// the contract untouched.
#[derive(Debug)]
pub struct Host {
    config: HostConfig,
    contract: Option<Contract>,
    ledger: Ledger,
    height: u64,
}

impl Host {
    /// Create a host with no contract instance
    pub fn new(config: HostConfig) -> Self {
        let height = config.start_height;
        Self {
            config,
            contract: None,
            ledger: Ledger::new(),
            height,
        }
    }

    /// Instantiate the contract with the configured defaults
    pub fn instantiate_default(&mut self, sender: impl Into<Address>) -> Result<Response, HostError> {
        let msg = self.config.instantiate_msg();
        self.instantiate(sender, msg)
    }

    /// Instantiate the contract
    pub fn instantiate(
        &mut self,
        sender: impl Into<Address>,
        msg: InstantiateMsg,
    ) -> Result<Response, HostError> {
        if self.contract.is_some() {
            return Err(HostError::AlreadyInstantiated);
        }
        let env = self.env(sender.into());
        let (contract, response) = Contract::instantiate(&env, msg)?;
        info!(owner = %env.sender, height = env.height, "contract instantiated");

        self.contract = Some(contract);
        self.height += 1;
        Ok(response)
    }

    /// Apply a transaction and record its receipt
    pub fn execute(&mut self, tx: &Transaction) -> Result<&Receipt, HostError> {
        let env = self.env(tx.sender.clone());
        let contract = self.contract.as_mut().ok_or(HostError::NotInstantiated)?;
        let outcome = contract.execute(&env, tx.msg.clone());
        Ok(self.commit(&env, tx.hash(), tx.msg.action(), outcome))
    }

    /// Decode a JSON execute message at the boundary and apply it
    ///
    /// JSON that does not match the request shape is a [`HostError::Decode`]
    /// and leaves no receipt. A well-formed request with a byte field that is
    /// not base64 is recorded as a failed transaction.
    pub fn execute_json(
        &mut self,
        sender: impl Into<Address>,
        msg: &str,
    ) -> Result<&Receipt, HostError> {
        let sender = sender.into();
        let wire: WireExecuteMsg = serde_json::from_str(msg)?;
        let action = wire.action();
        match ExecuteMsg::try_from(wire) {
            Ok(decoded) => self.execute(&Transaction::new(sender, decoded)),
            Err(malformed) => {
                if self.contract.is_none() {
                    return Err(HostError::NotInstantiated);
                }
                let env = self.env(sender);
                let tx_hash = request_hash(&env.sender, msg.as_bytes());
                Ok(self.commit(&env, tx_hash, action, Err(malformed.into())))
            }
        }
    }

    /// Answer a query as JSON
    pub fn query(&self, msg: &QueryMsg) -> Result<serde_json::Value, HostError> {
        let contract = self.contract.as_ref().ok_or(HostError::NotInstantiated)?;
        let response = contract.query(msg)?;
        Ok(serde_json::to_value(response)?)
    }

    /// Decode a JSON query at the boundary and answer it
    pub fn query_json(&self, msg: &str) -> Result<serde_json::Value, HostError> {
        let msg: QueryMsg = serde_json::from_str(msg)?;
        self.query(&msg)
    }

    pub fn contract(&self) -> Option<&Contract> {
        self.contract.as_ref()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Height the next transaction will execute at
    pub fn height(&self) -> u64 {
        self.height
    }

    fn commit(
        &mut self,
        env: &Env,
        tx_hash: Hash,
        action: &'static str,
        outcome: Result<Response, ContractError>,
    ) -> &Receipt {
        let index = self.ledger.next_index();
        let receipt = match outcome {
            Ok(response) => {
                info!(
                    index,
                    height = env.height,
                    action,
                    sender = %env.sender,
                    "transaction committed"
                );
                Receipt {
                    index,
                    height: env.height,
                    tx_hash,
                    success: true,
                    attributes: response.attributes,
                    raw_log: String::new(),
                    error: None,
                }
            }
            Err(err) => {
                warn!(
                    index,
                    height = env.height,
                    action,
                    sender = %env.sender,
                    error = %err,
                    "transaction rejected"
                );
                Receipt {
                    index,
                    height: env.height,
                    tx_hash,
                    success: false,
                    attributes: Vec::new(),
                    raw_log: failure_log(&err),
                    error: Some(err),
                }
            }
        };

        self.height += 1;
        self.ledger.record(receipt)
    }

    fn env(&self, sender: Address) -> Env {
        Env::new(self.config.chain_id.clone(), self.height, sender)
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}
