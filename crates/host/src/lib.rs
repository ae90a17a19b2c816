//! Reference host for the comparison contract
//!
//! Plays the part of the ledger: it owns one contract instance, supplies the
//! sender identity and height for every call, applies transactions strictly
//! one after another and records a receipt for each.

pub mod config;
pub mod error;
pub mod tx;
pub mod ledger;
pub mod host;
pub mod scenario;

pub use config::HostConfig;
pub use error::HostError;
pub use tx::Transaction;
pub use ledger::{Ledger, Receipt};
pub use host::Host;
pub use scenario::{run_scenario, Scenario, ScenarioReport, Step};
