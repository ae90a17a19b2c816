//! Scripted runs against the host
//!
//! A scenario is a JSON document listing instantiate, execute and query steps
//! with the outcome each one is expected to have:
//!
//! ```json
//! {
//!   "name": "millionaires",
//!   "steps": [
//!     { "instantiate": { "sender": "creator" } },
//!     { "execute": { "sender": "alice", "msg": { "compare": {} },
//!                    "expect": { "error_contains": "Inputs incomplete" } } },
//!     { "query": { "msg": { "status": {} }, "expect": { "phase": "awaiting_inputs", "winner": null } } }
//!   ]
//! }
//! ```

use millionaire_core::msg::Attribute;
use millionaire_core::{Address, ExecuteMsg, InstantiateMsg, QueryMsg};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::HostError;
use crate::host::Host;
use crate::tx::Transaction;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Instantiate; falls back to the host configuration when `msg` is absent
    Instantiate {
        sender: Address,
        #[serde(default)]
        msg: Option<InstantiateMsg>,
    },
    Execute {
        sender: Address,
        msg: ExecuteMsg,
        #[serde(default)]
        expect: ExecuteExpectation,
    },
    Query {
        msg: QueryMsg,
        /// Exact JSON answer
        #[serde(default)]
        expect: Option<serde_json::Value>,
        /// Substring of the error the query must fail with
        #[serde(default)]
        expect_error: Option<String>,
    },
}

/// Expected outcome of an execute step
///
/// Without `error_contains` the transaction must succeed and carry every
/// listed attribute.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExecuteExpectation {
    #[serde(default)]
    pub error_contains: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// Result of a scenario run
#[derive(Clone, Debug, Default, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub steps_run: usize,
    /// One line per unmet expectation
    pub failures: Vec<String>,
}

impl ScenarioReport {
    /// Whether every expectation held
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run every step of `scenario` against `host`
///
/// Unmet expectations are collected in the report. Errors are returned only
/// when the run itself cannot continue, such as a failed instantiation.
pub fn run_scenario(host: &mut Host, scenario: &Scenario) -> Result<ScenarioReport, HostError> {
    let mut report = ScenarioReport {
        name: scenario.name.clone(),
        ..Default::default()
    };
    info!(name = %scenario.name, steps = scenario.steps.len(), "running scenario");

    for (i, step) in scenario.steps.iter().enumerate() {
        if let Some(failure) = run_step(host, step)? {
            error!(step = i, "{failure}");
            report.failures.push(format!("step {i}: {failure}"));
        }
        report.steps_run += 1;
    }

    Ok(report)
}

fn run_step(host: &mut Host, step: &Step) -> Result<Option<String>, HostError> {
    match step {
        Step::Instantiate { sender, msg } => {
            match msg {
                Some(msg) => host.instantiate(sender.clone(), msg.clone())?,
                None => host.instantiate_default(sender.clone())?,
            };
            Ok(None)
        }
        Step::Execute {
            sender,
            msg,
            expect,
        } => {
            let receipt = host.execute(&Transaction::new(sender.clone(), msg.clone()))?;
            let failure = match (&expect.error_contains, receipt.success) {
                (Some(needle), false) if receipt.raw_log.contains(needle.as_str()) => None,
                (Some(needle), false) => Some(format!(
                    "expected failure containing {needle:?}, got {:?}",
                    receipt.raw_log
                )),
                (Some(needle), true) => Some(format!(
                    "expected failure containing {needle:?}, transaction succeeded"
                )),
                (None, false) => Some(format!("transaction failed: {}", receipt.raw_log)),
                (None, true) => expect
                    .attributes
                    .iter()
                    .find(|want| receipt.attribute(&want.key) != Some(want.value.as_str()))
                    .map(|want| {
                        format!(
                            "expected attribute {:?} = {:?}, got {:?}",
                            want.key,
                            want.value,
                            receipt.attribute(&want.key)
                        )
                    }),
            };
            Ok(failure)
        }
        Step::Query {
            msg,
            expect,
            expect_error,
        } => {
            let failure = match (host.query(msg), expect_error) {
                (Ok(_), Some(needle)) => {
                    Some(format!("expected query error containing {needle:?}, query succeeded"))
                }
                (Err(err), Some(needle)) if err.to_string().contains(needle.as_str()) => None,
                (Err(err), _) => Some(format!("query failed: {err}")),
                (Ok(value), None) => expect
                    .as_ref()
                    .filter(|want| **want != value)
                    .map(|want| format!("expected query answer {want}, got {value}")),
            };
            Ok(failure)
        }
    }
}
