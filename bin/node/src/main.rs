//! Comparison contract node
//!
//! Instantiates the contract inside the in-process host and replays a
//! scenario file against it:
//! - Transactions are applied one at a time, in file order
//! - Every receipt is logged; failures show the host-visible raw log
//! - Exits non-zero when any expectation in the scenario is not met

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use millionaire_core::QueryMsg;
use millionaire_host::{run_scenario, Host, HostConfig, Scenario};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file (JSON)
    scenario: PathBuf,

    /// Print the ledger receipts as JSON after the run
    #[arg(long)]
    dump_ledger: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = HostConfig::from_env();

    info!("╔═══════════════════════════════════════════════╗");
    info!("║      Millionaire comparison contract node     ║");
    info!("╚═══════════════════════════════════════════════╝");
    info!("");
    info!("Configuration:");
    info!("  Chain ID:      {}", config.chain_id);
    info!("  Start height:  {}", config.start_height);
    info!("  Tie-break:     {:?}", config.tie_break);
    info!("  Input queries: {}", config.query_inputs);
    info!("");

    let raw = std::fs::read_to_string(&args.scenario)
        .with_context(|| format!("reading {}", args.scenario.display()))?;
    let scenario: Scenario = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", args.scenario.display()))?;

    let mut host = Host::new(config);
    let report = run_scenario(&mut host, &scenario)?;

    for receipt in host.ledger().receipts() {
        if receipt.success {
            let log: Vec<String> = receipt
                .attributes
                .iter()
                .map(|a| format!("{}={}", a.key, a.value))
                .collect();
            info!("  #{} @{}  ok    {}", receipt.index, receipt.height, log.join(", "));
        } else {
            warn!("  #{} @{}  fail  {}", receipt.index, receipt.height, receipt.raw_log);
        }
    }
    if host.contract().is_some() {
        let status = host.query(&QueryMsg::Status {})?;
        info!("Final status: {status}");
    }
    info!("Trace hash: 0x{}", hex::encode(host.ledger().trace_hash()));

    if args.dump_ledger {
        println!("{}", serde_json::to_string_pretty(host.ledger().receipts())?);
    }

    if !report.passed() {
        bail!(
            "scenario {:?}: {} of {} steps failed",
            report.name,
            report.failures.len(),
            report.steps_run
        );
    }
    info!("✓ Scenario {:?} passed ({} steps)", report.name, report.steps_run);
    Ok(())
}
