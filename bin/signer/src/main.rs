//! Input signer
//!
//! Produces signed `set_input_a` / `set_input_b` messages for the comparison
//! contract. Keys come from a short seed right-padded with `'0'` to 32 bytes,
//! or from fresh randomness.
//!
//! Run: cargo run -p signer -- --seed seed --role a 17

use anyhow::{bail, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Parser, ValueEnum};
use ed25519_dalek::{Signer, SigningKey};
use rand::RngCore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use millionaire_core::signing::{signing_key_from_seed, SEED_LENGTH};
use millionaire_core::{ExecuteMsg, PartyRole, SetInput};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Role {
    A,
    B,
}

impl From<Role> for PartyRole {
    fn from(role: Role) -> Self {
        match role {
            Role::A => Self::A,
            Role::B => Self::B,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Key seed, at most 32 bytes
    #[arg(long, env = "SIGNER_SEED", conflicts_with = "random")]
    seed: Option<String>,

    /// Use a random key instead of a seed
    #[arg(long)]
    random: bool,

    /// Slot the message targets
    #[arg(long, value_enum, default_value = "a")]
    role: Role,

    /// Sign this text verbatim and print key, signature and message instead
    /// of an execute message
    #[arg(long, conflicts_with = "value")]
    sign_only: Option<String>,

    /// Input value
    #[arg(allow_negative_numbers = true)]
    value: Option<i64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let key = signing_key(&args)?;
    info!(public_key = %hex::encode(key.verifying_key().to_bytes()), "signing key ready");

    if let Some(text) = &args.sign_only {
        let signature = key.sign(text.as_bytes());
        let out = serde_json::json!({
            "pub_key": STANDARD.encode(key.verifying_key().to_bytes()),
            "signature": STANDARD.encode(signature.to_bytes()),
            "message": STANDARD.encode(text.as_bytes()),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let Some(value) = args.value else {
        bail!("an input value is required unless --sign-only is given");
    };
    let msg = ExecuteMsg::set_input(args.role.into(), SetInput::signed(&key, value));
    println!("{}", serde_json::to_string_pretty(&msg)?);
    Ok(())
}

fn signing_key(args: &Args) -> Result<SigningKey> {
    if args.random {
        let mut seed = [0u8; SEED_LENGTH];
        rand::thread_rng().fill_bytes(&mut seed);
        return Ok(SigningKey::from_bytes(&seed));
    }
    match &args.seed {
        Some(seed) => Ok(signing_key_from_seed(seed.as_bytes())?),
        None => bail!("either --seed or --random is required"),
    }
}
